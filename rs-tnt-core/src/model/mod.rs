//! Top-level module for the tagging system.
//!
//! This module provides a TnT-style part of speech tagger, including:
//! - Shared decoding histories (`HistoryChain`, `Ancestor`)
//! - Word emission models (`KnownWordModel`, `SuffixModel`)
//! - A tag transition model (`TagTrigramModel`)
//! - A Viterbi beam decoder (`Beam`) and the high-level `Tagger`
//! - A serializable model bundle (`TntModel`)

/// Closed set of part of speech tags, sentinels included.
pub mod part_of_speech;

/// Casing classes and the strategies word models use to adapt and filter
/// words before lookup.
pub mod capitalization;

/// Fixed-size windows of recent states (`Bigram`, `Ngram`).
pub mod grams;

/// Persistent singly-linked history of decoded states.
///
/// Nodes are shared between every hypothesis descending from them and are
/// never mutated once built.
pub mod history;

/// Decoding hypothesis: a history plus its cumulative log probability.
pub mod ancestor;

/// Emission probability interface and the persisted model variants.
pub mod word_model;

/// Lexicon of words seen at training time.
pub mod known_word;

/// Suffix backoff model for unknown words.
pub mod suffix;

/// Tag transition probabilities.
pub mod transition;

/// Beam of hypotheses with context merging and pruning.
pub mod viterbi;

/// Decoding parameters (pruning, batch workers).
pub mod config;

/// High-level tagging interface.
///
/// Chooses the authoritative word model per token, drives the beam and
/// tags batches of sentences in parallel.
pub mod tagger;

/// Serializable bundle of every model a tagger needs.
pub mod tnt;
