//! Statistical part-of-speech tagging library.
//!
//! This crate provides a TnT-style trigram tagger including:
//! - Persistent, structurally shared decoding histories
//! - Pluggable word probability models (known words, suffix backoff)
//! - Capitalization-aware lexical lookup strategies
//! - A Viterbi beam decoder with context merging and pruning
//!
//! Tokenization and document handling are left to the caller: the tagger
//! consumes `WordCap` sequences and returns one `PartOfSpeech` per token.

/// Core tagging models and decoding logic.
pub mod model;

/// Error type shared by every fallible operation of the crate.
pub mod error;

/// I/O utilities (probability tables, binary cache paths).
///
/// Not exposed
pub(crate) mod io;

pub use error::{Result, TaggerError};
