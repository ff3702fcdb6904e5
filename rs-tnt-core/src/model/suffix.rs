use std::collections::{BTreeSet, HashMap};
use std::path::Path;

use log::info;
use serde::{Deserialize, Serialize};

use crate::error::{Result, TaggerError};
use crate::io;

use super::capitalization::{CapitalizationAdapter, CapitalizationFilter, WordCap, WordCapAdapter, WordCapFilter};
use super::part_of_speech::PartOfSpeech;
use super::word_model::{WordProbabilityModel, finite_candidates};

/// Backoff emission model for words missing from every lexicon.
///
/// Scores a word by its longest suffix seen at training time (TnT's
/// suffix analysis), falling back to the empty suffix, i.e. the tag
/// distribution of rare words as a whole.
///
/// # Invariants
/// - The empty suffix distribution holds at least one finite probability,
///   so every accepted word gets at least one candidate
/// - No suffix is longer than `max_suffix_length` characters
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct SuffixModel<F = CapitalizationFilter, A = CapitalizationAdapter> {
	max_suffix_length: usize,
	/// non-empty suffix -> (tag -> log P(suffix | tag))
	suffix_probabilities: HashMap<String, HashMap<PartOfSpeech, f64>>,
	/// Distribution of the empty suffix.
	empty_suffix: HashMap<PartOfSpeech, f64>,
	filter: F,
	adapter: A,
}

impl<F, A> SuffixModel<F, A>
where
	F: WordCapFilter,
	A: WordCapAdapter,
{
	/// Creates a suffix model.
	///
	/// Suffixes longer than `max_suffix_length` characters can never match
	/// and are dropped.
	///
	/// # Errors
	/// Returns `TaggerError::InvalidModel` if the empty suffix is missing or
	/// has no tag with a non-zero probability.
	pub fn new(
		mut suffix_probabilities: HashMap<String, HashMap<PartOfSpeech, f64>>,
		max_suffix_length: usize,
		filter: F,
		adapter: A,
	) -> Result<Self> {
		let empty_suffix = suffix_probabilities
			.remove("")
			.ok_or_else(|| TaggerError::InvalidModel("suffix model without empty suffix".to_owned()))?;
		if finite_candidates(&empty_suffix).is_empty() {
			return Err(TaggerError::InvalidModel("empty suffix has no possible tag".to_owned()));
		}

		suffix_probabilities.retain(|suffix, _| suffix.chars().count() <= max_suffix_length);

		Ok(Self { max_suffix_length, suffix_probabilities, empty_suffix, filter, adapter })
	}

	/// Loads the suffix distributions from a `suffix TAG probability` table,
	/// the empty suffix being spelled `-`.
	///
	/// # Errors
	/// Returns an error if the table cannot be read or parsed, or if the
	/// resulting model is invalid (see `new`).
	pub fn from_table<P: AsRef<Path>>(filepath: P, max_suffix_length: usize, filter: F, adapter: A) -> Result<Self> {
		let suffix_probabilities = io::load_cached(filepath, |path| io::read_suffix_table(path))?;
		info!("Suffix model loaded: {} suffixes", suffix_probabilities.len());
		Self::new(suffix_probabilities, max_suffix_length, filter, adapter)
	}

	pub fn max_suffix_length(&self) -> usize {
		self.max_suffix_length
	}

	/// Distribution of the longest known suffix of the adapted word that
	/// allows at least one tag.
	fn distribution(&self, word_cap: &WordCap) -> &HashMap<PartOfSpeech, f64> {
		let adapted = self.adapter.adapt(word_cap);
		let word = adapted.word();

		// Byte offset where the longest admissible suffix starts.
		let start = word
			.char_indices()
			.rev()
			.take(self.max_suffix_length)
			.last()
			.map_or(word.len(), |(offset, _)| offset);

		word.char_indices()
			.map(|(offset, _)| offset)
			.filter(|offset| *offset >= start)
			.filter_map(|offset| self.suffix_probabilities.get(&word[offset..]))
			// A suffix whose every tag is impossible cannot tag anything: back off.
			.find(|distribution| !finite_candidates(*distribution).is_empty())
			.unwrap_or(&self.empty_suffix)
	}
}

impl<F, A> WordProbabilityModel for SuffixModel<F, A>
where
	F: WordCapFilter + Send + Sync,
	A: WordCapAdapter + Send + Sync,
{
	fn log_probability_of_word(&self, candidate: PartOfSpeech, word_cap: &WordCap) -> f64 {
		self.distribution(word_cap)
			.get(&candidate)
			.copied()
			.unwrap_or(f64::NEG_INFINITY)
	}

	fn candidates(&self, word_cap: &WordCap) -> BTreeSet<PartOfSpeech> {
		finite_candidates(self.distribution(word_cap))
	}

	fn is_known(&self, word_cap: &WordCap) -> bool {
		self.filter.accepts(&self.adapter.adapt(word_cap))
	}
}
