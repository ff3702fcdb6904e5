use std::collections::{BTreeSet, HashMap};
use std::path::Path;

use log::info;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::io;

use super::capitalization::{
	Capitalization, CapitalizationAdapter, CapitalizationFilter, WordCap, WordCapAdapter, WordCapFilter, WordPosCap,
};
use super::part_of_speech::PartOfSpeech;
use super::word_model::{WordProbabilityModel, finite_candidates};

/// Emission model for words seen at training time.
///
/// Gives log P(word | tag) from a lexicon mapping each word to the tags it
/// was observed with. Words are adapted (see `WordCapAdapter`) before every
/// lookup, and the filter restricts which casing classes this model answers
/// for, so a tagger can stack several lexicons trained on different
/// casings.
///
/// # Invariants
/// - The lexicon is never modified after construction
/// - A `NEG_INFINITY` entry means "known impossible"; it is stored but never
///   offered as a candidate
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct KnownWordModel<F = CapitalizationFilter, A = CapitalizationAdapter> {
	/// word -> (tag -> log P(word | tag))
	lexical_probabilities: HashMap<String, HashMap<PartOfSpeech, f64>>,
	filter: F,
	adapter: A,
}

impl<F, A> KnownWordModel<F, A>
where
	F: WordCapFilter,
	A: WordCapAdapter,
{
	/// Creates a model from an already loaded lexicon.
	pub fn new(lexical_probabilities: HashMap<String, HashMap<PartOfSpeech, f64>>, filter: F, adapter: A) -> Self {
		Self { lexical_probabilities, filter, adapter }
	}

	/// Number of distinct words in the lexicon.
	pub fn len(&self) -> usize {
		self.lexical_probabilities.len()
	}

	pub fn is_empty(&self) -> bool {
		self.lexical_probabilities.is_empty()
	}

	/// Iterates over every stored (word, tag, casing) triple with its log
	/// probability, impossible entries included.
	pub fn entries(&self) -> impl Iterator<Item = (WordPosCap, f64)> + '_ {
		self.lexical_probabilities.iter().flat_map(|(word, probabilities)| {
			probabilities.iter().map(move |(part_of_speech, log_probability)| {
				let entry = WordPosCap {
					word: word.clone(),
					part_of_speech: *part_of_speech,
					capitalization: Capitalization::of(word),
				};
				(entry, *log_probability)
			})
		})
	}

	fn lookup(&self, word_cap: &WordCap) -> (WordCap, Option<&HashMap<PartOfSpeech, f64>>) {
		let adapted = self.adapter.adapt(word_cap);
		let probabilities = self.lexical_probabilities.get(adapted.word());
		(adapted, probabilities)
	}

	/// Loads the lexicon from a `word TAG probability` text table.
	///
	/// - Uses the `.bin` cache next to the table when present
	/// - Writes the cache after a successful parse
	///
	/// # Errors
	/// Returns an error if the table cannot be read or parsed.
	pub fn from_table<P: AsRef<Path>>(filepath: P, filter: F, adapter: A) -> Result<Self> {
		let lexical_probabilities = io::load_cached(filepath, |path| io::read_probability_table(path))?;
		info!("Known word model loaded: {} words", lexical_probabilities.len());
		Ok(Self::new(lexical_probabilities, filter, adapter))
	}
}

impl<F, A> WordProbabilityModel for KnownWordModel<F, A>
where
	F: WordCapFilter + Send + Sync,
	A: WordCapAdapter + Send + Sync,
{
	fn log_probability_of_word(&self, candidate: PartOfSpeech, word_cap: &WordCap) -> f64 {
		// Absent word and absent tag both mean "never seen": zero probability.
		let (_, probabilities) = self.lookup(word_cap);
		probabilities
			.and_then(|probabilities| probabilities.get(&candidate))
			.copied()
			.unwrap_or(f64::NEG_INFINITY)
	}

	fn candidates(&self, word_cap: &WordCap) -> BTreeSet<PartOfSpeech> {
		match self.lookup(word_cap) {
			(_, Some(probabilities)) => finite_candidates(probabilities),
			(_, None) => BTreeSet::new(),
		}
	}

	fn is_known(&self, word_cap: &WordCap) -> bool {
		let (adapted, probabilities) = self.lookup(word_cap);
		self.filter.accepts(&adapted) && probabilities.is_some()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn dog_model() -> KnownWordModel {
		let mut dog = HashMap::new();
		dog.insert(PartOfSpeech::Nn, -0.1);
		dog.insert(PartOfSpeech::Vb, f64::NEG_INFINITY);
		let mut lexicon = HashMap::new();
		lexicon.insert("dog".to_owned(), dog);
		KnownWordModel::new(lexicon, CapitalizationFilter::Any, CapitalizationAdapter::Identity)
	}

	#[test]
	fn test_unseen_word_is_unknown() {
		let model = dog_model();
		assert!(!model.is_known(&WordCap::new("cat")));
		assert!(model.is_known(&WordCap::new("dog")));
	}

	#[test]
	fn test_candidates_exclude_impossible_tags() {
		let model = dog_model();
		let candidates = model.candidates(&WordCap::new("dog"));
		assert_eq!(candidates.into_iter().collect::<Vec<_>>(), vec![PartOfSpeech::Nn]);
		assert!(model.candidates(&WordCap::new("cat")).is_empty());
	}

	#[test]
	fn test_log_probability_of_word() {
		let model = dog_model();
		assert_eq!(model.log_probability_of_word(PartOfSpeech::Nn, &WordCap::new("dog")), -0.1);
		assert_eq!(model.log_probability_of_word(PartOfSpeech::Vb, &WordCap::new("dog")), f64::NEG_INFINITY);
		assert_eq!(model.log_probability_of_word(PartOfSpeech::Nn, &WordCap::new("cat")), f64::NEG_INFINITY);
	}

	#[test]
	fn test_known_word_absent_tag_is_impossible() {
		let model = dog_model();
		assert_eq!(model.log_probability_of_word(PartOfSpeech::Jj, &WordCap::new("dog")), f64::NEG_INFINITY);
	}

	#[test]
	fn test_adapter_applies_before_lookup_and_filter() {
		let lexicon = dog_model().lexical_probabilities;
		let model = KnownWordModel::new(
			lexicon,
			CapitalizationFilter::Only(vec![Capitalization::Lower]),
			CapitalizationAdapter::Fold,
		);

		let capitalized = WordCap::new("Dog");
		assert!(model.is_known(&capitalized));
		assert_eq!(model.log_probability_of_word(PartOfSpeech::Nn, &capitalized), -0.1);

		let strict = KnownWordModel::new(
			dog_model().lexical_probabilities,
			CapitalizationFilter::Only(vec![Capitalization::Lower]),
			CapitalizationAdapter::Lowercase,
		);
		assert!(!strict.is_known(&capitalized));
	}

	#[test]
	fn test_closure_strategies() {
		let model = KnownWordModel::new(
			dog_model().lexical_probabilities,
			|word_cap: &WordCap| word_cap.word().len() > 2,
			|word_cap: &WordCap| WordCap::new(word_cap.word().trim_end_matches('s')),
		);
		assert!(model.is_known(&WordCap::new("dogs")));
		assert_eq!(model.candidates(&WordCap::new("dogs")).len(), 1);
	}

	#[test]
	fn test_entries() {
		let model = dog_model();
		let mut entries: Vec<_> = model.entries().collect();
		entries.sort_by_key(|(entry, _)| entry.part_of_speech);
		assert_eq!(entries.len(), 2);
		assert_eq!(entries[0].0.word, "dog");
		assert_eq!(entries[0].0.part_of_speech, PartOfSpeech::Nn);
		assert_eq!(entries[1].1, f64::NEG_INFINITY);
	}

	#[test]
	fn test_from_table() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("lexicon.txt");
		std::fs::write(&path, "dog NN 0.9\ndog VB 0\n").unwrap();

		let model: KnownWordModel = KnownWordModel::from_table(&path, CapitalizationFilter::Any, CapitalizationAdapter::Fold).unwrap();
		assert_eq!(model.len(), 1);
		assert_eq!(model.candidates(&WordCap::new("DOG")).len(), 1);
	}

	#[test]
	fn test_from_table_keeps_hyphen_word() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("lexicon.txt");
		std::fs::write(&path, "- HYPH 0.9\ndog NN 0.9\n").unwrap();

		let model: KnownWordModel =
			KnownWordModel::from_table(&path, CapitalizationFilter::Any, CapitalizationAdapter::Identity).unwrap();
		let hyphen = WordCap::new("-");
		assert!(model.is_known(&hyphen));
		assert!((model.log_probability_of_word(PartOfSpeech::Hyphen, &hyphen) - 0.9f64.ln()).abs() < 1e-12);
		assert!(!model.is_known(&WordCap::new("")));
	}
}
