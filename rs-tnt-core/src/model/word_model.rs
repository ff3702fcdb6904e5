use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::capitalization::WordCap;
use super::known_word::KnownWordModel;
use super::part_of_speech::PartOfSpeech;
use super::suffix::SuffixModel;

/// Source of emission probabilities P(word | tag).
///
/// A tagger consults an ordered list of these: the first model whose
/// `is_known` accepts a word is authoritative for it.
pub trait WordProbabilityModel: Send + Sync {
	/// Log probability of `word_cap` given `candidate`.
	///
	/// `f64::NEG_INFINITY` when the pair is impossible or unseen.
	fn log_probability_of_word(&self, candidate: PartOfSpeech, word_cap: &WordCap) -> f64;

	/// Tags with a probability strictly greater than zero for `word_cap`.
	fn candidates(&self, word_cap: &WordCap) -> BTreeSet<PartOfSpeech>;

	/// Whether this model is authoritative for `word_cap`.
	fn is_known(&self, word_cap: &WordCap) -> bool;
}

/// The word models a `TntModel` can persist.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub enum WordModel {
	Known(KnownWordModel),
	Suffix(SuffixModel),
}

impl WordProbabilityModel for WordModel {
	fn log_probability_of_word(&self, candidate: PartOfSpeech, word_cap: &WordCap) -> f64 {
		match self {
			WordModel::Known(model) => model.log_probability_of_word(candidate, word_cap),
			WordModel::Suffix(model) => model.log_probability_of_word(candidate, word_cap),
		}
	}

	fn candidates(&self, word_cap: &WordCap) -> BTreeSet<PartOfSpeech> {
		match self {
			WordModel::Known(model) => model.candidates(word_cap),
			WordModel::Suffix(model) => model.candidates(word_cap),
		}
	}

	fn is_known(&self, word_cap: &WordCap) -> bool {
		match self {
			WordModel::Known(model) => model.is_known(word_cap),
			WordModel::Suffix(model) => model.is_known(word_cap),
		}
	}
}

impl From<KnownWordModel> for WordModel {
	fn from(model: KnownWordModel) -> Self {
		WordModel::Known(model)
	}
}

impl From<SuffixModel> for WordModel {
	fn from(model: SuffixModel) -> Self {
		WordModel::Suffix(model)
	}
}

impl<M: WordProbabilityModel + ?Sized> WordProbabilityModel for Box<M> {
	fn log_probability_of_word(&self, candidate: PartOfSpeech, word_cap: &WordCap) -> f64 {
		(**self).log_probability_of_word(candidate, word_cap)
	}

	fn candidates(&self, word_cap: &WordCap) -> BTreeSet<PartOfSpeech> {
		(**self).candidates(word_cap)
	}

	fn is_known(&self, word_cap: &WordCap) -> bool {
		(**self).is_known(word_cap)
	}
}

/// Keeps the finite entries of a tag distribution.
pub(crate) fn finite_candidates<'a, I>(probabilities: I) -> BTreeSet<PartOfSpeech>
where
	I: IntoIterator<Item = (&'a PartOfSpeech, &'a f64)>,
{
	probabilities
		.into_iter()
		.filter(|(_, log_probability)| **log_probability > f64::NEG_INFINITY)
		.map(|(part_of_speech, _)| *part_of_speech)
		.collect()
}

#[cfg(test)]
mod tests {
	use std::collections::HashMap;

	use super::*;
	use crate::model::capitalization::{CapitalizationAdapter, CapitalizationFilter};

	fn models() -> Vec<WordModel> {
		let lexicon = HashMap::from([("dog".to_owned(), HashMap::from([(PartOfSpeech::Nn, -0.2)]))]);
		let suffixes = HashMap::from([(String::new(), HashMap::from([(PartOfSpeech::Jj, 0.0)]))]);
		vec![
			KnownWordModel::new(lexicon, CapitalizationFilter::Any, CapitalizationAdapter::Identity).into(),
			SuffixModel::new(suffixes, 2, CapitalizationFilter::Any, CapitalizationAdapter::Identity)
				.unwrap()
				.into(),
		]
	}

	#[test]
	fn test_first_claiming_model() {
		let models = models();
		let dog = WordCap::new("dog");
		let zork = WordCap::new("zork");

		let claiming = models.iter().find(|model| model.is_known(&dog)).unwrap();
		assert!(matches!(claiming, WordModel::Known(_)));
		assert_eq!(claiming.log_probability_of_word(PartOfSpeech::Nn, &dog), -0.2);

		let claiming = models.iter().find(|model| model.is_known(&zork)).unwrap();
		assert!(matches!(claiming, WordModel::Suffix(_)));
		assert_eq!(claiming.candidates(&zork).into_iter().collect::<Vec<_>>(), vec![PartOfSpeech::Jj]);
	}

	#[test]
	fn test_boxed_models() {
		let boxed: Vec<Box<dyn WordProbabilityModel>> =
			models().into_iter().map(|model| Box::new(model) as Box<dyn WordProbabilityModel>).collect();
		assert!(boxed[0].is_known(&WordCap::new("dog")));
		assert_eq!(boxed[1].log_probability_of_word(PartOfSpeech::Jj, &WordCap::new("zork")), 0.0);
	}

	#[test]
	fn test_finite_candidates() {
		let probabilities = HashMap::from([(PartOfSpeech::Nn, -1.0), (PartOfSpeech::Vb, f64::NEG_INFINITY)]);
		assert_eq!(finite_candidates(&probabilities).into_iter().collect::<Vec<_>>(), vec![PartOfSpeech::Nn]);
	}
}
