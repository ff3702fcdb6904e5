use serde::{Deserialize, Serialize};

use super::part_of_speech::PartOfSpeech;

/// Casing class of a word.
///
/// Computed from the cased letters only: digits and punctuation neither
/// count as lowercase nor as uppercase. A word without cased letters is
/// `Lower`.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Capitalization {
	/// No uppercase letter ("dog", "3.5").
	Lower,
	/// Uppercase first letter, every other cased letter lowercase ("Dog").
	Capitalized,
	/// At least two cased letters, all uppercase ("DNA"). A lone
	/// uppercase letter ("I") is `Capitalized`.
	AllCaps,
	/// Any other mix ("iPhone", "McDonald").
	Mixed,
}

impl Capitalization {
	/// Classifies the casing of `word`.
	pub fn of(word: &str) -> Self {
		let mut cased = word.chars().filter(|c| c.is_lowercase() || c.is_uppercase());

		let first_upper = match cased.next() {
			Some(c) => c.is_uppercase(),
			None => return Capitalization::Lower,
		};

		let (mut upper, mut lower) = (0usize, 0usize);
		for c in cased {
			if c.is_uppercase() {
				upper += 1;
			} else {
				lower += 1;
			}
		}

		match (first_upper, upper, lower) {
			(false, 0, _) => Capitalization::Lower,
			(true, 0, _) => Capitalization::Capitalized,
			(true, _, 0) => Capitalization::AllCaps,
			_ => Capitalization::Mixed,
		}
	}
}

/// A word together with its casing class.
///
/// ## Invariants
/// - Immutable once built; adapters produce new values.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Hash)]
pub struct WordCap {
	word: String,
	capitalization: Capitalization,
}

impl WordCap {
	/// Builds a `WordCap`, deriving the casing class from the text.
	pub fn new(word: &str) -> Self {
		Self {
			word: word.to_owned(),
			capitalization: Capitalization::of(word),
		}
	}

	/// Builds a `WordCap` with an explicit casing class.
	///
	/// Used when the casing was decided upstream, e.g. after a sentence
	/// initial word was lowercased by the tokenizer.
	pub fn with_capitalization(word: &str, capitalization: Capitalization) -> Self {
		Self { word: word.to_owned(), capitalization }
	}

	pub fn word(&self) -> &str {
		&self.word
	}

	pub fn capitalization(&self) -> Capitalization {
		self.capitalization
	}
}

/// A (word, tag, casing) triple: one point of the lexical probability space.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Hash)]
pub struct WordPosCap {
	pub word: String,
	pub part_of_speech: PartOfSpeech,
	pub capitalization: Capitalization,
}

/// Normalizes a `WordCap` before lexicon lookup.
///
/// Rare casing variants are folded to the form seen at training time so a
/// sentence-initial "The" can be scored with the statistics of "the".
pub trait WordCapAdapter {
	fn adapt(&self, word_cap: &WordCap) -> WordCap;
}

/// Decides whether a word model is allowed to handle a `WordCap` at all.
pub trait WordCapFilter {
	fn accepts(&self, word_cap: &WordCap) -> bool;
}

/// Serializable adaptation strategies.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Default)]
pub enum CapitalizationAdapter {
	/// Leaves the word untouched.
	#[default]
	Identity,
	/// Lowercases the text, keeps the casing class.
	Lowercase,
	/// Lowercases the text and resets the class to `Lower`.
	Fold,
}

impl WordCapAdapter for CapitalizationAdapter {
	fn adapt(&self, word_cap: &WordCap) -> WordCap {
		match self {
			CapitalizationAdapter::Identity => word_cap.clone(),
			CapitalizationAdapter::Lowercase => {
				WordCap::with_capitalization(&word_cap.word.to_lowercase(), word_cap.capitalization)
			}
			CapitalizationAdapter::Fold => {
				WordCap::with_capitalization(&word_cap.word.to_lowercase(), Capitalization::Lower)
			}
		}
	}
}

/// Serializable filtering strategies, keyed on the casing class.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Default)]
pub enum CapitalizationFilter {
	#[default]
	Any,
	Only(Vec<Capitalization>),
	Except(Vec<Capitalization>),
}

impl WordCapFilter for CapitalizationFilter {
	fn accepts(&self, word_cap: &WordCap) -> bool {
		match self {
			CapitalizationFilter::Any => true,
			CapitalizationFilter::Only(allowed) => allowed.contains(&word_cap.capitalization),
			CapitalizationFilter::Except(denied) => !denied.contains(&word_cap.capitalization),
		}
	}
}

impl<F: Fn(&WordCap) -> WordCap> WordCapAdapter for F {
	fn adapt(&self, word_cap: &WordCap) -> WordCap {
		self(word_cap)
	}
}

impl<F: Fn(&WordCap) -> bool> WordCapFilter for F {
	fn accepts(&self, word_cap: &WordCap) -> bool {
		self(word_cap)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_capitalization_classes() {
		assert_eq!(Capitalization::of("dog"), Capitalization::Lower);
		assert_eq!(Capitalization::of("Dog"), Capitalization::Capitalized);
		assert_eq!(Capitalization::of("DNA"), Capitalization::AllCaps);
		assert_eq!(Capitalization::of("iPhone"), Capitalization::Mixed);
		assert_eq!(Capitalization::of("McDonald"), Capitalization::Mixed);
		assert_eq!(Capitalization::of("I"), Capitalization::Capitalized);
		assert_eq!(Capitalization::of("3.5"), Capitalization::Lower);
		assert_eq!(Capitalization::of("A-1"), Capitalization::Capitalized);
		assert_eq!(Capitalization::of(""), Capitalization::Lower);
	}

	#[test]
	fn test_adapters() {
		let word = WordCap::new("The");
		assert_eq!(CapitalizationAdapter::Identity.adapt(&word), word);

		let lowered = CapitalizationAdapter::Lowercase.adapt(&word);
		assert_eq!(lowered.word(), "the");
		assert_eq!(lowered.capitalization(), Capitalization::Capitalized);

		let folded = CapitalizationAdapter::Fold.adapt(&word);
		assert_eq!(folded, WordCap::new("the"));
	}

	#[test]
	fn test_filters() {
		let upper = WordCap::new("NASA");
		assert!(CapitalizationFilter::Any.accepts(&upper));
		assert!(CapitalizationFilter::Only(vec![Capitalization::AllCaps]).accepts(&upper));
		assert!(!CapitalizationFilter::Only(vec![Capitalization::Lower]).accepts(&upper));
		assert!(!CapitalizationFilter::Except(vec![Capitalization::AllCaps]).accepts(&upper));
	}

	#[test]
	fn test_closure_adapter() {
		let strip_dots = |wc: &WordCap| WordCap::with_capitalization(&wc.word().replace('.', ""), wc.capitalization());
		assert_eq!(strip_dots.adapt(&WordCap::new("U.S.")).word(), "US");
	}
}
