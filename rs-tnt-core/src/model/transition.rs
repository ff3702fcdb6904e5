use std::collections::HashMap;
use std::path::Path;

use log::info;
use serde::{Deserialize, Serialize};

use crate::error::{Result, TaggerError};
use crate::io;

use super::part_of_speech::PartOfSpeech;

/// Source of tag transition probabilities P(tag | previous tags).
pub trait TransitionModel: Send + Sync {
	/// Number of previous tags the model conditions on (at least 1).
	fn context_width(&self) -> usize;

	/// Log probability of `tag` following `context`.
	///
	/// `context` holds the most recent tags, oldest first, and is at most
	/// `context_width()` long. `f64::NEG_INFINITY` for impossible transitions.
	fn log_probability_of(&self, tag: PartOfSpeech, context: &[PartOfSpeech]) -> f64;
}

/// Second-order tag model with linear interpolation (TnT smoothing).
///
/// P(t3 | t1, t2) = λ1·P(t3) + λ2·P(t3 | t2) + λ3·P(t3 | t1, t2)
///
/// # Invariants
/// - Every λ is >= 0 and they sum to 1
/// - Every stored probability lies in [0, 1]
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct TagTrigramModel {
	lambdas: [f64; 3],
	unigrams: HashMap<PartOfSpeech, f64>,
	bigrams: HashMap<(PartOfSpeech, PartOfSpeech), f64>,
	trigrams: HashMap<(PartOfSpeech, PartOfSpeech, PartOfSpeech), f64>,
}

impl TagTrigramModel {
	/// Creates an empty model with the given interpolation weights
	/// (unigram, bigram, trigram).
	///
	/// # Errors
	/// Returns an error if a weight is negative or the weights do not sum to 1.
	pub fn new(lambdas: [f64; 3]) -> Result<Self> {
		if lambdas.iter().any(|lambda| !(*lambda >= 0.0)) {
			return Err(TaggerError::InvalidModel(format!("negative interpolation weight in {lambdas:?}")));
		}
		let sum: f64 = lambdas.iter().sum();
		if (sum - 1.0).abs() > 1e-6 {
			return Err(TaggerError::InvalidModel(format!("interpolation weights sum to {sum}, expected 1")));
		}

		Ok(Self {
			lambdas,
			unigrams: HashMap::new(),
			bigrams: HashMap::new(),
			trigrams: HashMap::new(),
		})
	}

	/// Builds a model from `(tags, probability)` pairs, see `insert`.
	pub fn from_grams<I>(lambdas: [f64; 3], grams: I) -> Result<Self>
	where
		I: IntoIterator<Item = (Vec<PartOfSpeech>, f64)>,
	{
		let mut model = Self::new(lambdas)?;
		for (tags, probability) in grams {
			model.insert(&tags, probability)?;
		}
		Ok(model)
	}

	/// Loads a model from a `TAG [TAG [TAG]] probability` text table.
	///
	/// - Uses the `.bin` cache next to the table when present
	/// - Writes the cache after a successful parse
	pub fn from_table<P: AsRef<Path>>(filepath: P, lambdas: [f64; 3]) -> Result<Self> {
		let grams = io::load_cached(filepath, |path| io::read_tag_gram_table(path))?;
		info!("Tag transition model loaded: {} n-grams", grams.len());
		Self::from_grams(lambdas, grams)
	}

	/// Records the probability of the last tag of `tags` given the ones
	/// before it.
	///
	/// # Errors
	/// Returns an error if `tags` is not 1 to 3 tags long or the probability
	/// lies outside [0, 1].
	pub fn insert(&mut self, tags: &[PartOfSpeech], probability: f64) -> Result<()> {
		if !(0.0..=1.0).contains(&probability) {
			return Err(TaggerError::InvalidModel(format!("probability {probability} outside [0, 1]")));
		}

		match *tags {
			[t3] => self.unigrams.insert(t3, probability),
			[t2, t3] => self.bigrams.insert((t2, t3), probability),
			[t1, t2, t3] => self.trigrams.insert((t1, t2, t3), probability),
			_ => return Err(TaggerError::InvalidModel(format!("expected 1 to 3 tags, got {}", tags.len()))),
		};
		Ok(())
	}

	pub fn lambdas(&self) -> [f64; 3] {
		self.lambdas
	}

	/// Interpolated probability, in linear space.
	pub fn probability_of(&self, tag: PartOfSpeech, context: &[PartOfSpeech]) -> f64 {
		let [l1, l2, l3] = self.lambdas;

		let unigram = self.unigrams.get(&tag).copied().unwrap_or(0.0);
		let bigram = match context {
			[.., t2] => self.bigrams.get(&(*t2, tag)).copied().unwrap_or(0.0),
			[] => 0.0,
		};
		let trigram = match context {
			[.., t1, t2] => self.trigrams.get(&(*t1, *t2, tag)).copied().unwrap_or(0.0),
			_ => 0.0,
		};

		l1 * unigram + l2 * bigram + l3 * trigram
	}
}

impl TransitionModel for TagTrigramModel {
	fn context_width(&self) -> usize {
		2
	}

	fn log_probability_of(&self, tag: PartOfSpeech, context: &[PartOfSpeech]) -> f64 {
		// ln(0) is -inf: an unseen transition is impossible.
		self.probability_of(tag, context).ln()
	}
}
