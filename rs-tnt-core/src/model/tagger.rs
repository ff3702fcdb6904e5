use std::iter;
use std::sync::mpsc;
use std::thread;

use log::debug;

use crate::error::{Result, TaggerError};

use super::ancestor::Ancestor;
use super::capitalization::WordCap;
use super::config::TaggerConfig;
use super::part_of_speech::PartOfSpeech;
use super::transition::{TagTrigramModel, TransitionModel};
use super::viterbi::Beam;
use super::word_model::{WordModel, WordProbabilityModel};

/// Sentence tagger: a transition model, an ordered list of word models and
/// the decoding parameters.
///
/// For each token the first word model whose `is_known` accepts it is the
/// only one consulted, so the list goes from the most specific lexicon to
/// the catch-all unknown word model.
///
/// ## Invariants
/// - At least one word model
/// - Models are never modified once the tagger is built
#[derive(Debug)]
pub struct Tagger<T = TagTrigramModel, W = WordModel> {
	transition_model: T,
	word_models: Vec<W>,
	config: TaggerConfig,
}

impl<T, W> Tagger<T, W>
where
	T: TransitionModel,
	W: WordProbabilityModel,
{
	/// Builds a tagger.
	///
	/// # Errors
	/// Returns `TaggerError::InvalidModel` if `word_models` is empty or the
	/// transition model has no context.
	pub fn new(transition_model: T, word_models: Vec<W>, config: TaggerConfig) -> Result<Self> {
		if word_models.is_empty() {
			return Err(TaggerError::InvalidModel("a tagger needs at least one word model".to_owned()));
		}
		if transition_model.context_width() == 0 {
			return Err(TaggerError::InvalidModel("transition model without context".to_owned()));
		}
		Ok(Self { transition_model, word_models, config })
	}

	pub fn config(&self) -> &TaggerConfig {
		&self.config
	}

	pub fn config_mut(&mut self) -> &mut TaggerConfig {
		&mut self.config
	}

	pub fn transition_model(&self) -> &T {
		&self.transition_model
	}

	pub fn word_models(&self) -> &[W] {
		&self.word_models
	}

	/// The word model authoritative for `word_cap`, if any.
	pub fn word_model_for(&self, word_cap: &WordCap) -> Option<&W> {
		self.word_models.iter().find(|model| model.is_known(word_cap))
	}

	/// Seeds of every decoding: `Bbs` padding then `Bos`, one per context
	/// position.
	fn seeds(&self) -> impl Iterator<Item = PartOfSpeech> {
		let width = self.transition_model.context_width();
		iter::repeat_n(PartOfSpeech::Bbs, width - 1).chain(iter::once(PartOfSpeech::Bos))
	}

	/// Tags one sentence, returning one tag per token.
	///
	/// # Errors
	/// Returns `TaggerError::BeamCollapse` if no tag sequence is possible,
	/// typically because no word model accepts a token.
	pub fn tag_sentence(&self, sentence: &[WordCap]) -> Result<Vec<PartOfSpeech>> {
		if sentence.is_empty() {
			return Ok(Vec::new());
		}

		let width = self.transition_model.context_width();
		let transition_model = &self.transition_model;
		let initial: Ancestor<PartOfSpeech> = Ancestor::create_initial(self.seeds())?;
		let mut beam = Beam::new(initial, width)
			.with_pruning(self.config.beam_threshold(), self.config.max_beam_width());

		for word_cap in sentence {
			// Emissions only depend on the token, not on the hypothesis.
			let emissions: Vec<(PartOfSpeech, f64)> = match self.word_model_for(word_cap) {
				Some(model) => model
					.candidates(word_cap)
					.into_iter()
					.map(|candidate| (candidate, model.log_probability_of_word(candidate, word_cap)))
					.collect(),
				None => Vec::new(),
			};

			beam.advance(|ancestor| {
				let context = ancestor.get_ngram(width);
				emissions.iter().map(move |&(candidate, emission)| {
					(transition_model.log_probability_of(candidate, context.as_slice()) + emission, candidate)
				})
			})
			.map_err(|error| match error {
				TaggerError::BeamCollapse { position, .. } => {
					TaggerError::BeamCollapse { position, word: word_cap.word().to_owned() }
				}
				error => error,
			})?;
		}

		let best = beam
			.finish(|ancestor| {
				let context = ancestor.get_ngram(width);
				(transition_model.log_probability_of(PartOfSpeech::Eos, context.as_slice()), PartOfSpeech::Eos)
			})
			.ok_or_else(|| TaggerError::BeamCollapse {
				position: sentence.len(),
				word: PartOfSpeech::Eos.to_string(),
			})?;

		debug!("Tagged {} tokens, log probability {}", sentence.len(), best.log_probability());

		Ok(best.history().into_iter().skip(width).take(sentence.len()).collect())
	}

	/// Tags a sentence given as plain words.
	pub fn tag_words(&self, words: &[&str]) -> Result<Vec<PartOfSpeech>> {
		let sentence: Vec<WordCap> = words.iter().map(|word| WordCap::new(word)).collect();
		self.tag_sentence(&sentence)
	}

	/// Tags independent sentences on several threads.
	///
	/// - The sentences are split in one chunk per worker (see
	///   `TaggerConfig::worker_count`)
	/// - Results come back in input order, one per sentence
	pub fn tag_sentences(&self, sentences: &[Vec<WordCap>]) -> Vec<Result<Vec<PartOfSpeech>>> {
		if sentences.is_empty() {
			return Vec::new();
		}

		let workers = self.config.worker_count().clamp(1, sentences.len());
		let chunk_size = sentences.len().div_ceil(workers);
		debug!("Tagging {} sentences with {} workers", sentences.len(), workers);

		let (tx, rx) = mpsc::channel();
		thread::scope(|scope| {
			for (chunk_index, chunk) in sentences.chunks(chunk_size).enumerate() {
				let tx = tx.clone();
				scope.spawn(move || {
					let tagged: Vec<_> = chunk.iter().map(|sentence| self.tag_sentence(sentence)).collect();
					tx.send((chunk_index, tagged)).expect("Failed to send from thread");
				});
			}
		});
		drop(tx);

		let mut chunks: Vec<_> = rx.into_iter().collect();
		chunks.sort_by_key(|(chunk_index, _)| *chunk_index);
		chunks.into_iter().flat_map(|(_, tagged)| tagged).collect()
	}
}
