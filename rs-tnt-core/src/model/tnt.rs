use std::fs;
use std::path::Path;

use log::info;
use serde::{Deserialize, Serialize};

use crate::error::Result;

use super::config::TaggerConfig;
use super::tagger::Tagger;
use super::transition::TagTrigramModel;
use super::word_model::WordModel;

/// Everything a TnT tagger learned, as a single serializable bundle.
///
/// - `transition`: tag trigram model
/// - `word_models`: emission models, in the order the tagger consults them
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct TntModel {
	pub transition: TagTrigramModel,
	pub word_models: Vec<WordModel>,
}

impl TntModel {
	pub fn new(transition: TagTrigramModel, word_models: Vec<WordModel>) -> Self {
		Self { transition, word_models }
	}

	/// Loads a bundle written by `save`.
	///
	/// # Errors
	/// Returns an error if the file cannot be read or is not a valid bundle.
	pub fn load<P: AsRef<Path>>(filepath: P) -> Result<Self> {
		let filepath = filepath.as_ref();
		let bytes = fs::read(filepath)?;
		let model: Self = postcard::from_bytes(&bytes)?;
		info!("Model loaded from {}: {} word models", filepath.display(), model.word_models.len());
		Ok(model)
	}

	/// Writes the bundle with `postcard`.
	pub fn save<P: AsRef<Path>>(&self, filepath: P) -> Result<()> {
		let bytes = postcard::to_stdvec(self)?;
		fs::write(filepath, bytes)?;
		Ok(())
	}

	/// Builds a tagger using this bundle.
	///
	/// # Errors
	/// Returns `TaggerError::InvalidModel` if the bundle has no word model.
	pub fn into_tagger(self, config: TaggerConfig) -> Result<Tagger> {
		Tagger::new(self.transition, self.word_models, config)
	}
}

#[cfg(test)]
mod tests {
	use std::collections::HashMap;

	use super::*;
	use crate::error::TaggerError;
	use crate::model::capitalization::{CapitalizationAdapter, CapitalizationFilter};
	use crate::model::known_word::KnownWordModel;
	use crate::model::part_of_speech::PartOfSpeech::{Bbs, Bos, Dt, Eos, Nn};

	fn model() -> TntModel {
		let transition = TagTrigramModel::from_grams(
			[0.1, 0.2, 0.7],
			vec![
				(vec![Dt], 0.5),
				(vec![Nn], 0.5),
				(vec![Bbs, Bos, Dt], 1.0),
				(vec![Bos, Dt, Nn], 1.0),
				(vec![Dt, Nn, Eos], 1.0),
			],
		)
		.unwrap();

		let mut lexicon = HashMap::new();
		lexicon.insert("the".to_owned(), HashMap::from([(Dt, 0.0)]));
		lexicon.insert("cat".to_owned(), HashMap::from([(Nn, 0.0)]));
		let known = KnownWordModel::new(lexicon, CapitalizationFilter::Any, CapitalizationAdapter::Fold);

		TntModel::new(transition, vec![known.into()])
	}

	#[test]
	fn test_save_and_load() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("model.bin");
		model().save(&path).unwrap();

		let tagger = TntModel::load(&path).unwrap().into_tagger(TaggerConfig::default()).unwrap();
		assert_eq!(tagger.tag_words(&["The", "cat"]).unwrap(), vec![Dt, Nn]);
	}

	#[test]
	fn test_load_garbage() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("model.bin");
		fs::write(&path, [0xff; 3]).unwrap();
		assert!(matches!(TntModel::load(&path), Err(TaggerError::Serialization(_))));
		assert!(matches!(TntModel::load(dir.path().join("missing.bin")), Err(TaggerError::Io(_))));
	}

	#[test]
	fn test_bundle_without_word_model() {
		let empty = TntModel::new(model().transition, Vec::new());
		assert!(matches!(empty.into_tagger(TaggerConfig::default()), Err(TaggerError::InvalidModel(_))));
	}
}
