use thiserror::Error;

/// Errors raised while building models or decoding sentences.
///
/// Zero probabilities are not errors: models signal them with
/// `f64::NEG_INFINITY`. Only conditions the caller must react to end up here.
#[derive(Debug, Error)]
pub enum TaggerError {
	/// A history was requested without any concrete seed state.
	#[error("initial history requires at least one seed state")]
	EmptySeed,

	/// No hypothesis survived the expansion of a token.
	#[error("no viable tag for token {position} ({word:?})")]
	BeamCollapse { position: usize, word: String },

	/// A model was assembled from inconsistent parts.
	#[error("invalid model: {0}")]
	InvalidModel(String),

	/// A configuration value is out of range.
	#[error("invalid configuration: {0}")]
	InvalidConfig(String),

	/// A probability table line could not be parsed.
	#[error("malformed table at line {line}: {reason}")]
	MalformedTable { line: usize, reason: String },

	/// A tag spelling is not part of the tag set.
	#[error("unknown part of speech tag {0:?}")]
	UnknownTag(String),

	#[error(transparent)]
	Io(#[from] std::io::Error),

	#[error(transparent)]
	Serialization(#[from] postcard::Error),
}

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, TaggerError>;
