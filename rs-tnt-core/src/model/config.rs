use crate::error::{Result, TaggerError};

/// Default ratio between the best hypothesis and the worst one kept in the
/// beam (TnT uses 1000).
const DEFAULT_BEAM_RATIO: f64 = 1000.0;

/// Decoding parameters of a `Tagger`.
///
/// # Responsibilities
/// - Track the beam pruning parameters (`beam_threshold`, `max_beam_width`)
/// - Track how many workers batch tagging may use
///
/// # Invariants
/// - `beam_threshold`, when set, is a positive log ratio (`inf` keeps everything)
/// - `max_beam_width`, when set, is at least 1
#[derive(Clone, Debug, PartialEq)]
pub struct TaggerConfig {
	/// Hypotheses whose log probability falls below `best - beam_threshold`
	/// are dropped after each token. `None` disables threshold pruning.
	beam_threshold: Option<f64>,

	/// Upper bound on the hypotheses kept after each token. `None` keeps
	/// every distinct context.
	max_beam_width: Option<usize>,

	/// Worker threads for `Tagger::tag_sentences`; 0 means one per CPU.
	workers: usize,
}

impl Default for TaggerConfig {
	fn default() -> Self {
		Self {
			beam_threshold: Some(DEFAULT_BEAM_RATIO.ln()),
			max_beam_width: None,
			workers: 0,
		}
	}
}

impl TaggerConfig {
	/// A configuration without any pruning: exact Viterbi decoding.
	pub fn exhaustive() -> Self {
		Self { beam_threshold: None, max_beam_width: None, workers: 0 }
	}

	pub fn beam_threshold(&self) -> Option<f64> {
		self.beam_threshold
	}

	pub fn max_beam_width(&self) -> Option<usize> {
		self.max_beam_width
	}

	/// Sets the pruning threshold, as a log ratio.
	///
	/// # Errors
	/// Returns an error if the threshold is not strictly positive.
	pub fn set_beam_threshold(&mut self, beam_threshold: Option<f64>) -> Result<()> {
		if let Some(threshold) = beam_threshold {
			if !(threshold > 0.0) {
				return Err(TaggerError::InvalidConfig(format!("beam threshold must be > 0, got {threshold}")));
			}
		}
		self.beam_threshold = beam_threshold;
		Ok(())
	}

	/// Sets the pruning threshold from a probability ratio (TnT's `-b`
	/// option): 1000 keeps hypotheses at least 1/1000 as likely as the best.
	///
	/// # Errors
	/// Returns an error if the ratio is not greater than 1.
	pub fn set_beam_ratio(&mut self, ratio: f64) -> Result<()> {
		if !(ratio > 1.0) {
			return Err(TaggerError::InvalidConfig(format!("beam ratio must be > 1, got {ratio}")));
		}
		self.set_beam_threshold(Some(ratio.ln()))
	}

	/// Caps the number of hypotheses kept per token.
	///
	/// # Errors
	/// Returns an error for a width of 0.
	pub fn set_max_beam_width(&mut self, max_beam_width: Option<usize>) -> Result<()> {
		if max_beam_width == Some(0) {
			return Err(TaggerError::InvalidConfig("max beam width must be >= 1".to_owned()));
		}
		self.max_beam_width = max_beam_width;
		Ok(())
	}

	pub fn workers(&self) -> usize {
		self.workers
	}

	/// Sets the number of batch tagging workers, 0 for one per CPU.
	pub fn set_workers(&mut self, workers: usize) {
		self.workers = workers;
	}

	/// Effective number of batch tagging workers.
	pub fn worker_count(&self) -> usize {
		if self.workers == 0 { num_cpus::get() } else { self.workers }
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_defaults() {
		let config = TaggerConfig::default();
		assert!((config.beam_threshold().unwrap() - 1000f64.ln()).abs() < 1e-12);
		assert_eq!(config.max_beam_width(), None);
		assert!(config.worker_count() >= 1);
	}

	#[test]
	fn test_invalid_values() {
		let mut config = TaggerConfig::default();
		assert!(config.set_beam_threshold(Some(0.0)).is_err());
		assert!(config.set_beam_threshold(Some(f64::NAN)).is_err());
		assert!(config.set_beam_ratio(0.5).is_err());
		assert!(config.set_max_beam_width(Some(0)).is_err());
		assert_eq!(config, TaggerConfig::default());
	}

	#[test]
	fn test_setters() {
		let mut config = TaggerConfig::exhaustive();
		config.set_beam_ratio(std::f64::consts::E).unwrap();
		assert!((config.beam_threshold().unwrap() - 1.0).abs() < 1e-12);
		config.set_beam_threshold(Some(f64::INFINITY)).unwrap();
		config.set_max_beam_width(Some(4)).unwrap();
		assert_eq!(config.max_beam_width(), Some(4));
		config.set_workers(3);
		assert_eq!(config.workers(), 3);
		assert_eq!(config.worker_count(), 3);
		config.set_workers(0);
		assert_eq!(config.worker_count(), num_cpus::get());
	}
}
