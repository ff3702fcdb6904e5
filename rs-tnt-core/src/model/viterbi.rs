use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::hash::Hash;

use log::trace;

use crate::error::{Result, TaggerError};

use super::ancestor::Ancestor;
use super::grams::Ngram;

/// Viterbi beam over decoding hypotheses.
///
/// # Responsibilities
/// - Expand every hypothesis with the states proposed for the next position
/// - Merge hypotheses sharing the same recent context, keeping the best
/// - Prune hypotheses that fell too far behind the best one
///
/// # Invariants
/// - Never empty: an `advance` that leaves no hypothesis fails instead
/// - After an `advance`, at most one hypothesis per distinct context of
///   `context_width` states
/// - Hypotheses are kept in insertion order, so ties always resolve the
///   same way
#[derive(Debug)]
pub struct Beam<S> {
	ancestors: Vec<Ancestor<S>>,
	context_width: usize,
	threshold: Option<f64>,
	max_width: Option<usize>,
	position: usize,
}

impl<S: Clone + Eq + Hash> Beam<S> {
	/// Starts a beam holding only `initial`, without pruning.
	///
	/// `context_width` is the number of recent states that make two
	/// hypotheses interchangeable for the rest of the decoding.
	pub fn new(initial: Ancestor<S>, context_width: usize) -> Self {
		Self {
			ancestors: vec![initial],
			context_width,
			threshold: None,
			max_width: None,
			position: 0,
		}
	}

	/// Enables pruning.
	///
	/// - `threshold`: log ratio below the best hypothesis past which
	///   hypotheses are dropped
	/// - `max_width`: number of hypotheses kept, the most probable first
	pub fn with_pruning(mut self, threshold: Option<f64>, max_width: Option<usize>) -> Self {
		self.threshold = threshold;
		self.max_width = max_width;
		self
	}

	pub fn len(&self) -> usize {
		self.ancestors.len()
	}

	pub fn is_empty(&self) -> bool {
		self.ancestors.is_empty()
	}

	/// Number of positions consumed so far.
	pub fn position(&self) -> usize {
		self.position
	}

	pub fn ancestors(&self) -> &[Ancestor<S>] {
		&self.ancestors
	}

	/// Moves the beam one position forward.
	///
	/// `expand` proposes `(log probability increment, state)` pairs for a
	/// hypothesis. Impossible increments (`NEG_INFINITY` or NaN) are skipped.
	///
	/// # Errors
	/// Returns `TaggerError::BeamCollapse` if no hypothesis survives; the
	/// beam is left untouched in that case. The error carries the position
	/// but no word, the beam does not know what it decodes.
	pub fn advance<F, I>(&mut self, mut expand: F) -> Result<()>
	where
		F: FnMut(&Ancestor<S>) -> I,
		I: IntoIterator<Item = (f64, S)>,
	{
		let mut index: HashMap<Ngram<S>, usize> = HashMap::new();
		let mut merged: Vec<Ancestor<S>> = Vec::new();

		for ancestor in &self.ancestors {
			for (log_probability, state) in expand(ancestor) {
				if !(log_probability > f64::NEG_INFINITY) {
					continue;
				}
				let descendant = ancestor.create_descendant(log_probability, state);
				match index.entry(descendant.get_ngram(self.context_width)) {
					Entry::Occupied(slot) => {
						let kept = &mut merged[*slot.get()];
						*kept = Ancestor::more_probable(kept.clone(), descendant);
					}
					Entry::Vacant(slot) => {
						slot.insert(merged.len());
						merged.push(descendant);
					}
				}
			}
		}

		if merged.is_empty() {
			return Err(TaggerError::BeamCollapse { position: self.position, word: String::new() });
		}

		let expanded = merged.len();
		self.prune(&mut merged);
		trace!("Beam at position {}: {} contexts, {} kept", self.position, expanded, merged.len());

		self.ancestors = merged;
		self.position += 1;
		Ok(())
	}

	fn prune(&self, ancestors: &mut Vec<Ancestor<S>>) {
		if let Some(threshold) = self.threshold {
			let best = ancestors
				.iter()
				.map(Ancestor::log_probability)
				.fold(f64::NEG_INFINITY, f64::max);
			ancestors.retain(|ancestor| ancestor.log_probability() >= best - threshold);
		}

		if let Some(max_width) = self.max_width {
			if ancestors.len() > max_width {
				// Stable: equally probable hypotheses keep their insertion order.
				ancestors.sort_by(|a, b| b.log_probability().total_cmp(&a.log_probability()));
				ancestors.truncate(max_width);
			}
		}
	}

	/// Most probable hypothesis of the current beam.
	pub fn best(&self) -> Option<Ancestor<S>> {
		self.ancestors.iter().cloned().reduce(Ancestor::more_probable)
	}

	/// Closes the decoding: extends each hypothesis with the final
	/// `(increment, state)` given by `terminal` and returns the most
	/// probable result.
	///
	/// `None` when every final increment is impossible.
	pub fn finish<F>(self, mut terminal: F) -> Option<Ancestor<S>>
	where
		F: FnMut(&Ancestor<S>) -> (f64, S),
	{
		self.ancestors
			.iter()
			.filter_map(|ancestor| {
				let (log_probability, state) = terminal(ancestor);
				(log_probability > f64::NEG_INFINITY).then(|| ancestor.create_descendant(log_probability, state))
			})
			.reduce(Ancestor::more_probable)
	}
}
