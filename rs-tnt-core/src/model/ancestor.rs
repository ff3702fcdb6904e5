use std::sync::Arc;

use crate::error::{Result, TaggerError};

use super::grams::{Bigram, Ngram};
use super::history::HistoryChain;

/// A decoding hypothesis: a shared history plus its cumulative log probability.
///
/// Cloning is O(1) and extending never mutates the parent, so every
/// hypothesis of a beam can keep sharing the tail it descends from.
///
/// ## Invariants
/// - The history holds at least one concrete state
/// - `log_probability` is the sum of every increment applied since
///   `create_initial`; increments are log probabilities, hence <= 0
#[derive(Clone, Debug)]
pub struct Ancestor<S> {
	history_chain: Arc<HistoryChain<S>>,
	log_probability: f64,
}

impl<S: Clone> Ancestor<S> {
	/// Creates the hypothesis every decoding starts from.
	///
	/// The chain's most recent node is the last seed. A seed may be `None`:
	/// the slot stays vacant and is filled by `get_history`.
	///
	/// # Errors
	/// Returns `TaggerError::EmptySeed` if no seed holds a concrete state.
	pub fn create_initial<I, T>(seeds: I) -> Result<Self>
	where
		I: IntoIterator<Item = T>,
		T: Into<Option<S>>,
	{
		let mut history_chain = None;
		let mut has_state = false;
		for seed in seeds {
			let slot = seed.into();
			has_state |= slot.is_some();
			history_chain = Some(Arc::new(HistoryChain::new(slot, history_chain)));
		}

		match history_chain {
			Some(history_chain) if has_state => Ok(Self { history_chain, log_probability: 0.0 }),
			_ => Err(TaggerError::EmptySeed),
		}
	}

	/// Extends this hypothesis with `state`, adding `log_probability` to
	/// the cumulative score.
	pub fn create_descendant(&self, log_probability: f64, state: S) -> Self {
		debug_assert!(!(log_probability > 0.0), "positive log probability {log_probability}");
		self.extend(log_probability, Some(state))
	}

	/// Repeats the most recent slot at no cost.
	///
	/// Pads context windows at sequence boundaries without consuming an
	/// observation.
	pub fn skip(&self) -> Self {
		self.extend(0.0, self.history_chain.state().cloned())
	}

	fn extend(&self, log_probability: f64, slot: Option<S>) -> Self {
		Self {
			history_chain: Arc::new(HistoryChain::new(slot, Some(Arc::clone(&self.history_chain)))),
			log_probability: self.log_probability + log_probability,
		}
	}

	/// Full history from the first seed to the most recent state, with
	/// `trailing` standing for the pending position.
	///
	/// Vacant slots are reported as `trailing`. A chain without vacancies
	/// gets `trailing` appended after its most recent state.
	pub fn get_history(&self, trailing: S) -> Vec<S> {
		let mut slots: Vec<Option<&S>> = self.history_chain.iter().map(HistoryChain::state).collect();
		slots.reverse();

		let has_vacancy = slots.iter().any(Option::is_none);
		let mut history: Vec<S> = slots
			.into_iter()
			.map(|slot| slot.cloned().unwrap_or_else(|| trailing.clone()))
			.collect();
		if !has_vacancy {
			history.push(trailing);
		}
		history
	}

	/// Concrete states from the first seed to the most recent one.
	pub fn history(&self) -> Vec<S> {
		let mut history: Vec<S> = self.history_chain.states().cloned().collect();
		history.reverse();
		history
	}

	/// The `k` most recent concrete states, oldest first.
	///
	/// Shorter than `k` when the history holds fewer states.
	pub fn get_ngram(&self, k: usize) -> Ngram<S> {
		Ngram::from_most_recent(self.history_chain.states().take(k).cloned().collect())
	}

	/// The two most recent concrete states, if the history holds two.
	pub fn get_bigram(&self) -> Option<Bigram<S>> {
		self.get_ngram(2).to_bigram()
	}

	/// The most recent concrete state.
	pub fn most_recent(&self) -> &S {
		// Should not panic: create_initial rejects chains without a state
		// and descendants only ever add concrete states.
		self.history_chain.states().next().expect("history without concrete state")
	}
}

impl<S> Ancestor<S> {
	pub fn log_probability(&self) -> f64 {
		self.log_probability
	}

	/// Number of slots in the history, seeds included.
	pub fn depth(&self) -> usize {
		self.history_chain.depth()
	}

	/// Returns the hypothesis with the strictly greater log probability;
	/// `first` wins ties.
	pub fn more_probable(first: Self, second: Self) -> Self {
		if second.log_probability > first.log_probability {
			second
		} else {
			first
		}
	}
}
