/// The two most recent states of a history, oldest first.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Bigram<S> {
	first: S,
	second: S,
}

impl<S> Bigram<S> {
	pub fn new(first: S, second: S) -> Self {
		Self { first, second }
	}

	pub fn first(&self) -> &S {
		&self.first
	}

	pub fn second(&self) -> &S {
		&self.second
	}
}

/// Up to `k` most recent states of a history, oldest first.
///
/// Used as the dynamic programming merge key: two hypotheses ending with
/// the same `Ngram` can never be told apart by the rest of the decoding.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Ngram<S> {
	states: Vec<S>,
}

impl<S> Ngram<S> {
	/// Builds an n-gram from states ordered oldest first.
	pub fn create(states: Vec<S>) -> Self {
		Self { states }
	}

	/// Builds an n-gram from states ordered most recent first.
	///
	/// This is the order in which a history walk yields them.
	pub(crate) fn from_most_recent(mut states: Vec<S>) -> Self {
		states.reverse();
		Self { states }
	}

	pub fn len(&self) -> usize {
		self.states.len()
	}

	pub fn is_empty(&self) -> bool {
		self.states.is_empty()
	}

	pub fn as_slice(&self) -> &[S] {
		&self.states
	}

	/// The last two states as a bigram, if there are at least two.
	pub fn to_bigram(&self) -> Option<Bigram<S>>
	where
		S: Clone,
	{
		match self.states.as_slice() {
			[.., first, second] => Some(Bigram::new(first.clone(), second.clone())),
			_ => None,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_from_most_recent_reverses() {
		let ngram = Ngram::from_most_recent(vec!["3", "2", "1"]);
		assert_eq!(ngram.as_slice(), &["1", "2", "3"]);
	}

	#[test]
	fn test_to_bigram() {
		let ngram = Ngram::create(vec!["1", "2", "3"]);
		let bigram = ngram.to_bigram().unwrap();
		assert_eq!(bigram.first(), &"2");
		assert_eq!(bigram.second(), &"3");
		assert!(Ngram::create(vec!["1"]).to_bigram().is_none());
	}
}
