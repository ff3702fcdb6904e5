use std::sync::Arc;

/// One node of a persistent, append-only decoding history.
///
/// A node holds a slot (a state, or nothing for a position whose state is
/// supplied later) and a shared reference to the node before it. Appending
/// never touches existing nodes, so any number of hypotheses can share a
/// common tail; a node lives as long as some hypothesis still reaches it.
///
/// ## Invariants
/// - Back references only point to older nodes: the chain is acyclic
/// - A node is never mutated after construction
#[derive(Debug)]
pub struct HistoryChain<S> {
	slot: Option<S>,
	previous: Option<Arc<HistoryChain<S>>>,
}

impl<S> HistoryChain<S> {
	/// Creates a node following `previous` (or a root when `None`).
	pub fn new(slot: Option<S>, previous: Option<Arc<HistoryChain<S>>>) -> Self {
		Self { slot, previous }
	}

	/// The state held by this node, `None` for a vacant slot.
	pub fn state(&self) -> Option<&S> {
		self.slot.as_ref()
	}

	/// The node before this one, `None` at the root.
	pub fn previous(&self) -> Option<&HistoryChain<S>> {
		self.previous.as_deref()
	}

	/// Walks the chain from this node back to the root.
	pub fn iter(&self) -> Iter<'_, S> {
		Iter { next: Some(self) }
	}

	/// Concrete states from this node back to the root, vacancies skipped.
	pub fn states(&self) -> impl Iterator<Item = &S> {
		self.iter().filter_map(HistoryChain::state)
	}

	/// Number of nodes from the root to this node, both included.
	pub fn depth(&self) -> usize {
		self.iter().count()
	}
}

/// Iterator over the nodes of a chain, most recent first.
pub struct Iter<'a, S> {
	next: Option<&'a HistoryChain<S>>,
}

impl<'a, S> Iterator for Iter<'a, S> {
	type Item = &'a HistoryChain<S>;

	fn next(&mut self) -> Option<Self::Item> {
		let current = self.next?;
		self.next = current.previous();
		Some(current)
	}
}

impl<S> Drop for HistoryChain<S> {
	// Unlinks the tail iteratively; the default recursive drop would use
	// one stack frame per node of a uniquely owned tail.
	fn drop(&mut self) {
		let mut previous = self.previous.take();
		while let Some(node) = previous {
			match Arc::try_unwrap(node) {
				Ok(mut unique) => previous = unique.previous.take(),
				Err(_) => break,
			}
		}
	}
}
