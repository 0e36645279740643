use ahash::RandomState;
use hashbrown::HashMap;

use alloc::vec::Vec;

use core::hash::Hash;

use crate::{RecencyTree, TraceSummary};

/// Token → append-only list of recorded stack distances, in trace order.
///
/// A token seen exactly once maps to an empty list.
pub type DistanceHistories<T> = HashMap<T, Vec<usize>, RandomState>;

/// Streaming stack-distance engine over an ordered access trace.
///
/// Feed tokens one at a time with [`record`](Self::record). For every
/// repeated reference the engine appends the token's stack distance,
/// the number of distinct tokens accessed since its previous
/// occurrence, to that token's history.
///
/// Internally one [`RecencyTree`] node is live per distinct token. A
/// repeat is a rank query on the token's node, then a delete and a
/// reinsert at the most recent position; the token → node index is
/// repaired within the same call, so it never observably points at a
/// detached node. Each `record` costs O(log n) in the distinct-token
/// count; tree size equals the distinct-token count and never decreases.
///
/// Replaying the same trace through a fresh engine yields identical
/// histories.
#[derive(Debug, Clone)]
pub struct ReuseDistances<T> {
    /// Recency-ordered tree of all distinct tokens seen
    tree: RecencyTree<T>,
    /// Token → its live node slot in the tree
    index: HashMap<T, usize, RandomState>,
    /// Token → recorded stack distances
    history: DistanceHistories<T>,
    /// Number of accesses recorded so far
    accesses: usize,
}

impl<T: Eq + Hash + Clone> ReuseDistances<T> {
    /// Creates an engine with no recorded accesses.
    pub fn new() -> Self {
        Self {
            tree: RecencyTree::new(),
            index: HashMap::with_hasher(RandomState::default()),
            history: HashMap::with_hasher(RandomState::default()),
            accesses: 0,
        }
    }

    /// Creates an engine sized for an expected distinct-token count.
    pub fn with_capacity(tokens: usize) -> Self {
        Self {
            tree: RecencyTree::with_capacity(tokens),
            index: HashMap::with_capacity_and_hasher(tokens, RandomState::default()),
            history: HashMap::with_capacity_and_hasher(tokens, RandomState::default()),
            accesses: 0,
        }
    }

    /// Builds an engine by recording an entire trace in order.
    pub fn from_trace<I>(trace: I) -> Self
    where
        I: IntoIterator<Item = T>,
    {
        let mut engine = Self::new();
        engine.record_all(trace);
        engine
    }

    /// Records one access.
    ///
    /// A first occurrence only enters the token into the tree and opens
    /// its empty history. A repeat appends the token's stack distance to
    /// its history and moves the token back to the most recent position.
    pub fn record(&mut self, token: T) {
        self.accesses += 1;
        match self.index.get(&token).copied() {
            None => {
                let node = self.tree.insert_most_recent(token.clone());
                self.index.insert(token.clone(), node);
                self.history.insert(token, Vec::new());
            }
            Some(node) => {
                let distance = self.tree.rank(node);
                self.history.entry(token.clone()).or_default().push(distance);

                // Delete and reinsert as one step: a successor swap in
                // the tree relocates some other token's node, and the
                // index must follow before anything else observes it.
                if let Some(moved) = self.tree.remove(node) {
                    let tenant = self.tree.token(moved).clone();
                    self.index.insert(tenant, moved);
                }
                let fresh = self.tree.insert_most_recent(token.clone());
                self.index.insert(token, fresh);
            }
        }
    }

    /// Records every access of `trace` in order.
    pub fn record_all<I>(&mut self, trace: I) -> &mut Self
    where
        I: IntoIterator<Item = T>,
    {
        for token in trace {
            self.record(token);
        }
        self
    }

    /// Returns the recorded distances of one token, oldest first, or
    /// `None` if the token was never seen. A token seen exactly once
    /// yields an empty slice.
    pub fn distances(&self, token: &T) -> Option<&[usize]> {
        self.history.get(token).map(Vec::as_slice)
    }

    /// Returns every token's distance history.
    pub fn histories(&self) -> &DistanceHistories<T> {
        &self.history
    }

    /// Consumes the engine, yielding the distance histories.
    pub fn into_histories(self) -> DistanceHistories<T> {
        self.history
    }

    /// Returns the number of accesses recorded so far.
    pub const fn accesses(&self) -> usize {
        self.accesses
    }

    /// Returns the number of distinct tokens seen so far.
    pub fn distinct_tokens(&self) -> usize {
        self.index.len()
    }

    /// Computes aggregate statistics over the histories recorded so far.
    pub fn summary(&self) -> TraceSummary {
        TraceSummary::from_histories(&self.history)
    }

    /// Forgets every recorded access, keeping allocations.
    pub fn reset(&mut self) -> &mut Self {
        self.tree.clear();
        self.index.clear();
        self.history.clear();
        self.accesses = 0;
        self
    }
}

impl<T: Eq + Hash + Clone> Default for ReuseDistances<T> {
    fn default() -> Self {
        Self::new()
    }
}
