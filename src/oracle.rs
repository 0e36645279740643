//! Brute-force reference algorithm for cross-validating the engine.

use ahash::RandomState;
use hashbrown::{HashMap, HashSet};

use alloc::vec::Vec;

use core::hash::Hash;

use crate::DistanceHistories;

/// Computes distance histories by rescanning the trace gap between each
/// repeat and its previous occurrence.
///
/// For every repeated token the distance is the cardinality of the
/// distinct-token set strictly between the two occurrences, collected
/// by brute force. Cost per repeat is proportional to the gap length,
/// up to O(n²) over the whole trace, so this exists as a correctness
/// reference for [`ReuseDistances`](crate::ReuseDistances), not as a
/// production path. Both produce identical histories for any trace.
pub fn rescan_histories<T: Eq + Hash + Clone>(trace: &[T]) -> DistanceHistories<T> {
    let mut last_seen: HashMap<&T, usize, RandomState> =
        HashMap::with_hasher(RandomState::default());
    let mut histories = DistanceHistories::with_hasher(RandomState::default());

    for (position, token) in trace.iter().enumerate() {
        match last_seen.get(token).copied() {
            None => {
                histories.insert(token.clone(), Vec::new());
            }
            Some(previous) => {
                let mut intervening: HashSet<&T, RandomState> =
                    HashSet::with_hasher(RandomState::default());
                for other in &trace[previous + 1..position] {
                    intervening.insert(other);
                }
                histories.entry(token.clone()).or_default().push(intervening.len());
            }
        }
        last_seen.insert(token, position);
    }
    histories
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_trace_yields_no_histories() {
        let histories = rescan_histories::<u64>(&[]);
        assert!(histories.is_empty());
    }

    #[test]
    fn single_access_opens_empty_history() {
        let histories = rescan_histories(&[42_u64]);
        assert_eq!(histories[&42], vec![]);
    }

    #[test]
    fn gap_rescan_counts_distinct_tokens_only() {
        // Between the repeats of 1 the gap 2 3 2 holds two distinct
        // tokens, not three accesses.
        let histories = rescan_histories(&[1_u64, 2, 3, 2, 1]);
        assert_eq!(histories[&1], vec![2]);
        assert_eq!(histories[&2], vec![1]);
        assert_eq!(histories[&3], vec![]);
    }

    #[test]
    fn interleaved_trace_manual_derivation() {
        let histories = rescan_histories(&[1_u64, 2, 1, 3, 2, 1]);
        assert_eq!(histories[&1], vec![1, 2]);
        assert_eq!(histories[&2], vec![2]);
        assert_eq!(histories[&3], vec![]);
    }

    #[test]
    fn immediate_repeats_have_distance_zero() {
        let histories = rescan_histories(&[7_u64, 7, 7]);
        assert_eq!(histories[&7], vec![0, 0]);
    }
}
