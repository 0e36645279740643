use alloc::vec::Vec;

use crate::DistanceHistories;
use crate::helper::{mean_of_counts, median_of_sorted_counts, stddev_of_counts};

/// Aggregate descriptive statistics over a set of distance histories.
///
/// Built once from the histories of a processed trace; every aggregate
/// is then answered from pre-sorted lists. Aggregates over data that may
/// be absent return `Option`: a trace without a single repeat has no
/// distance statistics, and that is routine, not an error.
///
/// Means and standard deviations are accumulated with compensated
/// summation; standard deviations are population ones.
#[derive(Debug, Clone)]
pub struct TraceSummary {
    /// Total number of recorded accesses
    accesses: usize,
    /// Number of distinct tokens
    distinct: usize,
    /// Number of tokens that were never re-referenced
    no_reuse: usize,
    /// Every recorded distance, ascending
    distances: Vec<usize>,
    /// Per-token access counts, ascending
    access_counts: Vec<usize>,
}

impl TraceSummary {
    /// Aggregates a set of histories, e.g. from
    /// [`ReuseDistances::histories`](crate::ReuseDistances::histories)
    /// or [`rescan_histories`](crate::rescan_histories).
    ///
    /// A token's access count is its recorded distance count plus one,
    /// the first occurrence having recorded nothing.
    pub fn from_histories<T>(histories: &DistanceHistories<T>) -> Self {
        let mut distances = Vec::new();
        let mut access_counts = Vec::with_capacity(histories.len());
        let mut no_reuse = 0;

        for history in histories.values() {
            if history.is_empty() {
                no_reuse += 1;
            }
            distances.extend_from_slice(history);
            access_counts.push(history.len() + 1);
        }
        distances.sort_unstable();
        access_counts.sort_unstable();
        let accesses: usize = access_counts.iter().sum();

        Self {
            accesses,
            distinct: histories.len(),
            no_reuse,
            distances,
            access_counts,
        }
    }

    /// Returns the total number of accesses in the trace.
    pub const fn accesses(&self) -> usize {
        self.accesses
    }

    /// Returns the number of distinct tokens in the trace.
    pub const fn distinct_tokens(&self) -> usize {
        self.distinct
    }

    /// Returns the number of recorded distances, i.e. repeats.
    pub fn reuse_count(&self) -> usize {
        self.distances.len()
    }

    /// Returns the number of tokens accessed exactly once.
    pub const fn tokens_without_reuse(&self) -> usize {
        self.no_reuse
    }

    /// Returns the smallest recorded distance.
    pub fn min_distance(&self) -> Option<usize> {
        self.distances.first().copied()
    }

    /// Returns the largest recorded distance.
    pub fn max_distance(&self) -> Option<usize> {
        self.distances.last().copied()
    }

    /// Returns the mean of all recorded distances.
    pub fn mean_distance(&self) -> Option<f64> {
        mean_of_counts(&self.distances)
    }

    /// Returns the median of all recorded distances.
    pub fn median_distance(&self) -> Option<f64> {
        median_of_sorted_counts(&self.distances)
    }

    /// Returns the population standard deviation of all recorded
    /// distances.
    pub fn stddev_distance(&self) -> Option<f64> {
        stddev_of_counts(&self.distances)
    }

    /// Returns the mean per-token access count.
    pub fn mean_accesses(&self) -> Option<f64> {
        mean_of_counts(&self.access_counts)
    }

    /// Returns the median per-token access count.
    pub fn median_accesses(&self) -> Option<f64> {
        median_of_sorted_counts(&self.access_counts)
    }

    /// Returns the population standard deviation of per-token access
    /// counts.
    pub fn stddev_accesses(&self) -> Option<f64> {
        stddev_of_counts(&self.access_counts)
    }

    /// Returns the access count of the most referenced token.
    pub fn max_accesses(&self) -> Option<usize> {
        self.access_counts.last().copied()
    }
}
