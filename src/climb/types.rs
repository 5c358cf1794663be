//! Core trait for allocation search.

use crate::error::Result;
use crate::program::Allocation;

/// An objective over time allocations.
///
/// The hill climber maximizes [`expected_utility`](Self::expected_utility).
/// Implementations must be pure: the same allocation always scores the
/// same, and scoring never mutates shared state, so candidates can be
/// evaluated concurrently.
pub trait AllocationProblem: Sync {
    /// Total time shared by all nodes.
    fn budget(&self) -> f64;

    /// Scores an allocation. Higher is better.
    fn expected_utility(&self, allocation: &Allocation) -> Result<f64>;

    /// Maps a score to the value shown in logs.
    fn report(&self, value: f64) -> f64 {
        value
    }
}
