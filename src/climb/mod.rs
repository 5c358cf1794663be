//! Naive hill climbing over time allocations.
//!
//! Each round tries every ordered pair of distinct nodes `(i, j)`, moving
//! `step` seconds from `i` to `j`, and commits to the best strictly
//! improving candidate. A round with no improvement divides `step` by the
//! decay factor; the search ends once `step` is at or below the threshold.
//!
//! A local search: no restarts, no optimality guarantee.

mod config;
mod runner;
mod types;

pub use config::HillClimbConfig;
pub use runner::{HillClimbResult, HillClimbRunner};
pub use types::AllocationProblem;
