//! Performance Profile Store.
//!
//! An immutable, in-memory view of the empirical performance profiles of
//! every node: `(node id, rounded parent qualities, time) -> samples`.
//! Loaded once from a JSON document and shared read-only by every
//! evaluation.

mod config;
mod document;
mod store;

pub use config::ProfileConfig;
pub use document::{NodeProfile, ProfileDocument, QualityTree};
pub use store::{average_quality, round_nearest, PerformanceProfile};
