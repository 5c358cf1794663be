//! Error type shared by every module of the crate.

use thiserror::Error;

/// Errors raised while loading profiles or evaluating allocations.
#[derive(Debug, Error)]
pub enum ContractError {
    /// A node id, parent-quality path, or time key is absent from the
    /// performance profile.
    #[error("missing profile entry for node {node_id} at time {time} (path: {})", .path.join(" -> "))]
    MissingProfileEntry {
        node_id: usize,
        time: f64,
        /// Keys attempted, outermost first.
        path: Vec<String>,
    },

    /// A key exists but maps to an empty sample list.
    #[error("null performance mapping for node {node_id} at key {key}")]
    NullMapping { node_id: usize, key: String },

    /// Interval probability requested over an empty sample set.
    #[error("interval probability over an empty sample set")]
    EmptySampleSet,

    #[error("malformed profile: {0}")]
    MalformedProfile(String),

    #[error("node not found with id {0}")]
    NodeNotFound(usize),

    #[error("invalid dag: {0}")]
    InvalidDag(String),

    #[error("allocation has {actual} entries but the dag has {expected} nodes")]
    AllocationMismatch { expected: usize, actual: usize },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, ContractError>;
