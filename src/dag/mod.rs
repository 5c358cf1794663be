//! Read-only DAG of contract algorithms.
//!
//! Edges run from parents (leaves) towards the single sink (root). Nodes
//! are stored in an arena indexed by id; parents are back-references by
//! id and never owned.

mod graph;

pub use graph::{Dag, Node};
