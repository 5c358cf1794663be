//! Quality propagation through the DAG.
//!
//! Every node's point quality is the profile's mean at the node's own time
//! conditioned on the point qualities of its parents, which are derived
//! the same way, recursively, down to the leaves.

use std::collections::HashMap;

use super::allocation::Allocation;
use crate::dag::Dag;
use crate::error::{ContractError, Result};
use crate::profile::PerformanceProfile;

/// Derives point qualities for one allocation.
///
/// Ancestor qualities are memoised for the lifetime of the propagator, so
/// shared ancestors are resolved once per allocation.
pub struct QualityPropagator<'a> {
    dag: &'a Dag,
    profile: &'a PerformanceProfile,
    allocation: &'a Allocation,
    memo: HashMap<usize, f64>,
}

impl<'a> QualityPropagator<'a> {
    pub fn new(dag: &'a Dag, profile: &'a PerformanceProfile, allocation: &'a Allocation) -> Self {
        Self {
            dag,
            profile,
            allocation,
            memo: HashMap::new(),
        }
    }

    /// Qualities of the direct parents of `node_id`, in parent order.
    ///
    /// Empty for a leaf.
    pub fn parent_qualities(&mut self, node_id: usize) -> Result<Vec<f64>> {
        let dag = self.dag;
        let node = dag.node(node_id)?;
        node.parents
            .iter()
            .map(|&parent| self.node_quality(parent))
            .collect()
    }

    /// Point quality of `node_id` given its own time and its ancestors'.
    pub fn node_quality(&mut self, node_id: usize) -> Result<f64> {
        if let Some(&quality) = self.memo.get(&node_id) {
            return Ok(quality);
        }
        let parents = self.parent_qualities(node_id)?;
        let time = self
            .allocation
            .time(node_id)
            .ok_or(ContractError::NodeNotFound(node_id))?;
        let quality = self
            .profile
            .average_quality_estimate(node_id, time, &parents)?;
        self.memo.insert(node_id, quality);
        Ok(quality)
    }
}
