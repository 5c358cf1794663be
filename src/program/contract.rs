//! The contract program and its expected-utility evaluator.

use std::path::Path;

use rand::Rng;
use u_numflow::random::create_rng;

use super::allocation::Allocation;
use super::config::{GlobalUtility, ProgramConfig};
use super::propagation::QualityPropagator;
use crate::climb::{AllocationProblem, HillClimbConfig, HillClimbResult, HillClimbRunner};
use crate::dag::Dag;
use crate::error::{ContractError, Result};
use crate::profile::{average_quality, PerformanceProfile, ProfileDocument};

/// A DAG of contract algorithms sharing a fixed time budget.
///
/// Starts from a uniform allocation. The profile store and DAG are never
/// mutated; only the current allocation is replaced.
#[derive(Debug, Clone)]
pub struct ContractProgram {
    dag: Dag,
    profile: PerformanceProfile,
    config: ProgramConfig,
    allocation: Allocation,
}

impl ContractProgram {
    /// Creates a program from a loaded profile store.
    ///
    /// The store must have been built with `config.profile_config()` and
    /// must contain an entry for every node.
    pub fn new(dag: Dag, profile: PerformanceProfile, config: ProgramConfig) -> Result<Self> {
        config.validate().map_err(ContractError::InvalidConfig)?;
        if profile.config() != &config.profile_config() {
            return Err(ContractError::InvalidConfig(
                "profile discretization does not match the program configuration".into(),
            ));
        }
        if let GlobalUtility::Weighted(weights) = &config.utility {
            if weights.len() != dag.order() {
                return Err(ContractError::InvalidConfig(format!(
                    "expected {} utility weights, got {}",
                    dag.order(),
                    weights.len()
                )));
            }
        }
        if let Some(node) = dag.nodes().iter().find(|n| !profile.contains_node(n.id)) {
            return Err(ContractError::MalformedProfile(format!(
                "no performance profile for node {}",
                node.id
            )));
        }

        let allocation = Allocation::uniform(config.budget, dag.order());
        Ok(Self {
            dag,
            profile,
            config,
            allocation,
        })
    }

    /// Creates a program from a parsed profile document.
    pub fn from_document(dag: Dag, document: ProfileDocument, config: ProgramConfig) -> Result<Self> {
        let profile = PerformanceProfile::from_document(document, config.profile_config())?;
        Self::new(dag, profile, config)
    }

    /// Creates a program from a JSON profile file.
    pub fn from_path<P: AsRef<Path>>(dag: Dag, path: P, config: ProgramConfig) -> Result<Self> {
        let profile = PerformanceProfile::from_path(path, config.profile_config())?;
        Self::new(dag, profile, config)
    }

    pub fn dag(&self) -> &Dag {
        &self.dag
    }

    pub fn profile(&self) -> &PerformanceProfile {
        &self.profile
    }

    pub fn config(&self) -> &ProgramConfig {
        &self.config
    }

    /// The current allocation.
    pub fn allocation(&self) -> &Allocation {
        &self.allocation
    }

    /// Replaces the current allocation.
    pub fn set_allocation(&mut self, allocation: Allocation) -> Result<()> {
        self.check_len(&allocation)?;
        self.allocation = allocation;
        Ok(())
    }

    /// Equal split of the budget over every node.
    pub fn uniform_budget(&self) -> Allocation {
        Allocation::uniform(self.config.budget, self.dag.order())
    }

    /// Flat-Dirichlet random split of the budget.
    pub fn random_budget<R: Rng>(&self, rng: &mut R) -> Allocation {
        Allocation::dirichlet(self.config.budget, self.dag.order(), rng)
    }

    /// Replaces the current allocation with a random split.
    pub fn randomize(&mut self, seed: Option<u64>) {
        let mut rng = match seed {
            Some(seed) => create_rng(seed),
            None => create_rng(rand::random()),
        };
        self.allocation = self.random_budget(&mut rng);
    }

    /// Utility of the given per-node qualities.
    pub fn global_utility(&self, qualities: &[f64]) -> f64 {
        self.config.utility.evaluate(qualities)
    }

    /// Qualities of the direct parents of `node_id` under `allocation`.
    pub fn parent_qualities(&self, node_id: usize, allocation: &Allocation) -> Result<Vec<f64>> {
        self.check_len(allocation)?;
        QualityPropagator::new(&self.dag, &self.profile, allocation).parent_qualities(node_id)
    }

    /// Expected global utility of an allocation.
    ///
    /// Walks nodes ancestors first. Each node contributes the probability
    /// that its pooled samples land in the quality band of their own mean,
    /// conditioned on its parents' propagated qualities; the product of
    /// those probabilities weights the global utility of the means.
    pub fn global_expected_utility(&self, allocation: &Allocation) -> Result<f64> {
        self.check_len(allocation)?;
        let mut propagator = QualityPropagator::new(&self.dag, &self.profile, allocation);

        let mut probability = 1.0;
        let mut average_qualities = vec![0.0; self.dag.order()];
        for &node_id in self.dag.topological_order() {
            let parent_qualities = propagator.parent_qualities(node_id)?;
            let time = allocation.times()[node_id];
            let samples = self
                .profile
                .quality_samples_on_interval(time, node_id, &parent_qualities)?;
            let average = average_quality(&samples)?;
            probability *= self.profile.interval_probability(average, &samples)?;
            average_qualities[node_id] = average;
        }

        Ok(probability * self.global_utility(&average_qualities))
    }

    /// Hill-climbs from the current allocation and keeps the result.
    pub fn naive_hill_climbing(&mut self, config: &HillClimbConfig) -> Result<HillClimbResult> {
        let result = HillClimbRunner::run(&*self, self.allocation.clone(), config)?;
        self.allocation = result.best.clone();
        Ok(result)
    }

    fn check_len(&self, allocation: &Allocation) -> Result<()> {
        if allocation.len() != self.dag.order() {
            return Err(ContractError::AllocationMismatch {
                expected: self.dag.order(),
                actual: allocation.len(),
            });
        }
        Ok(())
    }
}

impl AllocationProblem for ContractProgram {
    fn budget(&self) -> f64 {
        self.config.budget
    }

    fn expected_utility(&self, allocation: &Allocation) -> Result<f64> {
        self.global_expected_utility(allocation)
    }

    fn report(&self, value: f64) -> f64 {
        self.config.report(value)
    }
}
