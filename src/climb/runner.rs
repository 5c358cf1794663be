//! Hill climbing execution loop.
//!
//! # Algorithm
//!
//! 1. Score the initial allocation; `step = budget / node_count`
//! 2. While `step > threshold`:
//!    a. Build one candidate per ordered pair `(i, j)`, `i != j`, moving
//!       `step` from `i` to `j`; skip pairs that would make `i` negative
//!    b. Score every candidate (in parallel if enabled)
//!    c. Commit to the best candidate that strictly beats the current
//!       score, ties going to the first pair enumerated
//!    d. If nothing improved, `step /= decay`

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use super::config::HillClimbConfig;
use super::types::AllocationProblem;
use crate::error::{ContractError, Result};
use crate::program::Allocation;

/// Result of a hill climbing run.
#[derive(Debug, Clone)]
pub struct HillClimbResult {
    /// Best allocation found.
    pub best: Allocation,

    /// Expected utility of `best`.
    pub best_utility: f64,

    /// Rounds executed, improving or cooling.
    pub rounds: usize,

    /// Total expected-utility evaluations, including the initial one.
    pub evaluations: usize,

    /// Step size when the search stopped.
    pub final_step: f64,

    /// Best utility after each round, starting with the initial score.
    pub utility_history: Vec<f64>,
}

/// Executes naive hill climbing.
pub struct HillClimbRunner;

impl HillClimbRunner {
    /// Climbs from `initial` until the step cools to the threshold.
    ///
    /// Any evaluation error aborts the search and is returned as is.
    pub fn run<P: AllocationProblem>(
        problem: &P,
        initial: Allocation,
        config: &HillClimbConfig,
    ) -> Result<HillClimbResult> {
        config.validate().map_err(ContractError::InvalidConfig)?;
        if initial.is_empty() {
            return Err(ContractError::InvalidConfig(
                "initial allocation has no nodes".into(),
            ));
        }

        let node_count = initial.len();
        let mut best = initial;
        let mut best_utility = problem.expected_utility(&best)?;
        let mut evaluations = 1usize;
        let mut step = problem.budget() / node_count as f64;
        let mut rounds = 0usize;
        let mut utility_history = vec![best_utility];

        while step > config.threshold {
            if config.max_rounds > 0 && rounds >= config.max_rounds {
                break;
            }

            let mut candidates = neighbors(&best, step);
            let utilities = evaluate_all(problem, &candidates, config.parallel)?;
            evaluations += candidates.len();

            let mut chosen: Option<(usize, f64)> = None;
            let mut improving = 0usize;
            for (index, (candidate, &utility)) in candidates.iter().zip(&utilities).enumerate() {
                tracing::trace!(
                    step = problem.report(step),
                    candidate_utility = problem.report(utility),
                    current_utility = problem.report(best_utility),
                    allocation = ?candidate.times(),
                    "candidate evaluated"
                );
                if utility > best_utility {
                    improving += 1;
                    if chosen.is_none_or(|(_, top)| utility > top) {
                        chosen = Some((index, utility));
                    }
                }
            }

            rounds += 1;
            match chosen {
                Some((index, utility)) => {
                    best = candidates.swap_remove(index);
                    best_utility = utility;
                }
                None => {
                    step /= config.decay;
                    tracing::debug!(round = rounds, step, "no improving transfer, cooling");
                }
            }
            utility_history.push(best_utility);

            tracing::debug!(
                round = rounds,
                step,
                improving,
                best_utility = problem.report(best_utility),
                "hill climbing round finished"
            );
        }

        tracing::info!(
            rounds,
            evaluations,
            final_step = step,
            best_utility = problem.report(best_utility),
            "hill climbing finished"
        );

        Ok(HillClimbResult {
            best,
            best_utility,
            rounds,
            evaluations,
            final_step: step,
            utility_history,
        })
    }
}

/// All feasible single transfers of `step`, in ordered-pair order.
fn neighbors(current: &Allocation, step: f64) -> Vec<Allocation> {
    let n = current.len();
    let mut candidates = Vec::with_capacity(n * n.saturating_sub(1));
    for from in 0..n {
        for to in 0..n {
            if from == to {
                continue;
            }
            if let Some(candidate) = current.transfer(from, to, step) {
                candidates.push(candidate);
            }
        }
    }
    candidates
}

/// Scores candidates, preserving their order.
#[cfg(feature = "parallel")]
fn evaluate_all<P: AllocationProblem>(
    problem: &P,
    candidates: &[Allocation],
    parallel: bool,
) -> Result<Vec<f64>> {
    if parallel {
        candidates
            .par_iter()
            .map(|candidate| problem.expected_utility(candidate))
            .collect()
    } else {
        candidates
            .iter()
            .map(|candidate| problem.expected_utility(candidate))
            .collect()
    }
}

/// Scores candidates, preserving their order.
#[cfg(not(feature = "parallel"))]
fn evaluate_all<P: AllocationProblem>(
    problem: &P,
    candidates: &[Allocation],
    _parallel: bool,
) -> Result<Vec<f64>> {
    candidates
        .iter()
        .map(|candidate| problem.expected_utility(candidate))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    // ---- Concave objective: -sum((t_i - target_i)^2) ----

    struct TargetProblem {
        budget: f64,
        target: Vec<f64>,
    }

    impl AllocationProblem for TargetProblem {
        fn budget(&self) -> f64 {
            self.budget
        }

        fn expected_utility(&self, allocation: &Allocation) -> Result<f64> {
            if allocation.times().iter().any(|&t| t < 0.0) {
                return Err(ContractError::InvalidConfig("negative time".into()));
            }
            Ok(-allocation
                .iter()
                .map(|(id, t)| (t - self.target[id]).powi(2))
                .sum::<f64>())
        }
    }

    #[test]
    fn test_converges_to_target() {
        let problem = TargetProblem {
            budget: 10.0,
            target: vec![2.0, 8.0],
        };
        let result = HillClimbRunner::run(
            &problem,
            Allocation::uniform(10.0, 2),
            &HillClimbConfig::default(),
        )
        .unwrap();

        assert!(
            (result.best.times()[0] - 2.0).abs() < 0.01,
            "expected ~2.0, got {:?}",
            result.best.times()
        );
        assert!((result.best.total() - 10.0).abs() < 1e-9);
        assert!(result.final_step <= 0.001);
    }

    #[test]
    fn test_history_non_decreasing() {
        let problem = TargetProblem {
            budget: 6.0,
            target: vec![0.5, 4.0, 1.5],
        };
        let result = HillClimbRunner::run(
            &problem,
            Allocation::uniform(6.0, 3),
            &HillClimbConfig::default().with_decay(1.5),
        )
        .unwrap();

        assert_eq!(result.utility_history.len(), result.rounds + 1);
        for window in result.utility_history.windows(2) {
            assert!(
                window[1] >= window[0],
                "best utility history should be non-decreasing: {} < {}",
                window[1],
                window[0]
            );
        }
    }

    #[test]
    fn test_never_evaluates_negative_times() {
        // Target far outside the budget pushes node 0 to zero; the problem
        // errors on negative input, so success means none was evaluated.
        let problem = TargetProblem {
            budget: 3.0,
            target: vec![-5.0, 8.0],
        };
        let result = HillClimbRunner::run(
            &problem,
            Allocation::uniform(3.0, 2),
            &HillClimbConfig::default(),
        )
        .unwrap();
        assert!(result.best.times()[0] >= 0.0);
        assert!(result.best.times()[0] < 0.01);
    }

    // ---- Linear objective rewarding the last node only ----

    struct LastNodeProblem {
        calls: AtomicUsize,
    }

    impl AllocationProblem for LastNodeProblem {
        fn budget(&self) -> f64 {
            3.0
        }

        fn expected_utility(&self, allocation: &Allocation) -> Result<f64> {
            self.calls.fetch_add(1, Ordering::Relaxed);
            Ok(allocation.times()[allocation.len() - 1])
        }
    }

    #[test]
    fn test_ties_go_to_first_pair() {
        // (0 -> 2) and (1 -> 2) both score 2.0; (0 -> 2) is enumerated first.
        let problem = LastNodeProblem {
            calls: AtomicUsize::new(0),
        };
        let config = HillClimbConfig::default().with_max_rounds(1);
        let result =
            HillClimbRunner::run(&problem, Allocation::uniform(3.0, 3), &config).unwrap();
        assert_eq!(result.best.times(), &[0.0, 1.0, 2.0]);
        assert_eq!(result.rounds, 1);
    }

    #[test]
    fn test_counts_evaluations() {
        let problem = LastNodeProblem {
            calls: AtomicUsize::new(0),
        };
        let result = HillClimbRunner::run(
            &problem,
            Allocation::uniform(3.0, 3),
            &HillClimbConfig::default().with_threshold(0.1),
        )
        .unwrap();
        assert_eq!(result.evaluations, problem.calls.load(Ordering::Relaxed));
        assert_eq!(result.best.times(), &[0.0, 0.0, 3.0]);
        assert!((result.best_utility - 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_step_below_threshold_runs_no_rounds() {
        let problem = LastNodeProblem {
            calls: AtomicUsize::new(0),
        };
        let config = HillClimbConfig::default().with_threshold(5.0);
        let result =
            HillClimbRunner::run(&problem, Allocation::uniform(3.0, 3), &config).unwrap();
        assert_eq!(result.rounds, 0);
        assert_eq!(result.evaluations, 1);
        assert_eq!(result.utility_history, vec![1.0]);
    }

    #[test]
    fn test_neighbors_skip_negative_and_self() {
        let current = Allocation::new(vec![0.0, 2.0, 0.5]);
        let candidates = neighbors(&current, 1.0);
        // Only node 1 can give a full second.
        assert_eq!(candidates.len(), 2);
        assert_eq!(candidates[0].times(), &[1.0, 1.0, 0.5]);
        assert_eq!(candidates[1].times(), &[0.0, 1.0, 1.5]);
    }

    struct FailingProblem;

    impl AllocationProblem for FailingProblem {
        fn budget(&self) -> f64 {
            1.0
        }

        fn expected_utility(&self, _allocation: &Allocation) -> Result<f64> {
            Err(ContractError::NodeNotFound(3))
        }
    }

    #[test]
    fn test_errors_propagate() {
        let result = HillClimbRunner::run(
            &FailingProblem,
            Allocation::uniform(1.0, 2),
            &HillClimbConfig::default(),
        );
        assert!(matches!(result, Err(ContractError::NodeNotFound(3))));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let result = HillClimbRunner::run(
            &FailingProblem,
            Allocation::uniform(1.0, 2),
            &HillClimbConfig::default().with_decay(0.9),
        );
        assert!(matches!(result, Err(ContractError::InvalidConfig(_))));
    }

    #[cfg(feature = "parallel")]
    #[test]
    fn test_parallel_matches_sequential() {
        let problem = TargetProblem {
            budget: 6.0,
            target: vec![0.5, 4.0, 1.5],
        };
        let sequential = HillClimbRunner::run(
            &problem,
            Allocation::uniform(6.0, 3),
            &HillClimbConfig::default(),
        )
        .unwrap();
        let parallel = HillClimbRunner::run(
            &problem,
            Allocation::uniform(6.0, 3),
            &HillClimbConfig::default().with_parallel(true),
        )
        .unwrap();
        assert_eq!(sequential.best, parallel.best);
        assert_eq!(sequential.utility_history, parallel.utility_history);
    }
}
