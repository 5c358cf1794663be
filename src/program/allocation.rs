//! Time allocation vector and its initializers.

use rand::Rng;
use serde::{Deserialize, Serialize};

/// One non-negative time per node, indexed by node id.
///
/// A plain value type: cloning yields an independent copy, so candidates
/// can be perturbed without touching the allocation they came from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Allocation {
    times: Vec<f64>,
}

impl Allocation {
    pub fn new(times: Vec<f64>) -> Self {
        Self { times }
    }

    /// Splits `budget` equally among `order` nodes.
    ///
    /// # Examples
    ///
    /// ```
    /// use u_contract::program::Allocation;
    ///
    /// let allocation = Allocation::uniform(10.0, 2);
    /// assert_eq!(allocation.times(), &[5.0, 5.0]);
    /// ```
    pub fn uniform(budget: f64, order: usize) -> Self {
        let share = budget / order as f64;
        Self {
            times: vec![share; order],
        }
    }

    /// Splits `budget` at random following a flat Dirichlet distribution.
    ///
    /// Uses uniform spacings: the gaps between `order - 1` sorted uniform
    /// draws on `[0, 1]` are Dirichlet(1, ..., 1) distributed.
    pub fn dirichlet<R: Rng>(budget: f64, order: usize, rng: &mut R) -> Self {
        if order == 0 {
            return Self { times: Vec::new() };
        }
        let mut cuts: Vec<f64> = (1..order).map(|_| rng.random_range(0.0..1.0)).collect();
        cuts.sort_by(|a, b| a.total_cmp(b));

        let mut times = Vec::with_capacity(order);
        let mut previous = 0.0;
        for cut in cuts.into_iter().chain(std::iter::once(1.0)) {
            times.push((cut - previous) * budget);
            previous = cut;
        }
        Self { times }
    }

    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    /// Time given to a node, if the id is in range.
    pub fn time(&self, node_id: usize) -> Option<f64> {
        self.times.get(node_id).copied()
    }

    pub fn times(&self) -> &[f64] {
        &self.times
    }

    /// `(node id, time)` pairs in id order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.times.iter().copied().enumerate()
    }

    /// Sum of all node times.
    pub fn total(&self) -> f64 {
        self.times.iter().sum()
    }

    /// Copy with `amount` moved from node `from` to node `to`.
    ///
    /// Returns `None` when `from` would go negative or either id is out
    /// of range.
    pub fn transfer(&self, from: usize, to: usize, amount: f64) -> Option<Self> {
        let source = self.time(from)?;
        self.time(to)?;
        if source - amount < 0.0 {
            return None;
        }
        let mut moved = self.clone();
        moved.times[from] -= amount;
        moved.times[to] += amount;
        Some(moved)
    }
}
