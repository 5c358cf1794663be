//! Program configuration and the global utility function.

use crate::profile::ProfileConfig;

/// Combines per-node qualities into a single utility.
///
/// `Sum` is the reference definition: every node's quality counts, not
/// only the root's.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum GlobalUtility {
    /// Sum of all node qualities.
    #[default]
    Sum,
    /// Product of all node qualities.
    Product,
    /// Weighted sum; one weight per node, indexed by id.
    Weighted(Vec<f64>),
}

impl GlobalUtility {
    /// Applies the utility to qualities indexed by node id.
    pub fn evaluate(&self, qualities: &[f64]) -> f64 {
        match self {
            GlobalUtility::Sum => qualities.iter().sum(),
            GlobalUtility::Product => qualities.iter().product(),
            GlobalUtility::Weighted(weights) => {
                qualities.iter().zip(weights).map(|(q, w)| q * w).sum()
            }
        }
    }
}

/// Configuration of a [`ContractProgram`](super::ContractProgram).
///
/// # Examples
///
/// ```
/// use u_contract::program::{GlobalUtility, ProgramConfig};
///
/// let config = ProgramConfig::new(10.0)
///     .with_scale(100.0)
///     .with_decimals(3)
///     .with_utility(GlobalUtility::Product);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ProgramConfig {
    /// Total time budget in seconds.
    pub budget: f64,

    /// Multiplier applied to reported utilities. Does not affect the search.
    pub scale: f64,

    /// Rounding of reported values. Does not affect the search.
    pub decimals: Option<u32>,

    /// Width of the quality band.
    pub quality_interval: f64,

    /// Width of the time band.
    pub time_interval: f64,

    /// Spacing of recorded time keys in the profile document.
    pub time_step_size: f64,

    pub utility: GlobalUtility,
}

impl ProgramConfig {
    pub fn new(budget: f64) -> Self {
        Self {
            budget,
            scale: 1.0,
            decimals: None,
            quality_interval: 0.05,
            time_interval: 1.0,
            time_step_size: 0.1,
            utility: GlobalUtility::Sum,
        }
    }

    pub fn with_scale(mut self, scale: f64) -> Self {
        self.scale = scale;
        self
    }

    pub fn with_decimals(mut self, decimals: u32) -> Self {
        self.decimals = Some(decimals);
        self
    }

    pub fn with_quality_interval(mut self, interval: f64) -> Self {
        self.quality_interval = interval;
        self
    }

    pub fn with_time_interval(mut self, interval: f64) -> Self {
        self.time_interval = interval;
        self
    }

    pub fn with_time_step_size(mut self, step: f64) -> Self {
        self.time_step_size = step;
        self
    }

    pub fn with_utility(mut self, utility: GlobalUtility) -> Self {
        self.utility = utility;
        self
    }

    /// Profile discretization implied by this program; the time limit is
    /// the budget.
    pub fn profile_config(&self) -> ProfileConfig {
        ProfileConfig::new(self.budget)
            .with_time_interval(self.time_interval)
            .with_quality_interval(self.quality_interval)
            .with_time_step_size(self.time_step_size)
    }

    /// Scales and optionally rounds a value for reporting.
    pub fn report(&self, value: f64) -> f64 {
        let scaled = value * self.scale;
        match self.decimals {
            Some(decimals) => {
                let factor = 10f64.powi(decimals as i32);
                (scaled * factor).round() / factor
            }
            None => scaled,
        }
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.budget <= 0.0 {
            return Err(format!("budget must be positive, got {}", self.budget));
        }
        if let GlobalUtility::Weighted(weights) = &self.utility {
            if weights.iter().any(|w| !w.is_finite()) {
                return Err("utility weights must be finite".into());
            }
        }
        self.profile_config().validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sum_is_default() {
        let config = ProgramConfig::new(10.0);
        assert_eq!(config.utility, GlobalUtility::Sum);
        assert!((config.utility.evaluate(&[0.5, 0.5]) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_product_and_weighted() {
        assert!((GlobalUtility::Product.evaluate(&[0.5, 0.4]) - 0.2).abs() < 1e-12);
        let weighted = GlobalUtility::Weighted(vec![2.0, 0.0, 1.0]);
        assert!((weighted.evaluate(&[0.5, 0.9, 0.25]) - 1.25).abs() < 1e-12);
    }

    #[test]
    fn test_profile_config_uses_budget_as_limit() {
        let config = ProgramConfig::new(12.0).with_quality_interval(0.1);
        let profile = config.profile_config();
        assert!((profile.time_limit - 12.0).abs() < 1e-12);
        assert!((profile.quality_interval - 0.1).abs() < 1e-12);
    }

    #[test]
    fn test_report_scale_and_round() {
        let config = ProgramConfig::new(1.0).with_scale(10.0).with_decimals(2);
        assert!((config.report(0.123456) - 1.23).abs() < 1e-12);
        assert!((ProgramConfig::new(1.0).report(0.123456) - 0.123456).abs() < 1e-15);
    }

    #[test]
    fn test_validate_bad_budget() {
        assert!(ProgramConfig::new(0.0).validate().is_err());
        assert!(ProgramConfig::new(-3.0).validate().is_err());
    }

    #[test]
    fn test_validate_propagates_profile_errors() {
        let config = ProgramConfig::new(5.0).with_time_interval(0.0);
        assert!(config.validate().is_err());
    }
}
