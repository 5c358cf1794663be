//! Hill climbing configuration.

/// Configuration for [`HillClimbRunner`](super::HillClimbRunner).
///
/// # Examples
///
/// ```
/// use u_contract::climb::HillClimbConfig;
///
/// let config = HillClimbConfig::default()
///     .with_decay(1.5)
///     .with_threshold(0.01);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct HillClimbConfig {
    /// Divisor applied to the step after a round without improvement.
    /// Must be greater than 1.
    pub decay: f64,

    /// The search stops once the step is at or below this value.
    pub threshold: f64,

    /// Maximum number of rounds. 0 = no limit.
    pub max_rounds: usize,

    /// Whether to evaluate a round's candidates in parallel using rayon.
    ///
    /// Only takes effect with the `parallel` feature.
    pub parallel: bool,
}

impl Default for HillClimbConfig {
    fn default() -> Self {
        Self {
            decay: 1.2,
            threshold: 0.001,
            max_rounds: 0,
            parallel: false,
        }
    }
}

impl HillClimbConfig {
    pub fn with_decay(mut self, decay: f64) -> Self {
        self.decay = decay;
        self
    }

    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn with_max_rounds(mut self, n: usize) -> Self {
        self.max_rounds = n;
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.decay <= 1.0 {
            return Err(format!("decay must be greater than 1, got {}", self.decay));
        }
        if self.threshold <= 0.0 {
            return Err(format!("threshold must be positive, got {}", self.threshold));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = HillClimbConfig::default();
        assert!((config.decay - 1.2).abs() < 1e-12);
        assert!((config.threshold - 0.001).abs() < 1e-12);
        assert_eq!(config.max_rounds, 0);
        assert!(!config.parallel);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_bad_decay() {
        assert!(HillClimbConfig::default().with_decay(1.0).validate().is_err());
        assert!(HillClimbConfig::default().with_decay(0.5).validate().is_err());
    }

    #[test]
    fn test_validate_bad_threshold() {
        assert!(HillClimbConfig::default()
            .with_threshold(0.0)
            .validate()
            .is_err());
    }
}
