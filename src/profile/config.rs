//! Discretization settings for profile queries.

/// Discretization of time and quality used when querying a profile.
///
/// # Examples
///
/// ```
/// use u_contract::profile::ProfileConfig;
///
/// let config = ProfileConfig::new(10.0)
///     .with_time_interval(1.0)
///     .with_quality_interval(0.05);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileConfig {
    /// Width of the time band pooled by interval queries.
    pub time_interval: f64,

    /// Width of the quality band used for keys and probabilities.
    pub quality_interval: f64,

    /// Largest time a node can be given (the program budget).
    pub time_limit: f64,

    /// Spacing of the time keys recorded in the profile document.
    pub time_step_size: f64,
}

impl ProfileConfig {
    /// Creates a configuration with default intervals for the given limit.
    pub fn new(time_limit: f64) -> Self {
        Self {
            time_interval: 1.0,
            quality_interval: 0.05,
            time_limit,
            time_step_size: 0.1,
        }
    }

    pub fn with_time_interval(mut self, interval: f64) -> Self {
        self.time_interval = interval;
        self
    }

    pub fn with_quality_interval(mut self, interval: f64) -> Self {
        self.quality_interval = interval;
        self
    }

    pub fn with_time_limit(mut self, limit: f64) -> Self {
        self.time_limit = limit;
        self
    }

    pub fn with_time_step_size(mut self, step: f64) -> Self {
        self.time_step_size = step;
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.time_interval <= 0.0 {
            return Err(format!(
                "time_interval must be positive, got {}",
                self.time_interval
            ));
        }
        if self.quality_interval <= 0.0 {
            return Err(format!(
                "quality_interval must be positive, got {}",
                self.quality_interval
            ));
        }
        if self.time_limit <= 0.0 {
            return Err(format!("time_limit must be positive, got {}", self.time_limit));
        }
        if self.time_step_size <= 0.0 {
            return Err(format!(
                "time_step_size must be positive, got {}",
                self.time_step_size
            ));
        }
        if self.time_step_size > self.time_interval {
            return Err("time_step_size must not exceed time_interval".into());
        }
        Ok(())
    }
}
