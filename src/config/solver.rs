//! Power Method solver configuration

use serde::Deserialize;

use crate::domain::analysis::PowerMethodConfig;

use super::error::ValidationError;

/// Iteration budget and stopping tolerance
#[derive(Debug, Clone, Deserialize)]
pub struct SolverConfig {
    #[serde(default = "default_max_iterations")]
    pub max_iterations: u32,

    #[serde(default = "default_tolerance")]
    pub tolerance: f64,
}

impl SolverConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.max_iterations == 0 {
            return Err(ValidationError::InvalidIterations);
        }
        if !self.tolerance.is_finite() || self.tolerance <= 0.0 || self.tolerance >= 1.0 {
            return Err(ValidationError::InvalidTolerance(self.tolerance));
        }
        Ok(())
    }
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            max_iterations: default_max_iterations(),
            tolerance: default_tolerance(),
        }
    }
}

impl From<&SolverConfig> for PowerMethodConfig {
    fn from(config: &SolverConfig) -> Self {
        PowerMethodConfig {
            max_iterations: config.max_iterations,
            tolerance: config.tolerance,
        }
    }
}

fn default_max_iterations() -> u32 {
    1000
}

fn default_tolerance() -> f64 {
    1e-10
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_solver_defaults() {
        let config = SolverConfig::default();
        assert_eq!(PowerMethodConfig::from(&config), PowerMethodConfig::default());
    }

    #[test]
    fn zero_iterations_rejected() {
        let config = SolverConfig {
            max_iterations: 0,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ValidationError::InvalidIterations));
    }

    #[test]
    fn tolerance_must_be_a_small_positive_number() {
        for tolerance in [0.0, -1e-6, 1.0, f64::NAN] {
            let config = SolverConfig {
                tolerance,
                ..Default::default()
            };
            assert!(config.validate().is_err(), "tolerance {tolerance} accepted");
        }
    }
}
