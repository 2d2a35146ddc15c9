//! Consistency check configuration

use serde::Deserialize;

use crate::domain::analysis::ConsistencyConfig;

use super::error::ValidationError;

#[derive(Debug, Clone, Deserialize)]
pub struct ConsistencyCheckConfig {
    /// Largest acceptable consistency ratio
    #[serde(default = "default_threshold")]
    pub threshold: f64,

    /// Adjustment suggestions returned for an inconsistent matrix
    #[serde(default = "default_max_suggestions")]
    pub max_suggestions: usize,
}

impl ConsistencyCheckConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !self.threshold.is_finite() || self.threshold <= 0.0 {
            return Err(ValidationError::InvalidThreshold {
                name: "consistency.threshold",
                value: self.threshold,
            });
        }
        Ok(())
    }
}

impl Default for ConsistencyCheckConfig {
    fn default() -> Self {
        Self {
            threshold: default_threshold(),
            max_suggestions: default_max_suggestions(),
        }
    }
}

impl From<&ConsistencyCheckConfig> for ConsistencyConfig {
    fn from(config: &ConsistencyCheckConfig) -> Self {
        ConsistencyConfig {
            threshold: config.threshold,
            max_suggestions: config.max_suggestions,
        }
    }
}

fn default_threshold() -> f64 {
    0.10
}

fn default_max_suggestions() -> usize {
    3
}
