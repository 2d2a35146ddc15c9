//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("Solver needs at least one iteration")]
    InvalidIterations,

    #[error("Solver tolerance must be in (0, 1), got {0}")]
    InvalidTolerance(f64),

    #[error("{name} must be positive and finite, got {value}")]
    InvalidThreshold { name: &'static str, value: f64 },

    #[error("Group thresholds must satisfy disagreement <= discussion <= rescoping")]
    ThresholdOrder,

    #[error("Invalid log filter '{0}'")]
    InvalidLogLevel(String),
}
