//! Engine configuration module
//!
//! Type-safe configuration loading from environment variables using the
//! `config` and `dotenvy` crates. Variables carry the `AHP_ENGINE` prefix and
//! nested values use `__` as separator. Every field has a default, so an
//! empty environment yields a working configuration.
//!
//! # Example
//!
//! ```no_run
//! use ahp_engine::config::EngineConfig;
//!
//! let config = EngineConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! let validator = config.validator();
//! ```

mod consistency;
mod error;
mod group;
mod solver;
mod telemetry;

pub use consistency::ConsistencyCheckConfig;
pub use error::{ConfigError, ValidationError};
pub use group::ConsensusConfig;
pub use solver::SolverConfig;
pub use telemetry::TelemetryConfig;

use serde::Deserialize;

use crate::domain::analysis::{ConsistencyValidator, EigenSolver};
use crate::domain::group::GroupAggregator;

/// Root engine configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EngineConfig {
    /// Power Method iteration budget and tolerance
    #[serde(default)]
    pub solver: SolverConfig,

    /// Consistency ratio threshold and suggestion count
    #[serde(default)]
    pub consistency: ConsistencyCheckConfig,

    /// Consensus and disagreement thresholds
    #[serde(default)]
    pub group: ConsensusConfig,

    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

impl EngineConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `AHP_ENGINE` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    ///
    /// # Environment Variable Format
    ///
    /// - `AHP_ENGINE__SOLVER__MAX_ITERATIONS=500` -> `solver.max_iterations = 500`
    /// - `AHP_ENGINE__CONSISTENCY__THRESHOLD=0.08` -> `consistency.threshold = 0.08`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into expected types.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("AHP_ENGINE")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` for the first invalid section.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.solver.validate()?;
        self.consistency.validate()?;
        self.group.validate()?;
        self.telemetry.validate()?;
        Ok(())
    }

    /// Consistency validator wired with the configured solver.
    pub fn validator(&self) -> ConsistencyValidator {
        ConsistencyValidator::new(
            EigenSolver::new((&self.solver).into()),
            (&self.consistency).into(),
        )
    }

    /// Group aggregator wired with the configured validator and thresholds.
    pub fn aggregator(&self) -> GroupAggregator {
        GroupAggregator::new(self.validator(), (&self.group).into())
    }
}
