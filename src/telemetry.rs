//! Tracing subscriber initialisation.
//!
//! `RUST_LOG` takes precedence over the configured filter when set.

use thiserror::Error;
use tracing_subscriber::filter::ParseError;
use tracing_subscriber::util::{SubscriberInitExt, TryInitError};
use tracing_subscriber::EnvFilter;

use crate::config::TelemetryConfig;

#[derive(Debug, Error)]
pub enum TelemetryError {
    #[error("Invalid log filter: {0}")]
    Filter(#[from] ParseError),

    #[error("Tracing subscriber already installed: {0}")]
    Init(#[from] TryInitError),
}

/// Installs the global `fmt` subscriber, human-readable or JSON lines.
pub fn init_tracing(config: &TelemetryConfig) -> Result<(), TelemetryError> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&config.log_level)?,
    };

    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_target(true);
    if config.json {
        builder.json().finish().try_init()?;
    } else {
        builder.finish().try_init()?;
    }
    Ok(())
}
