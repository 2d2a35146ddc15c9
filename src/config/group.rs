//! Group consensus configuration

use serde::Deserialize;

use crate::domain::group::GroupConfig;

use super::error::ValidationError;

/// Disagreement thresholds are on the normalised log-deviation scale,
/// where 1.0 is a full Saaty-scale step from 1 to 9.
#[derive(Debug, Clone, Deserialize)]
pub struct ConsensusConfig {
    #[serde(default = "default_disagreement_threshold")]
    pub disagreement_threshold: f64,

    #[serde(default = "default_discussion_threshold")]
    pub discussion_threshold: f64,

    #[serde(default = "default_rescoping_threshold")]
    pub rescoping_threshold: f64,

    #[serde(default = "default_max_disagreements")]
    pub max_disagreements: usize,
}

impl ConsensusConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        for (name, value) in [
            ("group.disagreement_threshold", self.disagreement_threshold),
            ("group.discussion_threshold", self.discussion_threshold),
            ("group.rescoping_threshold", self.rescoping_threshold),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ValidationError::InvalidThreshold { name, value });
            }
        }
        if self.disagreement_threshold > self.discussion_threshold
            || self.discussion_threshold > self.rescoping_threshold
        {
            return Err(ValidationError::ThresholdOrder);
        }
        Ok(())
    }
}

impl Default for ConsensusConfig {
    fn default() -> Self {
        Self {
            disagreement_threshold: default_disagreement_threshold(),
            discussion_threshold: default_discussion_threshold(),
            rescoping_threshold: default_rescoping_threshold(),
            max_disagreements: default_max_disagreements(),
        }
    }
}

impl From<&ConsensusConfig> for GroupConfig {
    fn from(config: &ConsensusConfig) -> Self {
        GroupConfig {
            disagreement_threshold: config.disagreement_threshold,
            discussion_threshold: config.discussion_threshold,
            rescoping_threshold: config.rescoping_threshold,
            max_disagreements: config.max_disagreements,
        }
    }
}

fn default_disagreement_threshold() -> f64 {
    0.5
}

fn default_discussion_threshold() -> f64 {
    0.75
}

fn default_rescoping_threshold() -> f64 {
    1.0
}

fn default_max_disagreements() -> usize {
    10
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_aggregator_defaults() {
        assert_eq!(GroupConfig::from(&ConsensusConfig::default()), GroupConfig::default());
        assert!(ConsensusConfig::default().validate().is_ok());
    }

    #[test]
    fn thresholds_must_be_ordered() {
        let config = ConsensusConfig {
            discussion_threshold: 0.4,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ValidationError::ThresholdOrder));
    }

    #[test]
    fn non_positive_threshold_rejected() {
        let config = ConsensusConfig {
            disagreement_threshold: 0.0,
            ..Default::default()
        };
        assert_eq!(
            config.validate(),
            Err(ValidationError::InvalidThreshold {
                name: "group.disagreement_threshold",
                value: 0.0,
            })
        );
    }
}
