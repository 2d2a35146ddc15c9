//! Group aggregation error types.

use thiserror::Error;

use crate::domain::analysis::AnalysisError;
use crate::domain::foundation::{DomainError, ErrorCode, RaterId};

/// Errors raised while combining several raters' judgments.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GroupError {
    #[error("At least one rater is required")]
    NoRaters,

    #[error("Rater '{0}' appears more than once")]
    DuplicateRater(RaterId),

    #[error("Matrix of rater '{rater}' has size {actual}, expected {expected}")]
    SizeMismatch {
        rater: RaterId,
        expected: usize,
        actual: usize,
    },

    #[error("Rater '{rater}' has invalid weight {weight}; weights must be positive and finite")]
    InvalidRaterWeight { rater: RaterId, weight: f64 },

    #[error(transparent)]
    Analysis(#[from] AnalysisError),
}

impl From<GroupError> for DomainError {
    fn from(err: GroupError) -> Self {
        match err {
            GroupError::Analysis(inner) => inner.into(),
            GroupError::NoRaters => DomainError::new(ErrorCode::InsufficientData, err.to_string()),
            GroupError::DuplicateRater(_)
            | GroupError::SizeMismatch { .. }
            | GroupError::InvalidRaterWeight { .. } => {
                DomainError::new(ErrorCode::ValidationFailed, err.to_string())
            }
        }
    }
}
