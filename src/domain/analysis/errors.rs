//! Analysis error types.
//!
//! Consistency failure is deliberately absent: a CR above the threshold is a
//! normal outcome reported through `ConsistencyResult`.

use thiserror::Error;

use crate::domain::foundation::{DomainError, ErrorCode, NodeId};

/// Errors raised by matrix building, solving and weight propagation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AnalysisError {
    // Insufficient data
    #[error("A comparison group needs at least 2 elements, got {actual}")]
    InsufficientElements { actual: usize },

    #[error("Weight vector for '{node}' has {actual} entries, expected {expected}")]
    WeightVectorLength {
        node: NodeId,
        expected: usize,
        actual: usize,
    },

    #[error("Weight vector for '{node}' has invalid entry {value} at index {index}")]
    InvalidWeight {
        node: NodeId,
        index: usize,
        value: f64,
    },

    #[error("Weight vector for '{node}' sums to {sum}, expected 1")]
    WeightSumMismatch { node: NodeId, sum: f64 },

    // Comparison validation
    #[error("Element '{0}' is not part of the comparison group")]
    UnknownElement(NodeId),

    #[error("Element '{0}' cannot be compared with itself")]
    SelfComparison(NodeId),

    #[error("Judgment {0} is not on the 1/9..9 Saaty scale")]
    OffScale(f64),

    #[error("Matrix is not square: row {row} has {len} entries, expected {expected}")]
    NotSquare {
        row: usize,
        len: usize,
        expected: usize,
    },

    #[error("Matrix entry ({row}, {col}) = {value} is not a positive reciprocal value")]
    NotReciprocal { row: usize, col: usize, value: f64 },

    // Numerical
    #[error("Cannot normalize a vector that sums to {0}")]
    ZeroSumNormalization(f64),

    #[error("Computation produced a non-finite value")]
    NonFinite,
}

impl AnalysisError {
    /// Returns true for degenerate-input numerical failures.
    pub fn is_numerical(&self) -> bool {
        matches!(
            self,
            AnalysisError::ZeroSumNormalization(_) | AnalysisError::NonFinite
        )
    }

    /// Maps to the shared error code.
    pub fn code(&self) -> ErrorCode {
        match self {
            AnalysisError::InsufficientElements { .. }
            | AnalysisError::WeightVectorLength { .. }
            | AnalysisError::InvalidWeight { .. }
            | AnalysisError::WeightSumMismatch { .. } => ErrorCode::InsufficientData,
            AnalysisError::ZeroSumNormalization(_) | AnalysisError::NonFinite => {
                ErrorCode::NumericalError
            }
            AnalysisError::UnknownElement(_)
            | AnalysisError::SelfComparison(_)
            | AnalysisError::OffScale(_)
            | AnalysisError::NotSquare { .. }
            | AnalysisError::NotReciprocal { .. } => ErrorCode::ValidationFailed,
        }
    }
}

impl From<AnalysisError> for DomainError {
    fn from(err: AnalysisError) -> Self {
        DomainError::new(err.code(), err.to_string())
    }
}
