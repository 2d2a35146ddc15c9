//! Evaluation error types.

use thiserror::Error;

use crate::domain::analysis::AnalysisError;
use crate::domain::foundation::{DomainError, ErrorCode, EvaluationStatus, NodeId};
use crate::domain::hierarchy::HierarchyError;

/// Errors raised by the evaluation session and orchestrator.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvaluationError {
    #[error("Cannot move evaluation from {from} to {to}")]
    InvalidTransition {
        from: EvaluationStatus,
        to: EvaluationStatus,
    },

    #[error("Evaluation has not been started")]
    NotStarted,

    #[error("Evaluation is paused; resume it before submitting comparisons")]
    Paused,

    #[error("Evaluation is already completed")]
    AlreadyCompleted,

    #[error("Comparisons were submitted for '{actual}' but the current node is {}", describe_current(.expected))]
    NotCurrentNode {
        expected: Option<NodeId>,
        actual: NodeId,
    },

    #[error("A comparison batch must contain at least one judgment")]
    EmptyBatch,

    #[error(transparent)]
    Hierarchy(#[from] HierarchyError),

    #[error(transparent)]
    Analysis(#[from] AnalysisError),
}

fn describe_current(expected: &Option<NodeId>) -> String {
    match expected {
        Some(node) => format!("'{node}'"),
        None => "none".to_string(),
    }
}

impl EvaluationError {
    pub fn code(&self) -> ErrorCode {
        match self {
            EvaluationError::InvalidTransition { .. } | EvaluationError::NotStarted => {
                ErrorCode::InvalidStateTransition
            }
            EvaluationError::Paused => ErrorCode::SessionPaused,
            EvaluationError::AlreadyCompleted => ErrorCode::SessionCompleted,
            EvaluationError::NotCurrentNode { .. } => ErrorCode::NotCurrentNode,
            EvaluationError::EmptyBatch => ErrorCode::ValidationFailed,
            EvaluationError::Hierarchy(HierarchyError::UnknownNode(_)) => ErrorCode::NodeNotFound,
            EvaluationError::Hierarchy(_) => ErrorCode::InvalidHierarchy,
            EvaluationError::Analysis(inner) => inner.code(),
        }
    }
}

impl From<EvaluationError> for DomainError {
    fn from(err: EvaluationError) -> Self {
        DomainError::new(err.code(), err.to_string())
    }
}
