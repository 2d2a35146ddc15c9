//! EvaluationStatus enum for tracking the lifecycle of a rater's session.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::StateMachine;

/// Lifecycle status of an evaluation session.
///
/// ```text
/// NotStarted ──► InProgress ◄──► Paused
///                    │
///                    ▼
///                Completed
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum EvaluationStatus {
    #[default]
    NotStarted,
    InProgress,
    Paused,
    Completed,
}

impl EvaluationStatus {
    /// Returns true if comparisons may be accepted in this status.
    pub fn accepts_comparisons(&self) -> bool {
        matches!(self, EvaluationStatus::InProgress)
    }

    /// Returns true while the session still counts as active for its rater.
    pub fn is_active(&self) -> bool {
        !matches!(self, EvaluationStatus::Completed)
    }
}

impl StateMachine for EvaluationStatus {
    fn can_transition_to(&self, target: &Self) -> bool {
        use EvaluationStatus::*;
        matches!(
            (self, target),
            (NotStarted, InProgress)
                | (InProgress, Paused)
                | (Paused, InProgress)
                | (InProgress, Completed)
        )
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use EvaluationStatus::*;
        match self {
            NotStarted => vec![InProgress],
            InProgress => vec![Paused, Completed],
            Paused => vec![InProgress],
            Completed => vec![],
        }
    }
}

impl fmt::Display for EvaluationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            EvaluationStatus::NotStarted => "Not Started",
            EvaluationStatus::InProgress => "In Progress",
            EvaluationStatus::Paused => "Paused",
            EvaluationStatus::Completed => "Completed",
        };
        write!(f, "{}", s)
    }
}
