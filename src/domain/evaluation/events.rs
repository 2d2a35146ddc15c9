//! Evaluation notifications.
//!
//! - `ConsistencyChecked` - A completed comparison group was validated
//! - `SessionUpdated` - Status or current node changed

use serde::{Deserialize, Serialize};

use crate::domain::analysis::ConsistencyResult;
use crate::domain::foundation::{
    domain_event, EvaluationStatus, EventId, NodeId, ProjectId, RaterId, SessionId, Timestamp,
};

use super::EvaluationSession;

// ════════════════════════════════════════════════════════════════════════════
// ConsistencyChecked
// ════════════════════════════════════════════════════════════════════════════

/// Published when a complete comparison group has been solved and checked.
///
/// Carries adjustment suggestions when the check failed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsistencyChecked {
    pub event_id: EventId,
    pub session_id: SessionId,
    pub node_id: NodeId,
    pub consistency: ConsistencyResult,
    pub checked_at: Timestamp,
}

domain_event!(
    ConsistencyChecked,
    event_type = "evaluation.consistency_checked.v1",
    schema_version = 1,
    aggregate_id = session_id,
    aggregate_type = "EvaluationSession",
    occurred_at = checked_at,
    event_id = event_id
);

// ════════════════════════════════════════════════════════════════════════════
// SessionUpdated
// ════════════════════════════════════════════════════════════════════════════

/// Published on start, pause, resume, node advance and completion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionUpdated {
    pub event_id: EventId,
    pub session_id: SessionId,
    pub project_id: ProjectId,
    pub rater_id: RaterId,
    pub status: EvaluationStatus,
    pub current_node: Option<NodeId>,
    pub completed_comparisons: usize,
    pub total_comparisons: usize,
    pub updated_at: Timestamp,
}

domain_event!(
    SessionUpdated,
    event_type = "evaluation.session_updated.v1",
    schema_version = 1,
    aggregate_id = session_id,
    aggregate_type = "EvaluationSession",
    occurred_at = updated_at,
    event_id = event_id
);

impl SessionUpdated {
    /// Captures the session's current state.
    pub fn from_session(session: &EvaluationSession) -> Self {
        Self {
            event_id: EventId::new(),
            session_id: session.id(),
            project_id: session.project_id(),
            rater_id: session.rater_id().clone(),
            status: session.status(),
            current_node: session.current_node().cloned(),
            completed_comparisons: session.completed_comparisons(),
            total_comparisons: session.total_comparisons(),
            updated_at: session.updated_at(),
        }
    }
}
