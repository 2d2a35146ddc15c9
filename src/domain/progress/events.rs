//! Progress notifications.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{domain_event, EventId, SessionId, Timestamp};

use super::EvaluationProgress;

/// Published after every tracker update. Newer snapshots supersede older ones.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressUpdated {
    pub event_id: EventId,
    pub session_id: SessionId,
    pub progress: EvaluationProgress,
    pub updated_at: Timestamp,
}

domain_event!(
    ProgressUpdated,
    event_type = "evaluation.progress_updated.v1",
    schema_version = 1,
    aggregate_id = session_id,
    aggregate_type = "EvaluationSession",
    occurred_at = updated_at,
    event_id = event_id
);
