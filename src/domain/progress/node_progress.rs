//! Per-node progress record.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{NodeId, Timestamp};

/// Progress of one comparison group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeProgress {
    pub node_id: NodeId,
    pub total_comparisons: usize,
    pub completed_comparisons: usize,
    pub is_completed: bool,
    pub is_consistent: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_consistency_ratio: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub started_at: Option<Timestamp>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<Timestamp>,
}

impl NodeProgress {
    pub fn new(node_id: NodeId, total_comparisons: usize) -> Self {
        Self {
            node_id,
            total_comparisons,
            completed_comparisons: 0,
            is_completed: false,
            is_consistent: false,
            last_consistency_ratio: None,
            started_at: None,
            completed_at: None,
        }
    }

    /// Comparisons still missing.
    pub fn remaining_comparisons(&self) -> usize {
        self.total_comparisons
            .saturating_sub(self.completed_comparisons)
    }

    /// Seconds from first submission to completion, if completed.
    pub fn time_spent_secs(&self) -> Option<f64> {
        match (self.started_at, self.completed_at) {
            (Some(start), Some(end)) if self.is_completed => Some(end.seconds_since(&start)),
            _ => None,
        }
    }
}
