//! Progress snapshot exposed to callers and push channels.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{NodeId, SessionId};

use super::NodeProgress;

/// The comparison group a rater is working on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepDescriptor {
    pub node_id: NodeId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node_name: Option<String>,
    pub level: u32,
    /// Ids to compare, in matrix order.
    pub elements: Vec<NodeId>,
    /// 1-based position among evaluable nodes.
    pub step_index: usize,
    pub total_steps: usize,
}

/// Point-in-time view of a session's progress.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationProgress {
    pub session_id: SessionId,
    pub total_nodes: usize,
    pub completed_nodes: usize,
    pub total_comparisons: usize,
    pub completed_comparisons: usize,
    /// completed_nodes / total_nodes, in [0, 1].
    pub overall_progress: f64,
    /// Mean of the last CR over nodes checked so far.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub average_consistency_ratio: Option<f64>,
    pub elapsed_secs: f64,
    /// None until at least one node is completed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_remaining_secs: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_step: Option<StepDescriptor>,
    pub nodes: Vec<NodeProgress>,
}

impl EvaluationProgress {
    /// Progress as a whole percentage (0-100).
    pub fn percent_complete(&self) -> u8 {
        (self.overall_progress * 100.0).round().clamp(0.0, 100.0) as u8
    }

    pub fn is_complete(&self) -> bool {
        self.completed_nodes == self.total_nodes
    }
}
