//! EvaluationSession aggregate - One rater's pass through a project hierarchy.
//!
//! The session is the persisted record: status, current node, counters, the
//! judgments submitted per node and, once completed, the frozen weights.
//! It is sufficient on its own to restart an orchestrator.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::domain::analysis::{ComparisonSet, GlobalWeightResult};
use crate::domain::foundation::{
    EvaluationStatus, NodeId, ProjectId, RaterId, SessionId, StateMachine, Timestamp,
};

use super::EvaluationError;

/// The EvaluationSession aggregate root.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationSession {
    id: SessionId,
    project_id: ProjectId,
    rater_id: RaterId,
    status: EvaluationStatus,
    current_node: Option<NodeId>,
    total_comparisons: usize,
    completed_comparisons: usize,
    judgments: BTreeMap<NodeId, ComparisonSet>,
    result: Option<GlobalWeightResult>,
    created_at: Timestamp,
    updated_at: Timestamp,
    completed_at: Option<Timestamp>,
}

impl EvaluationSession {
    /// Creates a not-yet-started session.
    pub fn new(project_id: ProjectId, rater_id: RaterId) -> Self {
        let now = Timestamp::now();
        Self {
            id: SessionId::new(),
            project_id,
            rater_id,
            status: EvaluationStatus::NotStarted,
            current_node: None,
            total_comparisons: 0,
            completed_comparisons: 0,
            judgments: BTreeMap::new(),
            result: None,
            created_at: now,
            updated_at: now,
            completed_at: None,
        }
    }

    /// Reconstitutes a session from persistence (no validation).
    #[allow(clippy::too_many_arguments)]
    pub fn reconstitute(
        id: SessionId,
        project_id: ProjectId,
        rater_id: RaterId,
        status: EvaluationStatus,
        current_node: Option<NodeId>,
        total_comparisons: usize,
        judgments: BTreeMap<NodeId, ComparisonSet>,
        result: Option<GlobalWeightResult>,
        created_at: Timestamp,
        updated_at: Timestamp,
        completed_at: Option<Timestamp>,
    ) -> Self {
        let completed_comparisons = judgments.values().map(ComparisonSet::len).sum();
        Self {
            id,
            project_id,
            rater_id,
            status,
            current_node,
            total_comparisons,
            completed_comparisons,
            judgments,
            result,
            created_at,
            updated_at,
            completed_at,
        }
    }

    // ─────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn project_id(&self) -> ProjectId {
        self.project_id
    }

    pub fn rater_id(&self) -> &RaterId {
        &self.rater_id
    }

    pub fn status(&self) -> EvaluationStatus {
        self.status
    }

    pub fn current_node(&self) -> Option<&NodeId> {
        self.current_node.as_ref()
    }

    pub fn total_comparisons(&self) -> usize {
        self.total_comparisons
    }

    /// Distinct pairs judged so far, across all nodes.
    pub fn completed_comparisons(&self) -> usize {
        self.completed_comparisons
    }

    pub fn judgments(&self) -> &BTreeMap<NodeId, ComparisonSet> {
        &self.judgments
    }

    pub fn judgments_for(&self, node_id: &NodeId) -> Option<&ComparisonSet> {
        self.judgments.get(node_id)
    }

    /// The frozen weights, present once completed.
    pub fn result(&self) -> Option<&GlobalWeightResult> {
        self.result.as_ref()
    }

    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }

    pub fn updated_at(&self) -> Timestamp {
        self.updated_at
    }

    pub fn completed_at(&self) -> Option<Timestamp> {
        self.completed_at
    }

    pub fn is_completed(&self) -> bool {
        self.status == EvaluationStatus::Completed
    }

    // ─────────────────────────────────────────────────────────────────────
    // Lifecycle
    // ─────────────────────────────────────────────────────────────────────

    /// Starts the session on its first node.
    pub fn start(
        &mut self,
        total_comparisons: usize,
        first_node: Option<NodeId>,
    ) -> Result<(), EvaluationError> {
        self.transition(EvaluationStatus::InProgress)?;
        self.total_comparisons = total_comparisons;
        self.current_node = first_node;
        Ok(())
    }

    pub fn pause(&mut self) -> Result<(), EvaluationError> {
        self.transition(EvaluationStatus::Paused)
    }

    pub fn resume(&mut self) -> Result<(), EvaluationError> {
        self.transition(EvaluationStatus::InProgress)
    }

    /// Freezes the result and completes the session.
    pub fn complete(&mut self, result: GlobalWeightResult) -> Result<(), EvaluationError> {
        self.transition(EvaluationStatus::Completed)?;
        self.result = Some(result);
        self.current_node = None;
        self.completed_at = Some(self.updated_at);
        Ok(())
    }

    /// Fails unless the session currently accepts comparisons.
    pub fn ensure_accepts_comparisons(&self) -> Result<(), EvaluationError> {
        match self.status {
            EvaluationStatus::InProgress => Ok(()),
            EvaluationStatus::NotStarted => Err(EvaluationError::NotStarted),
            EvaluationStatus::Paused => Err(EvaluationError::Paused),
            EvaluationStatus::Completed => Err(EvaluationError::AlreadyCompleted),
        }
    }

    /// Replaces the stored judgments of one node.
    pub fn record_judgments(&mut self, node_id: NodeId, comparisons: ComparisonSet) {
        self.judgments.insert(node_id, comparisons);
        self.completed_comparisons = self.judgments.values().map(ComparisonSet::len).sum();
        self.touch();
    }

    pub fn set_current_node(&mut self, node_id: Option<NodeId>) {
        self.current_node = node_id;
        self.touch();
    }

    fn transition(&mut self, target: EvaluationStatus) -> Result<(), EvaluationError> {
        if !self.status.can_transition_to(&target) {
            if self.status == EvaluationStatus::Completed {
                return Err(EvaluationError::AlreadyCompleted);
            }
            return Err(EvaluationError::InvalidTransition {
                from: self.status,
                to: target,
            });
        }
        self.status = target;
        self.touch();
        Ok(())
    }

    fn touch(&mut self) {
        self.updated_at = Timestamp::now();
    }
}
