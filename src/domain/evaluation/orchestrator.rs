//! EvaluationOrchestrator - Drives one rater through the hierarchy.
//!
//! The rater works breadth-first through every node whose comparison group
//! has two or more elements. A node is resolved once all its pairs are
//! judged and the matrix passes the consistency check. When no unresolved
//! node remains, local weights are propagated and the session completes.

use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info};

use crate::domain::analysis::{
    ComparisonSet, ConsistencyResult, ConsistencyValidator, GlobalWeightResult, MatrixBuilder,
    PairwiseComparison, WeightPropagator,
};
use crate::domain::foundation::{EvaluationStatus, EventId, NodeId, Timestamp};
use crate::domain::hierarchy::{Hierarchy, HierarchyError};
use crate::domain::progress::{push_or_warn, EvaluationProgress, ProgressTracker, StepDescriptor};
use crate::ports::ProgressChannel;

use super::{ConsistencyChecked, EvaluationError, EvaluationSession, SessionUpdated};

/// Latest computed state of one comparison group.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeCheck {
    pub submitted_pairs: usize,
    pub required_pairs: usize,
    pub consistency: ConsistencyResult,
}

impl NodeCheck {
    pub fn is_complete(&self) -> bool {
        self.submitted_pairs >= self.required_pairs
    }

    /// Complete and consistent.
    pub fn is_resolved(&self) -> bool {
        self.is_complete() && self.consistency.is_consistent
    }
}

/// What happened after a command.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum StepOutcome {
    /// The rater should work on `node_id`.
    Ready { node_id: NodeId },
    /// Judgments accepted; the group still has open pairs.
    AwaitingComparisons {
        node_id: NodeId,
        remaining_pairs: usize,
    },
    /// The group is complete but inconsistent; suggestions are attached.
    NeedsRevision {
        node_id: NodeId,
        consistency: ConsistencyResult,
    },
    Advanced {
        from: NodeId,
        to: NodeId,
        consistency: ConsistencyResult,
    },
    Completed { result: GlobalWeightResult },
}

/// Returns the first evaluable node, breadth-first, that is not resolved.
pub fn next_unresolved_node(
    hierarchy: &Hierarchy,
    checks: &HashMap<NodeId, NodeCheck>,
) -> Option<NodeId> {
    hierarchy
        .evaluable_nodes()
        .into_iter()
        .find(|id| !checks.get(id).is_some_and(NodeCheck::is_resolved))
}

/// State machine for one evaluation session.
pub struct EvaluationOrchestrator {
    session: EvaluationSession,
    hierarchy: Hierarchy,
    validator: ConsistencyValidator,
    checks: HashMap<NodeId, NodeCheck>,
    tracker: ProgressTracker,
}

impl EvaluationOrchestrator {
    /// Wraps a session without touching its state.
    pub fn new(
        session: EvaluationSession,
        hierarchy: Hierarchy,
        validator: ConsistencyValidator,
        channel: Arc<dyn ProgressChannel>,
    ) -> Self {
        let tracker = ProgressTracker::new(session.id(), &hierarchy, channel, session.created_at());
        Self {
            session,
            hierarchy,
            validator,
            checks: HashMap::new(),
            tracker,
        }
    }

    /// Rebuilds an orchestrator from a persisted session, replaying its
    /// stored judgments.
    ///
    /// # Errors
    /// - `Hierarchy(UnknownNode)` if judgments name a node that needs no matrix
    /// - `Analysis(..)` if stored judgments no longer fit the hierarchy
    pub fn restore(
        session: EvaluationSession,
        hierarchy: Hierarchy,
        validator: ConsistencyValidator,
        channel: Arc<dyn ProgressChannel>,
    ) -> Result<Self, EvaluationError> {
        let mut orchestrator = Self::new(session, hierarchy, validator, channel);
        let evaluable = orchestrator.hierarchy.evaluable_nodes();
        let stored: Vec<(NodeId, ComparisonSet)> = orchestrator
            .session
            .judgments()
            .iter()
            .map(|(id, set)| (id.clone(), set.clone()))
            .collect();

        for (node_id, set) in stored {
            if !evaluable.contains(&node_id) {
                return Err(HierarchyError::UnknownNode(node_id).into());
            }
            for comparison in set.iter() {
                comparison.validate()?;
            }
            let check = orchestrator.check_group(&node_id, &set)?;
            let outcome = check.is_complete().then_some((
                check.consistency.consistency_ratio,
                check.consistency.is_consistent,
            ));
            orchestrator
                .tracker
                .replay_node(&node_id, check.submitted_pairs, outcome);
            orchestrator.checks.insert(node_id, check);
        }

        if let Some(result) = orchestrator.session.result().cloned() {
            orchestrator.hierarchy.apply_weights(&result)?;
        } else if matches!(
            orchestrator.session.status(),
            EvaluationStatus::InProgress | EvaluationStatus::Paused
        ) && orchestrator.session.current_node().is_none()
        {
            let next = next_unresolved_node(&orchestrator.hierarchy, &orchestrator.checks);
            orchestrator.session.set_current_node(next);
        }
        orchestrator.announce_step(Timestamp::now());

        info!(
            session_id = %orchestrator.session.id(),
            status = %orchestrator.session.status(),
            replayed_nodes = orchestrator.checks.len(),
            "Evaluation restored"
        );
        Ok(orchestrator)
    }

    // ─────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────

    pub fn session(&self) -> &EvaluationSession {
        &self.session
    }

    pub fn hierarchy(&self) -> &Hierarchy {
        &self.hierarchy
    }

    pub fn node_check(&self, node_id: &NodeId) -> Option<&NodeCheck> {
        self.checks.get(node_id)
    }

    pub fn current_step(&self) -> Option<&StepDescriptor> {
        self.tracker.current_step()
    }

    /// Current progress snapshot.
    pub fn progress(&self) -> EvaluationProgress {
        self.tracker.snapshot(Timestamp::now())
    }

    // ─────────────────────────────────────────────────────────────────────
    // Commands
    // ─────────────────────────────────────────────────────────────────────

    /// Starts the session on the first unresolved node.
    ///
    /// Completes immediately when the hierarchy needs no comparisons.
    pub fn start(&mut self) -> Result<StepOutcome, EvaluationError> {
        let total = self.hierarchy.total_required_comparisons();
        let first = next_unresolved_node(&self.hierarchy, &self.checks);
        self.session.start(total, first.clone())?;

        info!(
            session_id = %self.session.id(),
            rater_id = %self.session.rater_id(),
            total_comparisons = total,
            "Evaluation started"
        );

        match first {
            Some(node_id) => {
                self.announce_step(Timestamp::now());
                self.publish_session();
                Ok(StepOutcome::Ready { node_id })
            }
            None => self.finish(),
        }
    }

    /// Applies one atomic batch of judgments to the current node.
    ///
    /// Nothing is stored if any judgment is invalid.
    ///
    /// # Errors
    /// - `NotStarted`, `Paused` or `AlreadyCompleted` for the wrong status
    /// - `NotCurrentNode` if `node_id` is not the node being worked on
    /// - `EmptyBatch` for an empty batch
    /// - `Analysis(..)` for self-comparisons, off-scale values or foreign ids
    pub fn submit_comparisons(
        &mut self,
        node_id: &NodeId,
        batch: Vec<PairwiseComparison>,
    ) -> Result<StepOutcome, EvaluationError> {
        self.session.ensure_accepts_comparisons()?;
        let current = self.session.current_node().cloned();
        if current.as_ref() != Some(node_id) {
            return Err(EvaluationError::NotCurrentNode {
                expected: current,
                actual: node_id.clone(),
            });
        }
        if batch.is_empty() {
            return Err(EvaluationError::EmptyBatch);
        }
        for comparison in &batch {
            comparison.validate()?;
        }

        let merged = self.stored_judgments(node_id).merged(&batch);
        let check = self.check_group(node_id, &merged)?;

        let now = Timestamp::now();
        self.session.record_judgments(node_id.clone(), merged);
        self.tracker
            .record_comparisons(node_id, check.submitted_pairs, check.is_complete(), now);
        let is_complete = check.is_complete();
        let remaining_pairs = check.required_pairs.saturating_sub(check.submitted_pairs);
        let consistency = check.consistency.clone();
        self.checks.insert(node_id.clone(), check);

        if !is_complete {
            debug!(
                session_id = %self.session.id(),
                node_id = %node_id,
                remaining_pairs,
                "Comparisons accepted, group still open"
            );
            return Ok(StepOutcome::AwaitingComparisons {
                node_id: node_id.clone(),
                remaining_pairs,
            });
        }

        self.tracker.record_consistency(
            node_id,
            consistency.consistency_ratio,
            consistency.is_consistent,
            now,
        );
        push_or_warn(
            self.tracker.channel().as_ref(),
            &ConsistencyChecked {
                event_id: EventId::new(),
                session_id: self.session.id(),
                node_id: node_id.clone(),
                consistency: consistency.clone(),
                checked_at: now,
            },
        );

        if !consistency.is_consistent {
            info!(
                session_id = %self.session.id(),
                node_id = %node_id,
                consistency_ratio = consistency.consistency_ratio,
                "Group inconsistent, revision needed"
            );
            return Ok(StepOutcome::NeedsRevision {
                node_id: node_id.clone(),
                consistency,
            });
        }

        match next_unresolved_node(&self.hierarchy, &self.checks) {
            Some(next) => {
                self.session.set_current_node(Some(next.clone()));
                self.announce_step(now);
                self.publish_session();
                debug!(
                    session_id = %self.session.id(),
                    from = %node_id,
                    to = %next,
                    "Advanced to next node"
                );
                Ok(StepOutcome::Advanced {
                    from: node_id.clone(),
                    to: next,
                    consistency,
                })
            }
            None => self.finish(),
        }
    }

    /// Computes a draft consistency check for the current node without
    /// committing anything.
    pub fn preview(&self, batch: &[PairwiseComparison]) -> Result<ConsistencyResult, EvaluationError> {
        let Some(node_id) = self.session.current_node() else {
            return Err(if self.session.is_completed() {
                EvaluationError::AlreadyCompleted
            } else {
                EvaluationError::NotStarted
            });
        };
        for comparison in batch {
            comparison.validate()?;
        }
        let merged = self.stored_judgments(node_id).merged(batch);
        Ok(self.check_group(node_id, &merged)?.consistency)
    }

    pub fn pause(&mut self) -> Result<(), EvaluationError> {
        self.session.pause()?;
        info!(session_id = %self.session.id(), "Evaluation paused");
        self.publish_session();
        Ok(())
    }

    /// Resumes on the node that was current when paused.
    pub fn resume(&mut self) -> Result<StepOutcome, EvaluationError> {
        self.session.resume()?;
        info!(session_id = %self.session.id(), "Evaluation resumed");
        self.publish_session();
        match self.session.current_node().cloned() {
            Some(node_id) => Ok(StepOutcome::Ready { node_id }),
            None => self.finish(),
        }
    }

    // ─────────────────────────────────────────────────────────────────────
    // Internals
    // ─────────────────────────────────────────────────────────────────────

    fn stored_judgments(&self, node_id: &NodeId) -> ComparisonSet {
        self.session
            .judgments_for(node_id)
            .cloned()
            .unwrap_or_default()
    }

    fn check_group(&self, node_id: &NodeId, judgments: &ComparisonSet) -> Result<NodeCheck, EvaluationError> {
        let group = self.hierarchy.comparison_group(node_id);
        let built = MatrixBuilder::build(&group, judgments)?;
        let consistency = self.validator.validate_group(&built)?;
        Ok(NodeCheck {
            submitted_pairs: built.submitted_pairs,
            required_pairs: built.required_pairs,
            consistency,
        })
    }

    fn finish(&mut self) -> Result<StepOutcome, EvaluationError> {
        let local_weights: HashMap<NodeId, Vec<f64>> = self
            .checks
            .iter()
            .map(|(id, check)| (id.clone(), check.consistency.weights.clone()))
            .collect();
        let result = WeightPropagator::propagate(&self.hierarchy, &local_weights)?;
        self.hierarchy.apply_weights(&result)?;
        self.session.complete(result.clone())?;
        self.tracker.set_current_step(None, Timestamp::now());
        self.publish_session();

        info!(
            session_id = %self.session.id(),
            alternatives = result.alternatives.len(),
            "Evaluation completed"
        );
        Ok(StepOutcome::Completed { result })
    }

    fn step_descriptor(&self, node_id: &NodeId) -> Option<StepDescriptor> {
        let node = self.hierarchy.node(node_id)?;
        let evaluable = self.hierarchy.evaluable_nodes();
        let step_index = evaluable.iter().position(|n| n == node_id)? + 1;
        Some(StepDescriptor {
            node_id: node_id.clone(),
            node_name: node.name.clone(),
            level: node.level,
            elements: self.hierarchy.comparison_group(node_id),
            step_index,
            total_steps: evaluable.len(),
        })
    }

    fn announce_step(&mut self, now: Timestamp) {
        let step = self
            .session
            .current_node()
            .and_then(|node_id| self.step_descriptor(node_id));
        self.tracker.set_current_step(step, now);
    }

    fn publish_session(&self) {
        push_or_warn(
            self.tracker.channel().as_ref(),
            &SessionUpdated::from_session(&self.session),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::progress::RecordingProgressChannel;
    use crate::domain::analysis::AnalysisError;
    use crate::domain::foundation::{EvaluationStatus, ProjectId, RaterId};
    use crate::domain::hierarchy::fixtures::{flat_hierarchy, id};

    fn cmp(a: &str, b: &str, v: f64) -> PairwiseComparison {
        PairwiseComparison::new(id(a), id(b), v).unwrap()
    }

    fn orchestrator_for(hierarchy: Hierarchy) -> (EvaluationOrchestrator, Arc<RecordingProgressChannel>) {
        let channel = Arc::new(RecordingProgressChannel::new());
        let session = EvaluationSession::new(ProjectId::new(), RaterId::new("rater-1").unwrap());
        let orchestrator = EvaluationOrchestrator::new(
            session,
            hierarchy,
            ConsistencyValidator::default(),
            channel.clone(),
        );
        (orchestrator, channel)
    }

    fn two_by_two() -> (EvaluationOrchestrator, Arc<RecordingProgressChannel>) {
        orchestrator_for(flat_hierarchy(&["c1", "c2"], &["a1", "a2"]))
    }

    fn three_criteria() -> (EvaluationOrchestrator, Arc<RecordingProgressChannel>) {
        orchestrator_for(flat_hierarchy(&["c1", "c2", "c3"], &["a1", "a2"]))
    }

    // ───────────────────────────────────────────────────────────────
    // Start
    // ───────────────────────────────────────────────────────────────

    #[test]
    fn start_begins_at_goal() {
        let (mut o, channel) = two_by_two();
        let outcome = o.start().unwrap();

        assert_eq!(outcome, StepOutcome::Ready { node_id: id("goal") });
        assert_eq!(o.session().status(), EvaluationStatus::InProgress);
        assert_eq!(o.session().total_comparisons(), 3);
        let step = o.current_step().unwrap();
        assert_eq!(step.step_index, 1);
        assert_eq!(step.total_steps, 3);
        assert_eq!(step.elements, vec![id("c1"), id("c2")]);
        assert!(channel.has_event("evaluation.session_updated.v1"));
    }

    #[test]
    fn hierarchy_without_comparisons_completes_on_start() {
        let (mut o, _) = orchestrator_for(flat_hierarchy(&["c1"], &["a1"]));
        let outcome = o.start().unwrap();

        let StepOutcome::Completed { result } = outcome else {
            panic!("expected immediate completion, got {outcome:?}");
        };
        assert_eq!(result.ranking(), vec![&id("a1")]);
        assert_eq!(result.alternatives[0].total_score, 1.0);
        assert!(o.session().is_completed());
    }

    #[test]
    fn cannot_start_twice() {
        let (mut o, _) = two_by_two();
        o.start().unwrap();
        assert!(matches!(
            o.start(),
            Err(EvaluationError::InvalidTransition { .. })
        ));
    }

    // ───────────────────────────────────────────────────────────────
    // Submission flow
    // ───────────────────────────────────────────────────────────────

    #[test]
    fn full_run_ranks_alternatives() {
        let (mut o, channel) = two_by_two();
        o.start().unwrap();

        let outcome = o.submit_comparisons(&id("goal"), vec![cmp("c1", "c2", 3.0)]).unwrap();
        assert!(matches!(outcome, StepOutcome::Advanced { ref to, .. } if *to == id("c1")));

        let outcome = o.submit_comparisons(&id("c1"), vec![cmp("a1", "a2", 2.0)]).unwrap();
        assert!(matches!(outcome, StepOutcome::Advanced { ref to, .. } if *to == id("c2")));

        let outcome = o.submit_comparisons(&id("c2"), vec![cmp("a2", "a1", 4.0)]).unwrap();
        let StepOutcome::Completed { result } = outcome else {
            panic!("expected completion, got {outcome:?}");
        };

        assert!((result.criterion(&id("c1")).unwrap().global_weight - 0.75).abs() < 1e-12);
        let a1 = result.alternative(&id("a1")).unwrap();
        assert!((a1.total_score - 0.55).abs() < 1e-9);
        assert_eq!(a1.rank, 1);
        assert_eq!(o.session().completed_comparisons(), 3);
        assert!(o.session().result().is_some());
        let c1_weight = o.hierarchy().node(&id("c1")).unwrap().global_weight.unwrap();
        assert!((c1_weight - 0.75).abs() < 1e-12);

        let last = channel.last_of_type("evaluation.session_updated.v1").unwrap();
        assert_eq!(last.payload["status"], "completed");
        assert_eq!(o.progress().completed_nodes, 3);
    }

    #[test]
    fn partial_batch_keeps_node_open() {
        let (mut o, _) = three_criteria();
        o.start().unwrap();

        let outcome = o.submit_comparisons(&id("goal"), vec![cmp("c1", "c2", 3.0)]).unwrap();
        assert_eq!(
            outcome,
            StepOutcome::AwaitingComparisons {
                node_id: id("goal"),
                remaining_pairs: 2,
            }
        );
        assert_eq!(o.session().current_node(), Some(&id("goal")));
        assert_eq!(o.progress().completed_comparisons, 1);
    }

    #[test]
    fn inconsistent_group_needs_revision() {
        let (mut o, channel) = three_criteria();
        o.start().unwrap();

        let outcome = o
            .submit_comparisons(
                &id("goal"),
                vec![cmp("c1", "c2", 9.0), cmp("c1", "c3", 9.0), cmp("c2", "c3", 9.0)],
            )
            .unwrap();

        let StepOutcome::NeedsRevision { consistency, .. } = outcome else {
            panic!("expected revision, got {outcome:?}");
        };
        assert!(!consistency.is_consistent);
        assert!(!consistency.suggestions.is_empty());
        assert_eq!(o.session().current_node(), Some(&id("goal")));
        assert!(!o.progress().nodes[0].is_completed);
        assert!(channel.has_event("evaluation.consistency_checked.v1"));
    }

    #[test]
    fn revised_judgments_replace_earlier_ones() {
        let (mut o, _) = three_criteria();
        o.start().unwrap();
        o.submit_comparisons(
            &id("goal"),
            vec![cmp("c1", "c2", 9.0), cmp("c1", "c3", 9.0), cmp("c2", "c3", 9.0)],
        )
        .unwrap();

        let outcome = o
            .submit_comparisons(&id("goal"), vec![cmp("c1", "c3", 5.0), cmp("c2", "c3", 2.0), cmp("c1", "c2", 3.0)])
            .unwrap();

        assert!(matches!(outcome, StepOutcome::Advanced { .. }));
        assert_eq!(o.session().judgments_for(&id("goal")).unwrap().len(), 3);
        assert!(o.node_check(&id("goal")).unwrap().is_resolved());
    }

    #[test]
    fn rejects_submission_for_other_node() {
        let (mut o, _) = two_by_two();
        o.start().unwrap();

        let err = o
            .submit_comparisons(&id("c1"), vec![cmp("a1", "a2", 2.0)])
            .unwrap_err();
        assert_eq!(
            err,
            EvaluationError::NotCurrentNode {
                expected: Some(id("goal")),
                actual: id("c1"),
            }
        );
    }

    #[test]
    fn rejects_empty_batch() {
        let (mut o, _) = two_by_two();
        o.start().unwrap();
        assert_eq!(
            o.submit_comparisons(&id("goal"), vec![]),
            Err(EvaluationError::EmptyBatch)
        );
    }

    #[test]
    fn invalid_batch_is_rejected_atomically() {
        let (mut o, _) = three_criteria();
        o.start().unwrap();

        let err = o
            .submit_comparisons(&id("goal"), vec![cmp("c1", "c2", 3.0), cmp("c1", "a1", 3.0)])
            .unwrap_err();

        assert_eq!(err, EvaluationError::Analysis(AnalysisError::UnknownElement(id("a1"))));
        assert!(o.session().judgments_for(&id("goal")).is_none());
        assert_eq!(o.session().completed_comparisons(), 0);
    }

    #[test]
    fn paused_session_rejects_comparisons() {
        let (mut o, _) = two_by_two();
        o.start().unwrap();
        o.pause().unwrap();

        assert_eq!(
            o.submit_comparisons(&id("goal"), vec![cmp("c1", "c2", 3.0)]),
            Err(EvaluationError::Paused)
        );

        let outcome = o.resume().unwrap();
        assert_eq!(outcome, StepOutcome::Ready { node_id: id("goal") });
        assert!(o.submit_comparisons(&id("goal"), vec![cmp("c1", "c2", 3.0)]).is_ok());
    }

    // ───────────────────────────────────────────────────────────────
    // Preview
    // ───────────────────────────────────────────────────────────────

    #[test]
    fn preview_does_not_commit() {
        let (mut o, _) = three_criteria();
        o.start().unwrap();

        let draft = o
            .preview(&[cmp("c1", "c2", 9.0), cmp("c1", "c3", 9.0), cmp("c2", "c3", 9.0)])
            .unwrap();

        assert!(!draft.is_consistent);
        assert!(o.session().judgments_for(&id("goal")).is_none());
        assert!(o.node_check(&id("goal")).is_none());
    }

    #[test]
    fn preview_before_start_is_rejected() {
        let (o, _) = two_by_two();
        assert_eq!(o.preview(&[]), Err(EvaluationError::NotStarted));
    }

    // ───────────────────────────────────────────────────────────────
    // Restore
    // ───────────────────────────────────────────────────────────────

    #[test]
    fn restore_replays_stored_judgments() {
        let (mut o, _) = two_by_two();
        o.start().unwrap();
        o.submit_comparisons(&id("goal"), vec![cmp("c1", "c2", 3.0)]).unwrap();
        let persisted = o.session().clone();

        let mut restored = EvaluationOrchestrator::restore(
            persisted,
            flat_hierarchy(&["c1", "c2"], &["a1", "a2"]),
            ConsistencyValidator::default(),
            Arc::new(RecordingProgressChannel::new()),
        )
        .unwrap();

        assert_eq!(restored.session().current_node(), Some(&id("c1")));
        assert!(restored.node_check(&id("goal")).unwrap().is_resolved());
        assert_eq!(restored.progress().completed_nodes, 1);
        assert_eq!(restored.current_step().unwrap().node_id, id("c1"));

        let outcome = restored
            .submit_comparisons(&id("c1"), vec![cmp("a1", "a2", 2.0)])
            .unwrap();
        assert!(matches!(outcome, StepOutcome::Advanced { .. }));
    }

    #[test]
    fn restored_session_has_no_estimate_until_a_node_completes_live() {
        let (mut o, _) = two_by_two();
        o.start().unwrap();
        o.submit_comparisons(&id("goal"), vec![cmp("c1", "c2", 3.0)]).unwrap();

        let mut restored = EvaluationOrchestrator::restore(
            o.session().clone(),
            flat_hierarchy(&["c1", "c2"], &["a1", "a2"]),
            ConsistencyValidator::default(),
            Arc::new(RecordingProgressChannel::new()),
        )
        .unwrap();
        assert!(restored.progress().estimated_remaining_secs.is_none());

        std::thread::sleep(std::time::Duration::from_millis(20));
        restored
            .submit_comparisons(&id("c1"), vec![cmp("a1", "a2", 2.0)])
            .unwrap();
        let eta = restored.progress().estimated_remaining_secs.unwrap();
        assert!(eta > 0.0, "estimate should reflect time spent on c1, got {eta}");
    }

    #[test]
    fn restore_rejects_judgments_for_unknown_nodes() {
        let mut judgments = std::collections::BTreeMap::new();
        judgments.insert(id("ghost"), ComparisonSet::new());
        let session = EvaluationSession::reconstitute(
            crate::domain::foundation::SessionId::new(),
            ProjectId::new(),
            RaterId::new("rater-1").unwrap(),
            EvaluationStatus::InProgress,
            Some(id("goal")),
            3,
            judgments,
            None,
            Timestamp::now(),
            Timestamp::now(),
            None,
        );

        let err = EvaluationOrchestrator::restore(
            session,
            flat_hierarchy(&["c1", "c2"], &["a1", "a2"]),
            ConsistencyValidator::default(),
            Arc::new(RecordingProgressChannel::new()),
        )
        .err()
        .unwrap();
        assert_eq!(err, EvaluationError::Hierarchy(HierarchyError::UnknownNode(id("ghost"))));
    }

    // ───────────────────────────────────────────────────────────────
    // Progress
    // ───────────────────────────────────────────────────────────────

    #[test]
    fn node_time_runs_from_becoming_current_to_completion() {
        let (mut o, _) = two_by_two();
        o.start().unwrap();
        std::thread::sleep(std::time::Duration::from_millis(20));
        o.submit_comparisons(&id("goal"), vec![cmp("c1", "c2", 3.0)]).unwrap();

        let progress = o.progress();
        let goal = progress.nodes.iter().find(|n| n.node_id == id("goal")).unwrap();
        let spent = goal.time_spent_secs().unwrap();
        assert!(spent >= 0.02, "goal took {spent}s");

        // one node done, two left
        let eta = progress.estimated_remaining_secs.unwrap();
        assert!((eta - 2.0 * spent).abs() < 1e-9);

        let next = progress.nodes.iter().find(|n| n.node_id == id("c1")).unwrap();
        assert!(next.started_at.is_some());
    }

    // ───────────────────────────────────────────────────────────────
    // Node search
    // ───────────────────────────────────────────────────────────────

    #[test]
    fn next_unresolved_node_skips_resolved_groups() {
        let hierarchy = flat_hierarchy(&["c1", "c2"], &["a1", "a2"]);
        let mut checks = HashMap::new();
        assert_eq!(next_unresolved_node(&hierarchy, &checks), Some(id("goal")));

        let resolved = NodeCheck {
            submitted_pairs: 1,
            required_pairs: 1,
            consistency: ConsistencyValidator::default()
                .validate(&crate::domain::analysis::ComparisonMatrix::neutral(2))
                .unwrap(),
        };
        checks.insert(id("goal"), resolved.clone());
        checks.insert(id("c1"), resolved);
        assert_eq!(next_unresolved_node(&hierarchy, &checks), Some(id("c2")));
    }
}
