//! ProgressTracker - Per-node progress with push notifications.
//!
//! Every mutation ends with a fire-and-forget `ProgressUpdated` push.
//! Channel failures are logged and never touch tracker state.

use std::sync::Arc;
use tracing::{debug, warn};

use crate::domain::foundation::{
    EventId, NodeId, SerializableDomainEvent, SessionId, Timestamp,
};
use crate::domain::hierarchy::{pair_count, Hierarchy};
use crate::ports::ProgressChannel;

use super::{EvaluationProgress, NodeProgress, ProgressUpdated, StepDescriptor};

/// Pushes an event, logging instead of failing.
pub(crate) fn push_or_warn<E: SerializableDomainEvent>(channel: &dyn ProgressChannel, event: &E) {
    let envelope = match event.to_envelope() {
        Ok(envelope) => envelope,
        Err(e) => {
            warn!(event_type = event.event_type(), error = %e, "Failed to serialize notification");
            return;
        }
    };
    if let Err(e) = channel.push(envelope) {
        warn!(
            event_type = event.event_type(),
            aggregate_id = %event.aggregate_id(),
            error = %e,
            "Dropped notification"
        );
    }
}

/// Tracks progress of one evaluation session.
pub struct ProgressTracker {
    session_id: SessionId,
    nodes: Vec<NodeProgress>,
    started_at: Timestamp,
    current_step: Option<StepDescriptor>,
    channel: Arc<dyn ProgressChannel>,
}

impl ProgressTracker {
    /// Creates a tracker with one entry per evaluable node, breadth-first.
    pub fn new(
        session_id: SessionId,
        hierarchy: &Hierarchy,
        channel: Arc<dyn ProgressChannel>,
        started_at: Timestamp,
    ) -> Self {
        let nodes = hierarchy
            .evaluable_nodes()
            .into_iter()
            .map(|id| {
                let total = pair_count(hierarchy.comparison_group(&id).len());
                NodeProgress::new(id, total)
            })
            .collect();
        Self {
            session_id,
            nodes,
            started_at,
            current_step: None,
            channel,
        }
    }

    pub fn session_id(&self) -> &SessionId {
        &self.session_id
    }

    pub fn channel(&self) -> &Arc<dyn ProgressChannel> {
        &self.channel
    }

    pub fn node(&self, node_id: &NodeId) -> Option<&NodeProgress> {
        self.nodes.iter().find(|n| &n.node_id == node_id)
    }

    pub fn current_step(&self) -> Option<&StepDescriptor> {
        self.current_step.as_ref()
    }

    /// Points the tracker at a new step and publishes.
    ///
    /// The step's node starts its clock here unless it was started before.
    pub fn set_current_step(&mut self, step: Option<StepDescriptor>, now: Timestamp) {
        if let Some(step) = &step {
            if let Some(entry) = self.nodes.iter_mut().find(|n| n.node_id == step.node_id) {
                entry.started_at.get_or_insert(now);
            }
        }
        self.current_step = step;
        self.publish(now);
    }

    /// Restores counts for a node judged in an earlier run, without
    /// publishing.
    ///
    /// `check` carries `(consistency_ratio, is_consistent)` once the group is
    /// complete. Replayed nodes get no timestamps, so they never feed the
    /// remaining-time estimate.
    pub fn replay_node(&mut self, node_id: &NodeId, completed: usize, check: Option<(f64, bool)>) {
        let Some(entry) = self.nodes.iter_mut().find(|n| &n.node_id == node_id) else {
            debug!(node_id = %node_id, "Ignoring replay for non-evaluable node");
            return;
        };
        entry.completed_comparisons = completed.min(entry.total_comparisons);
        if let Some((ratio, is_consistent)) = check {
            entry.last_consistency_ratio = Some(ratio);
            entry.is_consistent = is_consistent;
            entry.is_completed = is_consistent;
        }
    }

    /// Records accepted comparisons for a node.
    ///
    /// `completed` is the number of distinct pairs judged so far. The node
    /// is marked completed when `is_complete` is set.
    pub fn record_comparisons(
        &mut self,
        node_id: &NodeId,
        completed: usize,
        is_complete: bool,
        now: Timestamp,
    ) {
        let Some(entry) = self.nodes.iter_mut().find(|n| &n.node_id == node_id) else {
            debug!(node_id = %node_id, "Ignoring progress for non-evaluable node");
            return;
        };
        entry.completed_comparisons = completed.min(entry.total_comparisons);
        entry.started_at.get_or_insert(now);
        if is_complete {
            entry.is_completed = true;
            entry.completed_at = Some(now);
        }
        self.publish(now);
    }

    /// Records a consistency check. A failing check revokes completion.
    pub fn record_consistency(
        &mut self,
        node_id: &NodeId,
        consistency_ratio: f64,
        is_consistent: bool,
        now: Timestamp,
    ) {
        let Some(entry) = self.nodes.iter_mut().find(|n| &n.node_id == node_id) else {
            debug!(node_id = %node_id, "Ignoring consistency for non-evaluable node");
            return;
        };
        entry.last_consistency_ratio = Some(consistency_ratio);
        entry.is_consistent = is_consistent;
        if !is_consistent {
            entry.is_completed = false;
            entry.completed_at = None;
        }
        self.publish(now);
    }

    /// Builds a snapshot as of `now`.
    ///
    /// # Edge Cases
    /// - No evaluable nodes: overall progress 1
    /// - No completed nodes: remaining time unavailable
    pub fn snapshot(&self, now: Timestamp) -> EvaluationProgress {
        let total_nodes = self.nodes.len();
        let completed: Vec<&NodeProgress> = self.nodes.iter().filter(|n| n.is_completed).collect();
        let completed_nodes = completed.len();

        let overall_progress = if total_nodes == 0 {
            1.0
        } else {
            completed_nodes as f64 / total_nodes as f64
        };

        let ratios: Vec<f64> = self
            .nodes
            .iter()
            .filter_map(|n| n.last_consistency_ratio)
            .collect();
        let average_consistency_ratio =
            (!ratios.is_empty()).then(|| ratios.iter().sum::<f64>() / ratios.len() as f64);

        let durations: Vec<f64> = completed.iter().filter_map(|n| n.time_spent_secs()).collect();
        let estimated_remaining_secs = (!durations.is_empty()).then(|| {
            let mean = durations.iter().sum::<f64>() / durations.len() as f64;
            mean * (total_nodes - completed_nodes) as f64
        });

        EvaluationProgress {
            session_id: self.session_id,
            total_nodes,
            completed_nodes,
            total_comparisons: self.nodes.iter().map(|n| n.total_comparisons).sum(),
            completed_comparisons: self.nodes.iter().map(|n| n.completed_comparisons).sum(),
            overall_progress,
            average_consistency_ratio,
            elapsed_secs: now.seconds_since(&self.started_at),
            estimated_remaining_secs,
            current_step: self.current_step.clone(),
            nodes: self.nodes.clone(),
        }
    }

    fn publish(&self, now: Timestamp) {
        let event = ProgressUpdated {
            event_id: EventId::new(),
            session_id: self.session_id,
            progress: self.snapshot(now),
            updated_at: now,
        };
        push_or_warn(self.channel.as_ref(), &event);
    }
}
