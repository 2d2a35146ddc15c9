//! SubmitComparisonsHandler - Applies a batch of judgments to a session.

use std::sync::Arc;
use tracing::debug;

use crate::application::ActiveEvaluations;
use crate::domain::analysis::PairwiseComparison;
use crate::domain::evaluation::StepOutcome;
use crate::domain::foundation::{DomainError, NodeId, SessionId};
use crate::domain::progress::EvaluationProgress;

/// One atomic batch of judgments for the session's current node.
#[derive(Debug, Clone)]
pub struct SubmitComparisonsCommand {
    pub session_id: SessionId,
    pub node_id: NodeId,
    pub comparisons: Vec<PairwiseComparison>,
}

#[derive(Debug, Clone)]
pub struct SubmitComparisonsResult {
    pub outcome: StepOutcome,
    pub progress: EvaluationProgress,
}

pub struct SubmitComparisonsHandler {
    evaluations: Arc<ActiveEvaluations>,
}

impl SubmitComparisonsHandler {
    pub fn new(evaluations: Arc<ActiveEvaluations>) -> Self {
        Self { evaluations }
    }

    pub async fn handle(
        &self,
        cmd: SubmitComparisonsCommand,
    ) -> Result<SubmitComparisonsResult, DomainError> {
        let shared = self.evaluations.open(&cmd.session_id).await?;
        let mut orchestrator = shared.lock().await;

        let batch_size = cmd.comparisons.len();
        let outcome = orchestrator.submit_comparisons(&cmd.node_id, cmd.comparisons)?;
        self.evaluations.persist(&orchestrator).await?;

        debug!(
            session_id = %cmd.session_id,
            node_id = %cmd.node_id,
            batch_size,
            "Comparisons submitted"
        );

        Ok(SubmitComparisonsResult {
            outcome,
            progress: orchestrator.progress(),
        })
    }
}
