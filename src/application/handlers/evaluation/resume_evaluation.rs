//! ResumeEvaluationHandler - Continues a paused session where it stopped.

use std::sync::Arc;

use crate::application::ActiveEvaluations;
use crate::domain::evaluation::StepOutcome;
use crate::domain::foundation::{DomainError, SessionId};
use crate::domain::progress::EvaluationProgress;

#[derive(Debug, Clone)]
pub struct ResumeEvaluationCommand {
    pub session_id: SessionId,
}

#[derive(Debug, Clone)]
pub struct ResumeEvaluationResult {
    pub outcome: StepOutcome,
    pub progress: EvaluationProgress,
}

pub struct ResumeEvaluationHandler {
    evaluations: Arc<ActiveEvaluations>,
}

impl ResumeEvaluationHandler {
    pub fn new(evaluations: Arc<ActiveEvaluations>) -> Self {
        Self { evaluations }
    }

    pub async fn handle(&self, cmd: ResumeEvaluationCommand) -> Result<ResumeEvaluationResult, DomainError> {
        let shared = self.evaluations.open(&cmd.session_id).await?;
        let mut orchestrator = shared.lock().await;
        let outcome = orchestrator.resume()?;
        self.evaluations.persist(&orchestrator).await?;
        Ok(ResumeEvaluationResult {
            outcome,
            progress: orchestrator.progress(),
        })
    }
}
