//! StartEvaluationHandler - Command handler for starting a rater's session.

use std::sync::Arc;

use crate::application::ActiveEvaluations;
use crate::domain::evaluation::{EvaluationOrchestrator, EvaluationSession, StepOutcome};
use crate::domain::foundation::{DomainError, ErrorCode, ProjectId, RaterId, SessionId};
use crate::domain::progress::EvaluationProgress;

/// Command to start evaluating a project as one rater.
#[derive(Debug, Clone)]
pub struct StartEvaluationCommand {
    pub project_id: ProjectId,
    pub rater_id: RaterId,
}

#[derive(Debug, Clone)]
pub struct StartEvaluationResult {
    pub session_id: SessionId,
    pub outcome: StepOutcome,
    pub progress: EvaluationProgress,
}

/// Handler for starting evaluations.
pub struct StartEvaluationHandler {
    evaluations: Arc<ActiveEvaluations>,
}

impl StartEvaluationHandler {
    pub fn new(evaluations: Arc<ActiveEvaluations>) -> Self {
        Self { evaluations }
    }

    pub async fn handle(&self, cmd: StartEvaluationCommand) -> Result<StartEvaluationResult, DomainError> {
        let repository = self.evaluations.repository();

        // 1. One active session per rater and project
        if let Some(existing) = repository.find_active(&cmd.project_id, &cmd.rater_id).await? {
            return Err(DomainError::new(
                ErrorCode::SessionAlreadyActive,
                format!("Rater {} already has an active session", cmd.rater_id),
            )
            .with_detail("session_id", existing.id().to_string()));
        }

        // 2. Load and validate the hierarchy before anything is stored
        let hierarchy = self.evaluations.load_hierarchy(&cmd.project_id).await?;

        // 3. Persist the fresh session, then start it
        let session = EvaluationSession::new(cmd.project_id, cmd.rater_id);
        repository.save(&session).await?;

        let mut orchestrator = EvaluationOrchestrator::new(
            session,
            hierarchy,
            self.evaluations.validator(),
            self.evaluations.channel(),
        );
        let outcome = orchestrator.start()?;
        repository.update(orchestrator.session()).await?;

        let result = StartEvaluationResult {
            session_id: orchestrator.session().id(),
            progress: orchestrator.progress(),
            outcome,
        };

        // 4. Keep it live unless it completed on start
        if orchestrator.session().is_completed() {
            self.evaluations.close_channel(&result.session_id);
        } else {
            self.evaluations.insert(orchestrator).await;
        }
        Ok(result)
    }
}
