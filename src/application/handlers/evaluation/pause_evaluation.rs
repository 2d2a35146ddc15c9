//! PauseEvaluationHandler - Suspends a session without losing judgments.

use std::sync::Arc;

use crate::application::ActiveEvaluations;
use crate::domain::foundation::{DomainError, SessionId};

#[derive(Debug, Clone)]
pub struct PauseEvaluationCommand {
    pub session_id: SessionId,
}

pub struct PauseEvaluationHandler {
    evaluations: Arc<ActiveEvaluations>,
}

impl PauseEvaluationHandler {
    pub fn new(evaluations: Arc<ActiveEvaluations>) -> Self {
        Self { evaluations }
    }

    pub async fn handle(&self, cmd: PauseEvaluationCommand) -> Result<(), DomainError> {
        let shared = self.evaluations.open(&cmd.session_id).await?;
        let mut orchestrator = shared.lock().await;
        orchestrator.pause()?;
        self.evaluations.persist(&orchestrator).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::{
        StartEvaluationCommand, StartEvaluationHandler, SubmitComparisonsCommand,
        SubmitComparisonsHandler,
    };
    use crate::application::test_support::{cmp, node, two_criteria_project, TestHarness};
    use crate::domain::foundation::{ErrorCode, EvaluationStatus, RaterId};
    use crate::ports::EvaluationSessionRepository;

    #[tokio::test]
    async fn paused_session_rejects_comparisons() {
        let harness = TestHarness::new().await;
        let project = two_criteria_project(&harness).await;
        let session_id = StartEvaluationHandler::new(harness.evaluations.clone())
            .handle(StartEvaluationCommand {
                project_id: project,
                rater_id: RaterId::new("rater-1").unwrap(),
            })
            .await
            .unwrap()
            .session_id;

        PauseEvaluationHandler::new(harness.evaluations.clone())
            .handle(PauseEvaluationCommand { session_id })
            .await
            .unwrap();

        let stored = harness.repository.find_by_id(&session_id).await.unwrap().unwrap();
        assert_eq!(stored.status(), EvaluationStatus::Paused);

        let err = SubmitComparisonsHandler::new(harness.evaluations.clone())
            .handle(SubmitComparisonsCommand {
                session_id,
                node_id: node("goal"),
                comparisons: vec![cmp("c1", "c2", 3.0)],
            })
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::SessionPaused);
    }

    #[tokio::test]
    async fn pausing_twice_is_an_invalid_transition() {
        let harness = TestHarness::new().await;
        let project = two_criteria_project(&harness).await;
        let session_id = StartEvaluationHandler::new(harness.evaluations.clone())
            .handle(StartEvaluationCommand {
                project_id: project,
                rater_id: RaterId::new("rater-1").unwrap(),
            })
            .await
            .unwrap()
            .session_id;
        let handler = PauseEvaluationHandler::new(harness.evaluations.clone());
        handler.handle(PauseEvaluationCommand { session_id }).await.unwrap();

        let err = handler.handle(PauseEvaluationCommand { session_id }).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidStateTransition);
    }
}
