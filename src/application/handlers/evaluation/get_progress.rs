//! GetProgressHandler - Query handler for a session's progress snapshot.

use std::sync::Arc;

use crate::application::ActiveEvaluations;
use crate::domain::foundation::{DomainError, SessionId};
use crate::domain::progress::EvaluationProgress;

#[derive(Debug, Clone)]
pub struct GetProgressQuery {
    pub session_id: SessionId,
}

pub struct GetProgressHandler {
    evaluations: Arc<ActiveEvaluations>,
}

impl GetProgressHandler {
    pub fn new(evaluations: Arc<ActiveEvaluations>) -> Self {
        Self { evaluations }
    }

    pub async fn handle(&self, query: GetProgressQuery) -> Result<EvaluationProgress, DomainError> {
        let shared = self.evaluations.open(&query.session_id).await?;
        let orchestrator = shared.lock().await;
        Ok(orchestrator.progress())
    }
}
