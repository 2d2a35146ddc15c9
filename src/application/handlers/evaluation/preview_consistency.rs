//! PreviewConsistencyHandler - Draft consistency check for the current node.

use std::sync::Arc;

use crate::application::ActiveEvaluations;
use crate::domain::analysis::{ConsistencyResult, PairwiseComparison};
use crate::domain::foundation::{DomainError, SessionId};

/// Judgments to try against the current node; nothing is stored.
#[derive(Debug, Clone)]
pub struct PreviewConsistencyQuery {
    pub session_id: SessionId,
    pub comparisons: Vec<PairwiseComparison>,
}

pub struct PreviewConsistencyHandler {
    evaluations: Arc<ActiveEvaluations>,
}

impl PreviewConsistencyHandler {
    pub fn new(evaluations: Arc<ActiveEvaluations>) -> Self {
        Self { evaluations }
    }

    pub async fn handle(&self, query: PreviewConsistencyQuery) -> Result<ConsistencyResult, DomainError> {
        let shared = self.evaluations.open(&query.session_id).await?;
        let orchestrator = shared.lock().await;
        Ok(orchestrator.preview(&query.comparisons)?)
    }
}
