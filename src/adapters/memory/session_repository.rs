//! In-Memory Evaluation Session Repository
//!
//! Enforces the one-active-session-per-rater rule the way a unique partial
//! index would in a database.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::evaluation::EvaluationSession;
use crate::domain::foundation::{DomainError, ErrorCode, ProjectId, RaterId, SessionId};
use crate::ports::EvaluationSessionRepository;

#[derive(Debug, Clone, Default)]
pub struct InMemoryEvaluationSessionRepository {
    sessions: Arc<RwLock<HashMap<SessionId, EvaluationSession>>>,
}

impl InMemoryEvaluationSessionRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }

    fn conflicts(existing: &EvaluationSession, candidate: &EvaluationSession) -> bool {
        existing.id() != candidate.id()
            && existing.project_id() == candidate.project_id()
            && existing.rater_id() == candidate.rater_id()
            && existing.status().is_active()
            && candidate.status().is_active()
    }

    fn already_active(session: &EvaluationSession) -> DomainError {
        DomainError::new(
            ErrorCode::SessionAlreadyActive,
            format!(
                "Rater {} already has an active session for project {}",
                session.rater_id(),
                session.project_id()
            ),
        )
    }
}

#[async_trait]
impl EvaluationSessionRepository for InMemoryEvaluationSessionRepository {
    async fn save(&self, session: &EvaluationSession) -> Result<(), DomainError> {
        let mut sessions = self.sessions.write().await;
        if sessions.values().any(|s| Self::conflicts(s, session)) {
            return Err(Self::already_active(session));
        }
        sessions.insert(session.id(), session.clone());
        Ok(())
    }

    async fn update(&self, session: &EvaluationSession) -> Result<(), DomainError> {
        let mut sessions = self.sessions.write().await;
        if !sessions.contains_key(&session.id()) {
            return Err(DomainError::new(
                ErrorCode::SessionNotFound,
                format!("Session not found: {}", session.id()),
            ));
        }
        if sessions.values().any(|s| Self::conflicts(s, session)) {
            return Err(Self::already_active(session));
        }
        sessions.insert(session.id(), session.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &SessionId) -> Result<Option<EvaluationSession>, DomainError> {
        Ok(self.sessions.read().await.get(id).cloned())
    }

    async fn find_active(
        &self,
        project_id: &ProjectId,
        rater_id: &RaterId,
    ) -> Result<Option<EvaluationSession>, DomainError> {
        Ok(self
            .sessions
            .read()
            .await
            .values()
            .find(|s| {
                s.project_id() == *project_id && s.rater_id() == rater_id && s.status().is_active()
            })
            .cloned())
    }

    async fn find_completed_by_project(
        &self,
        project_id: &ProjectId,
    ) -> Result<Vec<EvaluationSession>, DomainError> {
        let mut completed: Vec<EvaluationSession> = self
            .sessions
            .read()
            .await
            .values()
            .filter(|s| s.project_id() == *project_id && s.is_completed())
            .cloned()
            .collect();
        completed.sort_by_key(|s| (s.completed_at(), s.rater_id().clone()));
        Ok(completed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::analysis::GlobalWeightResult;
    use crate::domain::foundation::{EvaluationStatus, Timestamp};
    use std::collections::BTreeMap;

    fn rater(name: &str) -> RaterId {
        RaterId::new(name).unwrap()
    }

    fn completed(project: ProjectId, name: &str, at: u64) -> EvaluationSession {
        let when = Timestamp::from_unix_secs(1_700_000_000 + at);
        EvaluationSession::reconstitute(
            SessionId::new(),
            project,
            rater(name),
            EvaluationStatus::Completed,
            None,
            0,
            BTreeMap::new(),
            Some(GlobalWeightResult {
                criteria: vec![],
                alternatives: vec![],
            }),
            when,
            when,
            Some(when),
        )
    }

    #[tokio::test]
    async fn save_and_find_by_id() {
        let repo = InMemoryEvaluationSessionRepository::new();
        let session = EvaluationSession::new(ProjectId::new(), rater("r1"));
        repo.save(&session).await.unwrap();

        assert_eq!(repo.find_by_id(&session.id()).await.unwrap(), Some(session));
        assert_eq!(repo.len().await, 1);
    }

    #[tokio::test]
    async fn second_active_session_is_rejected() {
        let repo = InMemoryEvaluationSessionRepository::new();
        let project = ProjectId::new();
        repo.save(&EvaluationSession::new(project, rater("r1"))).await.unwrap();

        let err = repo
            .save(&EvaluationSession::new(project, rater("r1")))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::SessionAlreadyActive);

        repo.save(&EvaluationSession::new(project, rater("r2"))).await.unwrap();
    }

    #[tokio::test]
    async fn completed_sessions_do_not_block_a_new_one() {
        let repo = InMemoryEvaluationSessionRepository::new();
        let project = ProjectId::new();
        repo.save(&completed(project, "r1", 10)).await.unwrap();
        repo.save(&EvaluationSession::new(project, rater("r1"))).await.unwrap();

        let active = repo.find_active(&project, &rater("r1")).await.unwrap();
        assert!(active.is_some_and(|s| !s.is_completed()));
    }

    #[tokio::test]
    async fn update_unknown_session_fails() {
        let repo = InMemoryEvaluationSessionRepository::new();
        let err = repo
            .update(&EvaluationSession::new(ProjectId::new(), rater("r1")))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::SessionNotFound);
    }

    #[tokio::test]
    async fn completed_sessions_are_ordered_by_completion() {
        let repo = InMemoryEvaluationSessionRepository::new();
        let project = ProjectId::new();
        repo.save(&completed(project, "late", 20)).await.unwrap();
        repo.save(&completed(project, "early", 10)).await.unwrap();
        repo.save(&completed(ProjectId::new(), "other", 5)).await.unwrap();
        repo.save(&EvaluationSession::new(project, rater("open"))).await.unwrap();

        let found = repo.find_completed_by_project(&project).await.unwrap();
        let names: Vec<&str> = found.iter().map(|s| s.rater_id().as_str()).collect();
        assert_eq!(names, vec!["early", "late"]);
    }
}
