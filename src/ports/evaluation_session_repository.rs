//! Evaluation session repository port.
//!
//! One active (not completed) session per (project, rater); completed
//! sessions stay queryable for group calculations.

use async_trait::async_trait;

use crate::domain::evaluation::EvaluationSession;
use crate::domain::foundation::{DomainError, ProjectId, RaterId, SessionId};

/// Repository port for `EvaluationSession` persistence.
#[async_trait]
pub trait EvaluationSessionRepository: Send + Sync {
    /// Save a new session.
    ///
    /// # Errors
    ///
    /// - `SessionAlreadyActive` if the rater already has an active session
    ///   for the project
    /// - `DatabaseError` on persistence failure
    async fn save(&self, session: &EvaluationSession) -> Result<(), DomainError>;

    /// Update an existing session.
    ///
    /// # Errors
    ///
    /// - `SessionNotFound` if the session doesn't exist
    /// - `DatabaseError` on persistence failure
    async fn update(&self, session: &EvaluationSession) -> Result<(), DomainError>;

    /// Find a session by its ID.
    async fn find_by_id(&self, id: &SessionId) -> Result<Option<EvaluationSession>, DomainError>;

    /// Find the rater's session for the project that is not yet completed.
    async fn find_active(
        &self,
        project_id: &ProjectId,
        rater_id: &RaterId,
    ) -> Result<Option<EvaluationSession>, DomainError>;

    /// Find all completed sessions of a project, oldest completion first.
    async fn find_completed_by_project(
        &self,
        project_id: &ProjectId,
    ) -> Result<Vec<EvaluationSession>, DomainError>;
}
