//! ActiveEvaluations - Registry of live orchestrators.
//!
//! Each session's orchestrator sits behind its own `tokio::sync::Mutex`, so
//! commands for one session are serialised while sessions stay independent.
//! Sessions missing from the registry are restored from the repository on
//! first use.

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::domain::analysis::ConsistencyValidator;
use crate::domain::evaluation::EvaluationOrchestrator;
use crate::domain::foundation::{DomainError, ErrorCode, ProjectId, SessionId};
use crate::domain::hierarchy::Hierarchy;
use crate::ports::{EvaluationSessionRepository, HierarchyReader, ProgressChannel};

/// Orchestrator shared between concurrent commands of one session.
pub type SharedOrchestrator = Arc<Mutex<EvaluationOrchestrator>>;

pub struct ActiveEvaluations {
    hierarchy_reader: Arc<dyn HierarchyReader>,
    repository: Arc<dyn EvaluationSessionRepository>,
    channel: Arc<dyn ProgressChannel>,
    validator: ConsistencyValidator,
    live: Mutex<HashMap<SessionId, SharedOrchestrator>>,
}

impl ActiveEvaluations {
    pub fn new(
        hierarchy_reader: Arc<dyn HierarchyReader>,
        repository: Arc<dyn EvaluationSessionRepository>,
        channel: Arc<dyn ProgressChannel>,
        validator: ConsistencyValidator,
    ) -> Self {
        Self {
            hierarchy_reader,
            repository,
            channel,
            validator,
            live: Mutex::new(HashMap::new()),
        }
    }

    pub fn repository(&self) -> &Arc<dyn EvaluationSessionRepository> {
        &self.repository
    }

    pub fn validator(&self) -> ConsistencyValidator {
        self.validator
    }

    pub fn channel(&self) -> Arc<dyn ProgressChannel> {
        Arc::clone(&self.channel)
    }

    /// Loads and revalidates a project hierarchy.
    pub async fn load_hierarchy(&self, project_id: &ProjectId) -> Result<Hierarchy, DomainError> {
        let nodes = self.hierarchy_reader.load(project_id).await?;
        Ok(Hierarchy::from_nodes(nodes)?)
    }

    /// Registers an orchestrator. An existing entry for the same session wins.
    pub async fn insert(&self, orchestrator: EvaluationOrchestrator) -> SharedOrchestrator {
        let session_id = orchestrator.session().id();
        let mut live = self.live.lock().await;
        Arc::clone(
            live.entry(session_id)
                .or_insert_with(|| Arc::new(Mutex::new(orchestrator))),
        )
    }

    /// Returns the live orchestrator, restoring it from storage if needed.
    ///
    /// Completed sessions are restored for reading but not kept.
    ///
    /// # Errors
    ///
    /// - `SessionNotFound` if the repository has no such session
    /// - Hierarchy or replay errors if the stored session no longer fits
    pub async fn open(&self, session_id: &SessionId) -> Result<SharedOrchestrator, DomainError> {
        if let Some(found) = self.live.lock().await.get(session_id) {
            return Ok(Arc::clone(found));
        }

        let session = self
            .repository
            .find_by_id(session_id)
            .await?
            .ok_or_else(|| {
                DomainError::new(
                    ErrorCode::SessionNotFound,
                    format!("Session not found: {}", session_id),
                )
            })?;
        let hierarchy = self.load_hierarchy(&session.project_id()).await?;
        let orchestrator =
            EvaluationOrchestrator::restore(session, hierarchy, self.validator, self.channel())?;
        debug!(session_id = %session_id, "Orchestrator restored from storage");

        if orchestrator.session().is_completed() {
            self.close_channel(session_id);
            return Ok(Arc::new(Mutex::new(orchestrator)));
        }
        Ok(self.insert(orchestrator).await)
    }

    /// Writes the session back, dropping the live entry once completed.
    ///
    /// On failure the entry is evicted so the next command restores the
    /// last stored state.
    pub async fn persist(&self, orchestrator: &EvaluationOrchestrator) -> Result<(), DomainError> {
        let session = orchestrator.session();
        if let Err(e) = self.repository.update(session).await {
            warn!(session_id = %session.id(), error = %e, "Failed to persist session, evicting");
            self.evict(&session.id()).await;
            return Err(e);
        }
        if session.is_completed() {
            self.evict(&session.id()).await;
            self.close_channel(&session.id());
        }
        Ok(())
    }

    /// Releases the progress channel's state for a finished session.
    pub fn close_channel(&self, session_id: &SessionId) {
        if let Err(e) = self.channel.close(&session_id.to_string()) {
            warn!(session_id = %session_id, error = %e, "Failed to close progress channel");
        }
    }

    pub async fn evict(&self, session_id: &SessionId) {
        self.live.lock().await.remove(session_id);
    }

    pub async fn contains(&self, session_id: &SessionId) -> bool {
        self.live.lock().await.contains_key(session_id)
    }

    pub async fn len(&self) -> usize {
        self.live.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.live.lock().await.is_empty()
    }
}
