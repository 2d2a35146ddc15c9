//! In-Memory Hierarchy Reader
//!
//! Serves project hierarchies seeded by the caller.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::foundation::{DomainError, ErrorCode, ProjectId};
use crate::domain::hierarchy::HierarchyNode;
use crate::ports::HierarchyReader;

/// Hierarchy store backed by a map of raw node lists.
#[derive(Debug, Clone, Default)]
pub struct InMemoryHierarchyReader {
    projects: Arc<RwLock<HashMap<ProjectId, Vec<HierarchyNode>>>>,
}

impl InMemoryHierarchyReader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores (or replaces) the nodes of a project. No validation happens
    /// here; readers of the port revalidate.
    pub async fn insert(&self, project_id: ProjectId, nodes: Vec<HierarchyNode>) {
        self.projects.write().await.insert(project_id, nodes);
    }

    pub async fn project_count(&self) -> usize {
        self.projects.read().await.len()
    }
}

#[async_trait]
impl HierarchyReader for InMemoryHierarchyReader {
    async fn load(&self, project_id: &ProjectId) -> Result<Vec<HierarchyNode>, DomainError> {
        self.projects
            .read()
            .await
            .get(project_id)
            .cloned()
            .ok_or_else(|| {
                DomainError::new(
                    ErrorCode::ProjectNotFound,
                    format!("No hierarchy for project {}", project_id),
                )
            })
    }
}
