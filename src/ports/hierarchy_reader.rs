//! HierarchyReader port - Source of project hierarchies.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, ProjectId};
use crate::domain::hierarchy::HierarchyNode;

/// Read-only access to the stored hierarchy of a project.
///
/// Returned nodes are raw records; callers revalidate them with
/// `Hierarchy::from_nodes` before any computation.
#[async_trait]
pub trait HierarchyReader: Send + Sync {
    /// Loads every node of the project, alternatives included.
    ///
    /// # Errors
    ///
    /// - `ProjectNotFound` if the project has no hierarchy
    /// - `DatabaseError` on storage failure
    async fn load(&self, project_id: &ProjectId) -> Result<Vec<HierarchyNode>, DomainError>;
}
