//! CalculateGroupResultHandler - Aggregates every rater's judgments for one node.

use std::collections::HashMap;
use std::sync::Arc;
use tracing::info;

use crate::domain::foundation::{DomainError, NodeId, ProjectId, RaterId};
use crate::domain::group::{AggregationStrategy, GroupAggregator, GroupCalculationResult};
use crate::domain::hierarchy::Hierarchy;
use crate::ports::{EvaluationSessionRepository, HierarchyReader};

use super::collect_judgments;

/// Query for the group result of one comparison group.
#[derive(Debug, Clone)]
pub struct CalculateGroupResultQuery {
    pub project_id: ProjectId,
    pub node_id: NodeId,
    pub strategy: AggregationStrategy,
    /// Optional per-rater weights; absent raters weigh 1.
    pub rater_weights: HashMap<RaterId, f64>,
}

pub struct CalculateGroupResultHandler {
    hierarchy_reader: Arc<dyn HierarchyReader>,
    repository: Arc<dyn EvaluationSessionRepository>,
    aggregator: GroupAggregator,
}

impl CalculateGroupResultHandler {
    pub fn new(
        hierarchy_reader: Arc<dyn HierarchyReader>,
        repository: Arc<dyn EvaluationSessionRepository>,
        aggregator: GroupAggregator,
    ) -> Self {
        Self {
            hierarchy_reader,
            repository,
            aggregator,
        }
    }

    /// # Errors
    ///
    /// - `ProjectNotFound` / `InvalidHierarchy` from loading the hierarchy
    /// - `NodeNotFound` for a node outside the hierarchy
    /// - `InsufficientData` when no completed rater judged the node
    pub async fn handle(&self, query: CalculateGroupResultQuery) -> Result<GroupCalculationResult, DomainError> {
        let hierarchy = Hierarchy::from_nodes(self.hierarchy_reader.load(&query.project_id).await?)?;
        let sessions = self.repository.find_completed_by_project(&query.project_id).await?;

        let judgments = collect_judgments(&hierarchy, &sessions, &query.node_id, &query.rater_weights)?;
        let elements = hierarchy.comparison_group(&query.node_id);
        let result = self.aggregator.aggregate(&elements, &judgments, query.strategy)?;

        info!(
            project_id = %query.project_id,
            node_id = %query.node_id,
            strategy = %query.strategy,
            raters = judgments.len(),
            "Group result calculated"
        );
        Ok(result)
    }
}
