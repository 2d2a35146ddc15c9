//! CalculateGroupRankingHandler - Group-level ranking of the alternatives.
//!
//! Aggregates every evaluable node across raters, then propagates the group
//! priorities through the hierarchy exactly as a single rater's local
//! weights would be.

use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tracing::info;

use crate::domain::analysis::{GlobalWeightResult, WeightPropagator};
use crate::domain::foundation::{DomainError, NodeId, ProjectId, RaterId};
use crate::domain::group::{AggregationStrategy, GroupAggregator, GroupCalculationResult};
use crate::domain::hierarchy::Hierarchy;
use crate::ports::{EvaluationSessionRepository, HierarchyReader};

use super::collect_judgments;

#[derive(Debug, Clone)]
pub struct CalculateGroupRankingQuery {
    pub project_id: ProjectId,
    pub strategy: AggregationStrategy,
    pub rater_weights: HashMap<RaterId, f64>,
}

/// Per-node group results and the propagated ranking.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupRankingResult {
    pub strategy: AggregationStrategy,
    pub nodes: BTreeMap<NodeId, GroupCalculationResult>,
    pub ranking: GlobalWeightResult,
}

pub struct CalculateGroupRankingHandler {
    hierarchy_reader: Arc<dyn HierarchyReader>,
    repository: Arc<dyn EvaluationSessionRepository>,
    aggregator: GroupAggregator,
}

impl CalculateGroupRankingHandler {
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

    pub async fn handle(&self, query: CalculateGroupRankingQuery) -> Result<GroupRankingResult, DomainError> {
        let hierarchy = Hierarchy::from_nodes(self.hierarchy_reader.load(&query.project_id).await?)?;
        let sessions = self.repository.find_completed_by_project(&query.project_id).await?;

        let mut nodes = BTreeMap::new();
        let mut local_weights = HashMap::new();
        for node_id in hierarchy.evaluable_nodes() {
            let judgments = collect_judgments(&hierarchy, &sessions, &node_id, &query.rater_weights)?;
            let elements = hierarchy.comparison_group(&node_id);
            let result = self.aggregator.aggregate(&elements, &judgments, query.strategy)?;
            local_weights.insert(node_id.clone(), result.group_priorities.clone());
            nodes.insert(node_id, result);
        }

        let ranking = WeightPropagator::propagate(&hierarchy, &local_weights)?;

        info!(
            project_id = %query.project_id,
            strategy = %query.strategy,
            raters = sessions.len(),
            nodes = nodes.len(),
            "Group ranking calculated"
        );

        Ok(GroupRankingResult {
            strategy: query.strategy,
            nodes,
            ranking,
        })
    }
}
