//! Group calculation result types.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::analysis::{ComparisonMatrix, ConsistencyResult};
use crate::domain::foundation::{NodeId, RaterId};

use super::ConsensusMetrics;

/// How individual judgments are combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AggregationStrategy {
    /// Aggregation of individual judgments: geometric mean per cell.
    #[default]
    Aij,
    /// Aggregation of individual priorities.
    Aip,
}

impl fmt::Display for AggregationStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AggregationStrategy::Aij => write!(f, "AIJ"),
            AggregationStrategy::Aip => write!(f, "AIP"),
        }
    }
}

/// Strategy-specific payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AggregatedOutcome {
    /// AIJ: the group matrix and its own consistency check.
    Matrix {
        matrix: ComparisonMatrix,
        consistency: ConsistencyResult,
    },
    /// AIP: both the plain and the consistency-weighted mean priorities.
    Priorities {
        arithmetic_mean: Vec<f64>,
        quality_weighted: Vec<f64>,
    },
}

/// One rater's share in the group result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RaterContribution {
    pub rater_id: RaterId,
    /// Normalised base weight.
    pub weight: f64,
    /// Weight actually applied; differs from `weight` only under AIP quality weighting.
    pub effective_weight: f64,
    pub consistency_ratio: f64,
    pub is_consistent: bool,
    pub priorities: Vec<f64>,
}

/// Full outcome of aggregating one comparison group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupCalculationResult {
    pub strategy: AggregationStrategy,
    pub elements: Vec<NodeId>,
    pub outcome: AggregatedOutcome,
    /// AIJ: group matrix priorities. AIP: quality-weighted priorities.
    pub group_priorities: Vec<f64>,
    pub contributions: Vec<RaterContribution>,
    pub consensus: ConsensusMetrics,
}

impl GroupCalculationResult {
    /// Group priority of one element.
    pub fn priority_of(&self, element: &NodeId) -> Option<f64> {
        let index = self.elements.iter().position(|e| e == element)?;
        self.group_priorities.get(index).copied()
    }

    pub fn contribution_of(&self, rater: &RaterId) -> Option<&RaterContribution> {
        self.contributions.iter().find(|c| &c.rater_id == rater)
    }
}
