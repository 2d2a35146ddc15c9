//! Weight Propagator - Local to global weights and alternative scores.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

use crate::domain::foundation::NodeId;
use crate::domain::hierarchy::{Hierarchy, HierarchyError};

use super::AnalysisError;

const SUM_TOLERANCE: f64 = 1e-6;

/// Local and global weight of one criteria-tree node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CriterionWeight {
    pub node_id: NodeId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<NodeId>,
    pub level: u32,
    pub local_weight: f64,
    pub global_weight: f64,
    pub is_leaf: bool,
}

/// One term of an alternative's total: leaf global weight × local weight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreContribution {
    pub criterion_id: NodeId,
    pub criterion_weight: f64,
    pub local_weight: f64,
    pub contribution: f64,
}

/// Total score and rank of one alternative.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlternativeScore {
    pub alternative_id: NodeId,
    pub total_score: f64,
    /// 1-based; strict order, ties broken by sibling position.
    pub rank: usize,
    pub breakdown: Vec<ScoreContribution>,
}

/// Frozen outcome of a completed evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlobalWeightResult {
    /// Criteria-tree nodes in breadth-first order, goal first.
    pub criteria: Vec<CriterionWeight>,
    /// Alternatives ordered by rank.
    pub alternatives: Vec<AlternativeScore>,
}

impl GlobalWeightResult {
    pub fn criterion(&self, id: &NodeId) -> Option<&CriterionWeight> {
        self.criteria.iter().find(|c| &c.node_id == id)
    }

    pub fn alternative(&self, id: &NodeId) -> Option<&AlternativeScore> {
        self.alternatives.iter().find(|a| &a.alternative_id == id)
    }

    /// Alternative ids, best first.
    pub fn ranking(&self) -> Vec<&NodeId> {
        self.alternatives.iter().map(|a| &a.alternative_id).collect()
    }

    /// Sum of leaf-criterion global weights (1 when every group was weighted).
    pub fn leaf_weight_sum(&self) -> f64 {
        self.criteria
            .iter()
            .filter(|c| c.is_leaf)
            .map(|c| c.global_weight)
            .sum()
    }
}

/// Combines per-group local weight vectors into global results.
pub struct WeightPropagator;

impl WeightPropagator {
    /// Propagates local weights through the hierarchy.
    ///
    /// `local_weights` maps a node to the weight vector over its comparison
    /// group, in group order.
    ///
    /// # Algorithm
    /// global(node) = Π local weights along the path to the goal;
    /// score(alt) = Σ over leaf criteria of global(leaf) × local(alt | leaf).
    ///
    /// # Edge Cases
    /// - Missing vector: its elements get local weight 0
    /// - Single-element group: its element weighs 1
    /// - No alternatives: empty ranking
    ///
    /// # Errors
    /// Vectors for unknown nodes, of the wrong length, with negative or
    /// non-finite entries, or not summing to 1 ± 1e-6.
    pub fn propagate(
        hierarchy: &Hierarchy,
        local_weights: &HashMap<NodeId, Vec<f64>>,
    ) -> Result<GlobalWeightResult, AnalysisError> {
        for (node_id, vector) in local_weights {
            if !hierarchy.contains(node_id) {
                return Err(AnalysisError::UnknownElement(node_id.clone()));
            }
            let expected = hierarchy.comparison_group(node_id).len();
            Self::check_vector(node_id, vector, expected)?;
        }

        let local_of = |group_owner: &NodeId, element: &NodeId| -> f64 {
            let group = hierarchy.comparison_group(group_owner);
            if group.len() == 1 {
                return 1.0;
            }
            let Some(index) = group.iter().position(|g| g == element) else {
                return 0.0;
            };
            local_weights
                .get(group_owner)
                .and_then(|v| v.get(index).copied())
                .unwrap_or(0.0)
        };

        let mut globals: HashMap<NodeId, f64> = HashMap::new();
        let mut criteria = Vec::new();
        for node in hierarchy.breadth_first() {
            let (local_weight, global_weight) = match &node.parent_id {
                None => (1.0, 1.0),
                Some(parent) => {
                    let local = local_of(parent, &node.id);
                    let parent_global = globals.get(parent).copied().unwrap_or(0.0);
                    (local, parent_global * local)
                }
            };
            globals.insert(node.id.clone(), global_weight);
            criteria.push(CriterionWeight {
                node_id: node.id.clone(),
                parent_id: node.parent_id.clone(),
                level: node.level,
                local_weight,
                global_weight,
                is_leaf: hierarchy.is_leaf_criterion(&node.id),
            });
        }

        let leaves: Vec<&CriterionWeight> = criteria.iter().filter(|c| c.is_leaf).collect();
        let mut alternatives: Vec<AlternativeScore> = hierarchy
            .alternatives()
            .into_iter()
            .map(|alt| {
                let breakdown: Vec<ScoreContribution> = leaves
                    .iter()
                    .map(|leaf| {
                        let local_weight = local_of(&leaf.node_id, &alt.id);
                        ScoreContribution {
                            criterion_id: leaf.node_id.clone(),
                            criterion_weight: leaf.global_weight,
                            local_weight,
                            contribution: leaf.global_weight * local_weight,
                        }
                    })
                    .collect();
                AlternativeScore {
                    alternative_id: alt.id.clone(),
                    total_score: breakdown.iter().map(|c| c.contribution).sum(),
                    rank: 0,
                    breakdown,
                }
            })
            .collect();

        // Stable sort keeps position order among equal scores.
        alternatives.sort_by(|a, b| b.total_score.total_cmp(&a.total_score));
        for (i, alt) in alternatives.iter_mut().enumerate() {
            alt.rank = i + 1;
        }

        debug!(
            criteria = criteria.len(),
            alternatives = alternatives.len(),
            "Weights propagated"
        );

        Ok(GlobalWeightResult {
            criteria,
            alternatives,
        })
    }

    fn check_vector(node_id: &NodeId, vector: &[f64], expected: usize) -> Result<(), AnalysisError> {
        if vector.len() != expected {
            return Err(AnalysisError::WeightVectorLength {
                node: node_id.clone(),
                expected,
                actual: vector.len(),
            });
        }
        if let Some((index, &value)) = vector
            .iter()
            .enumerate()
            .find(|(_, w)| !w.is_finite() || **w < 0.0)
        {
            return Err(AnalysisError::InvalidWeight {
                node: node_id.clone(),
                index,
                value,
            });
        }
        let sum: f64 = vector.iter().sum();
        if (sum - 1.0).abs() > SUM_TOLERANCE {
            return Err(AnalysisError::WeightSumMismatch {
                node: node_id.clone(),
                sum,
            });
        }
        Ok(())
    }
}

impl Hierarchy {
    /// Writes a propagation result into the node arena.
    ///
    /// Criteria get their local and global weights; alternatives get their
    /// total score as global weight.
    pub fn apply_weights(&mut self, result: &GlobalWeightResult) -> Result<(), HierarchyError> {
        for criterion in &result.criteria {
            self.set_weights(
                &criterion.node_id,
                Some(criterion.local_weight),
                Some(criterion.global_weight),
            )?;
        }
        for alternative in &result.alternatives {
            self.set_weights(
                &alternative.alternative_id,
                None,
                Some(alternative.total_score),
            )?;
        }
        Ok(())
    }
}
