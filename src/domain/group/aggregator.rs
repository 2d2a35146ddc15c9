//! Group Aggregator - AIJ and AIP aggregation of several raters.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::debug;

use crate::domain::analysis::{
    normalize, AnalysisError, ComparisonMatrix, ConsistencyResult, ConsistencyValidator,
};
use crate::domain::foundation::{NodeId, RaterId};

use super::{
    AggregatedOutcome, AggregationStrategy, ConsensusAnalyzer, ConsensusMetrics,
    GroupCalculationResult, GroupError, RaterContribution,
};

/// CR at which an AIP rater's quality factor bottoms out at 0.5.
const QUALITY_REFERENCE_RATIO: f64 = 0.1;

/// Thresholds for consensus analysis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GroupConfig {
    pub disagreement_threshold: f64,
    pub discussion_threshold: f64,
    pub rescoping_threshold: f64,
    pub max_disagreements: usize,
}

impl Default for GroupConfig {
    fn default() -> Self {
        Self {
            disagreement_threshold: 0.5,
            discussion_threshold: 0.75,
            rescoping_threshold: 1.0,
            max_disagreements: 10,
        }
    }
}

/// One rater's completed matrix for a comparison group.
#[derive(Debug, Clone, PartialEq)]
pub struct RaterJudgment {
    pub rater_id: RaterId,
    pub matrix: ComparisonMatrix,
    pub weight: f64,
}

impl RaterJudgment {
    /// Creates a judgment with the default weight 1.
    pub fn new(rater_id: RaterId, matrix: ComparisonMatrix) -> Self {
        Self {
            rater_id,
            matrix,
            weight: 1.0,
        }
    }

    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = weight;
        self
    }
}

/// Combines the matrices of several raters for one comparison group.
#[derive(Debug, Clone, Copy, Default)]
pub struct GroupAggregator {
    validator: ConsistencyValidator,
    config: GroupConfig,
}

impl GroupAggregator {
    pub fn new(validator: ConsistencyValidator, config: GroupConfig) -> Self {
        Self { validator, config }
    }

    /// Aggregates `judgments` over `elements` with the given strategy.
    ///
    /// Consensus metrics are always computed from the per-rater priority
    /// vectors, whichever strategy is chosen.
    ///
    /// # Errors
    /// - `NoRaters` for an empty judgment list
    /// - `DuplicateRater` if a rater appears twice
    /// - `SizeMismatch` if a matrix does not match the element count
    /// - `InvalidRaterWeight` for zero, negative or non-finite weights
    pub fn aggregate(
        &self,
        elements: &[NodeId],
        judgments: &[RaterJudgment],
        strategy: AggregationStrategy,
    ) -> Result<GroupCalculationResult, GroupError> {
        let weights = self.check_inputs(elements, judgments)?;
        let n = elements.len();

        let individual: Vec<ConsistencyResult> = judgments
            .iter()
            .map(|j| self.validator.validate(&j.matrix))
            .collect::<Result<_, _>>()?;

        let geometric = Self::geometric_mean_matrix(n, judgments, &weights);

        let (outcome, group_priorities, effective_weights) = match strategy {
            AggregationStrategy::Aij => {
                let consistency = self.validator.validate(&geometric)?;
                let priorities = consistency.weights.clone();
                (
                    AggregatedOutcome::Matrix {
                        matrix: geometric.clone(),
                        consistency,
                    },
                    priorities,
                    weights.clone(),
                )
            }
            AggregationStrategy::Aip => {
                let arithmetic_mean = Self::weighted_mean(n, &individual, &weights)?;
                let quality: Vec<f64> = individual
                    .iter()
                    .zip(&weights)
                    .map(|(r, w)| w * Self::quality_factor(r.consistency_ratio))
                    .collect();
                let quality = normalize(quality)?;
                let quality_weighted = Self::weighted_mean(n, &individual, &quality)?;
                (
                    AggregatedOutcome::Priorities {
                        arithmetic_mean,
                        quality_weighted: quality_weighted.clone(),
                    },
                    quality_weighted,
                    quality,
                )
            }
        };

        let priority_vectors: Vec<Vec<f64>> = individual.iter().map(|r| r.weights.clone()).collect();
        let (consensus_index, shannon_entropy) =
            ConsensusAnalyzer::consensus_index(&priority_vectors, &weights);
        let matrices: Vec<&ComparisonMatrix> = judgments.iter().map(|j| &j.matrix).collect();
        let raters: Vec<(&RaterId, &ComparisonMatrix)> =
            judgments.iter().map(|j| (&j.rater_id, &j.matrix)).collect();

        let consensus = ConsensusMetrics {
            consensus_index,
            kendall_w: ConsensusAnalyzer::kendall_w(&priority_vectors),
            shannon_entropy,
            distance_matrix: ConsensusAnalyzer::distance_matrix(&matrices),
            disagreements: ConsensusAnalyzer::disagreements(
                elements,
                &raters,
                &geometric,
                &group_priorities,
                &self.config,
            ),
        };

        let contributions = judgments
            .iter()
            .zip(individual)
            .zip(weights.iter().zip(&effective_weights))
            .map(|((judgment, result), (&weight, &effective_weight))| RaterContribution {
                rater_id: judgment.rater_id.clone(),
                weight,
                effective_weight,
                consistency_ratio: result.consistency_ratio,
                is_consistent: result.is_consistent,
                priorities: result.weights,
            })
            .collect();

        debug!(
            strategy = %strategy,
            raters = judgments.len(),
            elements = n,
            consensus_index = consensus.consensus_index,
            kendall_w = consensus.kendall_w,
            "Group aggregated"
        );

        Ok(GroupCalculationResult {
            strategy,
            elements: elements.to_vec(),
            outcome,
            group_priorities,
            contributions,
            consensus,
        })
    }

    /// Quality factor for AIP: 1 at CR 0, falling linearly to 0.5 at CR 0.1.
    pub fn quality_factor(consistency_ratio: f64) -> f64 {
        0.5 + 0.5 * (1.0 - consistency_ratio / QUALITY_REFERENCE_RATIO).max(0.0)
    }

    /// Validates inputs and returns the normalised rater weights.
    fn check_inputs(&self, elements: &[NodeId], judgments: &[RaterJudgment]) -> Result<Vec<f64>, GroupError> {
        if judgments.is_empty() {
            return Err(GroupError::NoRaters);
        }
        if elements.len() < 2 {
            return Err(AnalysisError::InsufficientElements {
                actual: elements.len(),
            }
            .into());
        }

        let mut seen = HashSet::new();
        for judgment in judgments {
            if !seen.insert(&judgment.rater_id) {
                return Err(GroupError::DuplicateRater(judgment.rater_id.clone()));
            }
            if judgment.matrix.size() != elements.len() {
                return Err(GroupError::SizeMismatch {
                    rater: judgment.rater_id.clone(),
                    expected: elements.len(),
                    actual: judgment.matrix.size(),
                });
            }
            if !judgment.weight.is_finite() || judgment.weight <= 0.0 {
                return Err(GroupError::InvalidRaterWeight {
                    rater: judgment.rater_id.clone(),
                    weight: judgment.weight,
                });
            }
        }

        Ok(normalize(judgments.iter().map(|j| j.weight).collect())?)
    }

    /// Weighted geometric mean per off-diagonal cell, reciprocals mirrored.
    fn geometric_mean_matrix(n: usize, judgments: &[RaterJudgment], weights: &[f64]) -> ComparisonMatrix {
        ComparisonMatrix::from_upper(n, |i, j| {
            judgments
                .iter()
                .zip(weights)
                .map(|(judgment, w)| w * judgment.matrix.get(i, j).ln())
                .sum::<f64>()
                .exp()
        })
    }

    fn weighted_mean(n: usize, results: &[ConsistencyResult], weights: &[f64]) -> Result<Vec<f64>, GroupError> {
        let mut mean = vec![0.0; n];
        for (result, w) in results.iter().zip(weights) {
            for (slot, p) in mean.iter_mut().zip(&result.weights) {
                *slot += w * p;
            }
        }
        Ok(normalize(mean)?)
    }
}
