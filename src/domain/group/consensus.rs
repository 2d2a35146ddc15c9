//! Consensus Analyzer - Agreement metrics across raters.
//!
//! All metrics read the per-rater priority vectors or matrices of a single
//! comparison group; none of them change the aggregated result.

use serde::{Deserialize, Serialize};

use crate::domain::analysis::{snap_to_scale, ComparisonMatrix};
use crate::domain::foundation::{NodeId, RaterId};

use super::GroupConfig;

/// What a facilitator should do about a disagreement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ResolutionHint {
    /// Close enough to adopt the group's geometric mean, snapped to the scale.
    SuggestGeometricMean { value: f64 },
    NeedsDiscussion,
    /// The raters likely read the criteria differently.
    NeedsRescoping,
}

/// One rater's judgment that strays far from the group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Disagreement {
    pub rater_id: RaterId,
    pub row: NodeId,
    pub col: NodeId,
    pub rater_value: f64,
    pub group_value: f64,
    /// |ln a_ij − ln g_ij| / ln 9
    pub deviation: f64,
    pub impact: f64,
    pub hint: ResolutionHint,
}

/// Consensus metrics for one comparison group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsensusMetrics {
    /// Mean of (1 − normalised entropy) over elements, in [0, 1].
    pub consensus_index: f64,
    pub kendall_w: f64,
    /// Mean normalised relative entropy of the rater split, over elements.
    pub shannon_entropy: f64,
    /// Rater × rater mean log distance, symmetric with zero diagonal.
    pub distance_matrix: Vec<Vec<f64>>,
    pub disagreements: Vec<Disagreement>,
}

/// Agreement metrics.
pub struct ConsensusAnalyzer;

impl ConsensusAnalyzer {
    /// Returns (consensus index, mean normalised entropy).
    ///
    /// Each element's priority mass is split across raters in proportion to
    /// `w_k · p_k`. Under full agreement that split equals the rater weights.
    /// The entropy of an element is the relative entropy of the split against
    /// the rater weights, normalised by `ln(1 / w_min)` so that all mass on
    /// the lightest rater scores 1.
    ///
    /// # Edge Cases
    /// - No elements or no raters: (1, 0)
    /// - Single rater: entropy 0, consensus 1
    /// - An element every rater scores 0 counts as agreement
    pub fn consensus_index(priorities: &[Vec<f64>], rater_weights: &[f64]) -> (f64, f64) {
        let raters = priorities.len();
        let elements = priorities.first().map(Vec::len).unwrap_or(0);
        if raters == 0 || elements == 0 {
            return (1.0, 0.0);
        }

        let total_weight: f64 = rater_weights.iter().take(raters).sum();
        let weights: Vec<f64> = if total_weight > 0.0 && rater_weights.len() >= raters {
            rater_weights[..raters].iter().map(|w| w / total_weight).collect()
        } else {
            vec![1.0 / raters as f64; raters]
        };
        let lightest = weights.iter().copied().fold(f64::INFINITY, f64::min);
        let max_divergence = (1.0 / lightest).ln();

        let mut entropy_sum = 0.0;
        for e in 0..elements {
            let masses: Vec<f64> = priorities
                .iter()
                .zip(&weights)
                .map(|(vector, w)| w * vector.get(e).copied().unwrap_or(0.0).max(0.0))
                .collect();
            let total: f64 = masses.iter().sum();
            if total <= 0.0 || max_divergence <= 0.0 {
                continue;
            }
            let divergence: f64 = masses
                .iter()
                .zip(&weights)
                .filter(|(m, _)| **m > 0.0)
                .map(|(m, w)| {
                    let share = m / total;
                    share * (share / w).ln()
                })
                .sum();
            entropy_sum += (divergence / max_divergence).clamp(0.0, 1.0);
        }

        let mean_entropy = entropy_sum / elements as f64;
        (1.0 - mean_entropy, mean_entropy)
    }

    /// Ranks a priority vector, 1 for the largest; ties share the average rank.
    pub fn rank_vector(priorities: &[f64]) -> Vec<f64> {
        let mut order: Vec<usize> = (0..priorities.len()).collect();
        order.sort_by(|&a, &b| priorities[b].total_cmp(&priorities[a]));

        let mut ranks = vec![0.0; priorities.len()];
        let mut start = 0;
        while start < order.len() {
            let mut end = start + 1;
            while end < order.len() && priorities[order[end]] == priorities[order[start]] {
                end += 1;
            }
            // positions start..end hold ranks start+1 ..= end
            let average = (start + 1 + end) as f64 / 2.0;
            for &index in &order[start..end] {
                ranks[index] = average;
            }
            start = end;
        }
        ranks
    }

    /// Kendall's coefficient of concordance with tie correction, in [0, 1].
    ///
    /// # Edge Cases
    /// - Fewer than 2 raters or elements: 1
    /// - Every rater ties every element: 1
    pub fn kendall_w(priorities: &[Vec<f64>]) -> f64 {
        let m = priorities.len();
        let n = priorities.first().map(Vec::len).unwrap_or(0);
        if m < 2 || n < 2 {
            return 1.0;
        }

        let rankings: Vec<Vec<f64>> = priorities.iter().map(|p| Self::rank_vector(p)).collect();
        let mut rank_sums = vec![0.0; n];
        for ranking in &rankings {
            for (i, r) in ranking.iter().enumerate().take(n) {
                rank_sums[i] += r;
            }
        }

        let (mf, nf) = (m as f64, n as f64);
        let mean = mf * (nf + 1.0) / 2.0;
        let s: f64 = rank_sums.iter().map(|r| (r - mean).powi(2)).sum();
        let ties: f64 = rankings.iter().map(|r| Self::tie_term(r)).sum();
        let denominator = mf * mf * (nf.powi(3) - nf) - mf * ties;
        if denominator <= 0.0 {
            return 1.0;
        }
        (12.0 * s / denominator).clamp(0.0, 1.0)
    }

    /// Σ (t³ − t) over groups of tied ranks.
    fn tie_term(ranks: &[f64]) -> f64 {
        let mut sorted = ranks.to_vec();
        sorted.sort_by(f64::total_cmp);
        let mut total = 0.0;
        let mut start = 0;
        while start < sorted.len() {
            let mut end = start + 1;
            while end < sorted.len() && sorted[end] == sorted[start] {
                end += 1;
            }
            let t = (end - start) as f64;
            total += t.powi(3) - t;
            start = end;
        }
        total
    }

    /// Mean |ln a_ij − ln b_ij| over the upper triangle for every rater pair.
    pub fn distance_matrix(matrices: &[&ComparisonMatrix]) -> Vec<Vec<f64>> {
        let m = matrices.len();
        let mut distances = vec![vec![0.0; m]; m];
        for k in 0..m {
            for l in (k + 1)..m {
                let d = Self::log_distance(matrices[k], matrices[l]);
                distances[k][l] = d;
                distances[l][k] = d;
            }
        }
        distances
    }

    fn log_distance(a: &ComparisonMatrix, b: &ComparisonMatrix) -> f64 {
        let n = a.size().min(b.size());
        let mut total = 0.0;
        let mut cells = 0;
        for i in 0..n {
            for j in (i + 1)..n {
                total += (a.get(i, j).ln() - b.get(i, j).ln()).abs();
                cells += 1;
            }
        }
        if cells == 0 {
            0.0
        } else {
            total / cells as f64
        }
    }

    /// Finds the judgments furthest from the group geometric mean.
    ///
    /// A cell is flagged when its normalised log deviation exceeds
    /// `config.disagreement_threshold`. Results are ordered by impact,
    /// deviation × (p_i + p_j) of the group priorities, and capped at
    /// `config.max_disagreements`.
    pub fn disagreements(
        elements: &[NodeId],
        raters: &[(&RaterId, &ComparisonMatrix)],
        group_matrix: &ComparisonMatrix,
        group_priorities: &[f64],
        config: &GroupConfig,
    ) -> Vec<Disagreement> {
        let scale_span = 9f64.ln();
        let n = elements.len().min(group_matrix.size());
        let mut found = Vec::new();

        for (rater_id, matrix) in raters {
            for i in 0..n.min(matrix.size()) {
                for j in (i + 1)..n.min(matrix.size()) {
                    let rater_value = matrix.get(i, j);
                    let group_value = group_matrix.get(i, j);
                    let deviation = (rater_value.ln() - group_value.ln()).abs() / scale_span;
                    if deviation <= config.disagreement_threshold {
                        continue;
                    }
                    let weight = group_priorities.get(i).copied().unwrap_or(0.0)
                        + group_priorities.get(j).copied().unwrap_or(0.0);
                    let hint = if deviation < config.discussion_threshold {
                        ResolutionHint::SuggestGeometricMean {
                            value: snap_to_scale(group_value),
                        }
                    } else if deviation < config.rescoping_threshold {
                        ResolutionHint::NeedsDiscussion
                    } else {
                        ResolutionHint::NeedsRescoping
                    };
                    found.push(Disagreement {
                        rater_id: (*rater_id).clone(),
                        row: elements[i].clone(),
                        col: elements[j].clone(),
                        rater_value,
                        group_value,
                        deviation,
                        impact: deviation * weight,
                        hint,
                    });
                }
            }
        }

        found.sort_by(|a, b| b.impact.total_cmp(&a.impact));
        found.truncate(config.max_disagreements);
        found
    }
}
