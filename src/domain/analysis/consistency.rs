//! Consistency Validator - CI/CR computation and adjustment suggestions.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::foundation::NodeId;

use super::saaty_scale::{random_index, snap_to_scale};
use super::{AnalysisError, BuiltMatrix, ComparisonMatrix, EigenSolver};

/// Pass threshold and suggestion budget.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConsistencyConfig {
    pub threshold: f64,
    pub max_suggestions: usize,
}

impl Default for ConsistencyConfig {
    fn default() -> Self {
        Self {
            threshold: 0.10,
            max_suggestions: 3,
        }
    }
}

/// A judgment worth revisiting, with the value that would fit the
/// current priorities best.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdjustmentSuggestion {
    pub row: usize,
    pub col: usize,
    pub current_value: f64,
    pub suggested_value: f64,
    /// |ln a_ij − ln(w_i / w_j)|
    pub deviation: f64,
    /// Estimated correction effect, in [0, 1].
    pub impact: f64,
}

/// Outcome of a consistency check. A failing check is data, not an error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsistencyResult {
    /// Ids of the matrix rows, empty when validated without a group.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub elements: Vec<NodeId>,
    pub weights: Vec<f64>,
    pub lambda_max: f64,
    pub consistency_index: f64,
    pub random_index: f64,
    pub consistency_ratio: f64,
    pub is_consistent: bool,
    pub iterations: u32,
    pub converged: bool,
    pub residual: f64,
    #[serde(default)]
    pub suggestions: Vec<AdjustmentSuggestion>,
}

impl ConsistencyResult {
    /// Returns the ids a suggestion refers to, when elements are known.
    pub fn suggestion_pair(&self, suggestion: &AdjustmentSuggestion) -> Option<(&NodeId, &NodeId)> {
        Some((
            self.elements.get(suggestion.row)?,
            self.elements.get(suggestion.col)?,
        ))
    }
}

/// Solves a matrix and judges its consistency.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsistencyValidator {
    solver: EigenSolver,
    config: ConsistencyConfig,
}

impl ConsistencyValidator {
    pub fn new(solver: EigenSolver, config: ConsistencyConfig) -> Self {
        Self { solver, config }
    }

    pub fn solver(&self) -> &EigenSolver {
        &self.solver
    }

    pub fn config(&self) -> &ConsistencyConfig {
        &self.config
    }

    /// Solves `matrix` and computes CI, RI and CR.
    ///
    /// # Edge Cases
    /// - n ≤ 2: RI is 0, so CR is 0 and the check passes
    /// - λmax slightly below n from rounding: CI clamps to 0
    /// - CR above threshold: `is_consistent = false` plus up to
    ///   `max_suggestions` adjustment suggestions
    pub fn validate(&self, matrix: &ComparisonMatrix) -> Result<ConsistencyResult, AnalysisError> {
        let n = matrix.size();
        let eigen = self.solver.solve(matrix)?;
        let consistency_index = Self::consistency_index(eigen.eigenvalue, n);
        let random_index = random_index(n);
        let consistency_ratio = Self::consistency_ratio(consistency_index, n);
        let is_consistent = consistency_ratio <= self.config.threshold;

        let suggestions = if is_consistent {
            Vec::new()
        } else {
            Self::suggest_adjustments(matrix, &eigen.weights, self.config.max_suggestions)
        };

        debug!(
            size = n,
            lambda_max = eigen.eigenvalue,
            consistency_ratio,
            is_consistent,
            "Consistency checked"
        );

        Ok(ConsistencyResult {
            elements: Vec::new(),
            weights: eigen.weights,
            lambda_max: eigen.eigenvalue,
            consistency_index,
            random_index,
            consistency_ratio,
            is_consistent,
            iterations: eigen.iterations,
            converged: eigen.converged,
            residual: eigen.residual,
            suggestions,
        })
    }

    /// Validates a built group matrix and tags the result with its element ids.
    pub fn validate_group(&self, built: &BuiltMatrix) -> Result<ConsistencyResult, AnalysisError> {
        let mut result = self.validate(&built.matrix)?;
        result.elements = built.elements.clone();
        Ok(result)
    }

    /// CI = (λmax − n) / (n − 1), never negative.
    pub fn consistency_index(lambda_max: f64, n: usize) -> f64 {
        if n < 2 {
            return 0.0;
        }
        ((lambda_max - n as f64) / (n as f64 - 1.0)).max(0.0)
    }

    /// CR = CI / RI(n), or 0 when RI is 0.
    pub fn consistency_ratio(consistency_index: f64, n: usize) -> f64 {
        let ri = random_index(n);
        if ri == 0.0 {
            0.0
        } else {
            consistency_index / ri
        }
    }

    /// Ranks the upper-triangle judgments by how far they stray from the
    /// ratio implied by `weights`, keeping the `limit` worst.
    pub fn suggest_adjustments(
        matrix: &ComparisonMatrix,
        weights: &[f64],
        limit: usize,
    ) -> Vec<AdjustmentSuggestion> {
        let n = matrix.size().min(weights.len());
        let mut suggestions = Vec::with_capacity(n * n.saturating_sub(1) / 2);

        for i in 0..n {
            for j in (i + 1)..n {
                if weights[i] <= 0.0 || weights[j] <= 0.0 {
                    continue;
                }
                let current_value = matrix.get(i, j);
                let expected = weights[i] / weights[j];
                let deviation = (current_value.ln() - expected.ln()).abs();
                let suggested_value = snap_to_scale(expected);
                let impact = (current_value / suggested_value).ln().abs().clamp(0.0, 1.0);
                suggestions.push(AdjustmentSuggestion {
                    row: i,
                    col: j,
                    current_value,
                    suggested_value,
                    deviation,
                    impact,
                });
            }
        }

        suggestions.sort_by(|a, b| b.deviation.total_cmp(&a.deviation));
        suggestions.truncate(limit);
        suggestions
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::analysis::saaty_scale::{is_on_scale, SAATY_SCALE};
    use proptest::prelude::*;

    fn matrix(rows: Vec<Vec<f64>>) -> ComparisonMatrix {
        ComparisonMatrix::from_rows(rows).unwrap()
    }

    fn strongly_inconsistent() -> ComparisonMatrix {
        matrix(vec![
            vec![1.0, 9.0, 9.0],
            vec![1.0 / 9.0, 1.0, 9.0],
            vec![1.0 / 9.0, 1.0 / 9.0, 1.0],
        ])
    }

    // ───────────────────────────────────────────────────────────────
    // Passing checks
    // ───────────────────────────────────────────────────────────────

    #[test]
    fn saaty_fixture_is_consistent() {
        let m = matrix(vec![
            vec![1.0, 3.0, 5.0],
            vec![1.0 / 3.0, 1.0, 2.0],
            vec![1.0 / 5.0, 1.0 / 2.0, 1.0],
        ]);
        let result = ConsistencyValidator::default().validate(&m).unwrap();

        assert!(result.is_consistent);
        assert!(result.consistency_ratio < 0.01, "CR was {}", result.consistency_ratio);
        assert_eq!(result.random_index, 0.58);
        assert!(result.suggestions.is_empty());
    }

    #[test]
    fn neutral_matrix_has_zero_ratio() {
        let result = ConsistencyValidator::default()
            .validate(&ComparisonMatrix::neutral(4))
            .unwrap();
        assert_eq!(result.consistency_index, 0.0);
        assert_eq!(result.consistency_ratio, 0.0);
        assert!(result.is_consistent);
    }

    #[test]
    fn pairs_are_always_consistent() {
        let m = matrix(vec![vec![1.0, 9.0], vec![1.0 / 9.0, 1.0]]);
        let result = ConsistencyValidator::default().validate(&m).unwrap();
        assert_eq!(result.consistency_ratio, 0.0);
        assert!(result.is_consistent);
    }

    #[test]
    fn index_is_clamped_at_zero() {
        assert_eq!(ConsistencyValidator::consistency_index(2.9999999, 3), 0.0);
        assert_eq!(ConsistencyValidator::consistency_ratio(0.058, 3), 0.058 / 0.58);
    }

    // ───────────────────────────────────────────────────────────────
    // Failing checks
    // ───────────────────────────────────────────────────────────────

    #[test]
    fn strongly_inconsistent_matrix_fails_with_suggestions() {
        let result = ConsistencyValidator::default()
            .validate(&strongly_inconsistent())
            .unwrap();

        assert!(!result.is_consistent);
        assert!((result.consistency_ratio - 0.483).abs() < 0.01);
        assert_eq!(result.suggestions.len(), 3);
        for pair in result.suggestions.windows(2) {
            assert!(pair[0].deviation >= pair[1].deviation);
        }
        for s in &result.suggestions {
            assert!(is_on_scale(s.suggested_value));
            assert!((0.0..=1.0).contains(&s.impact));
        }
    }

    #[test]
    fn suggestion_snaps_expected_ratio_to_scale() {
        let result = ConsistencyValidator::default()
            .validate(&strongly_inconsistent())
            .unwrap();
        let first_pair = result
            .suggestions
            .iter()
            .find(|s| s.row == 0 && s.col == 1)
            .unwrap();

        // w0 / w1 ≈ 4.33 lies closest to 4 in log space
        assert_eq!(first_pair.suggested_value, 4.0);
        assert!((first_pair.impact - (9.0f64 / 4.0).ln()).abs() < 1e-9);
    }

    #[test]
    fn suggestion_count_follows_config() {
        let validator = ConsistencyValidator::new(
            EigenSolver::default(),
            ConsistencyConfig {
                threshold: 0.10,
                max_suggestions: 1,
            },
        );
        let result = validator.validate(&strongly_inconsistent()).unwrap();
        assert_eq!(result.suggestions.len(), 1);
    }

    #[test]
    fn four_by_four_reference_matrix_fails() {
        let m = matrix(vec![
            vec![1.0, 5.0, 1.0 / 3.0, 1.0],
            vec![1.0 / 5.0, 1.0, 1.0 / 7.0, 3.0],
            vec![3.0, 7.0, 1.0, 5.0],
            vec![1.0, 1.0 / 3.0, 1.0 / 5.0, 1.0],
        ]);
        let result = ConsistencyValidator::default().validate(&m).unwrap();
        assert!(!result.is_consistent);
        assert!((result.consistency_ratio - 0.265).abs() < 0.01);
    }

    #[test]
    fn group_validation_carries_element_ids() {
        use crate::domain::analysis::{ComparisonSet, MatrixBuilder, PairwiseComparison};

        let id = |s: &str| NodeId::new(s).unwrap();
        let elements = vec![id("x"), id("y"), id("z")];
        let set: ComparisonSet = vec![
            PairwiseComparison::new(id("x"), id("y"), 9.0).unwrap(),
            PairwiseComparison::new(id("x"), id("z"), 9.0).unwrap(),
            PairwiseComparison::new(id("y"), id("z"), 9.0).unwrap(),
        ]
        .into_iter()
        .collect();
        let built = MatrixBuilder::build(&elements, &set).unwrap();
        let result = ConsistencyValidator::default().validate_group(&built).unwrap();

        let pair = result.suggestion_pair(&result.suggestions[0]).unwrap();
        assert!(elements.contains(pair.0) && elements.contains(pair.1));
    }

    // ───────────────────────────────────────────────────────────────
    // Properties
    // ───────────────────────────────────────────────────────────────

    fn scale_matrix(n: usize, picks: &[usize]) -> ComparisonMatrix {
        let mut k = 0;
        ComparisonMatrix::from_upper(n, |_, _| {
            let value = SAATY_SCALE[picks[k] % SAATY_SCALE.len()];
            k += 1;
            value
        })
    }

    proptest! {
        #[test]
        fn ratio_is_invariant_under_permutation(
            picks in prop::collection::vec(0usize..17, 6),
            order in Just(vec![0usize, 1, 2, 3]).prop_shuffle()
        ) {
            let m = scale_matrix(4, &picks);
            let validator = ConsistencyValidator::default();
            let original = validator.validate(&m).unwrap();
            let permuted = validator.validate(&m.permuted(&order)).unwrap();

            prop_assert!(
                (original.consistency_ratio - permuted.consistency_ratio).abs() < 1e-6,
                "{} vs {}", original.consistency_ratio, permuted.consistency_ratio
            );
        }

        #[test]
        fn consistent_matrices_have_near_zero_ratio(
            raw in prop::collection::vec(0.2f64..5.0, 3..8)
        ) {
            let m = ComparisonMatrix::from_ratios(&raw).unwrap();
            let result = ConsistencyValidator::default().validate(&m).unwrap();
            prop_assert!(result.consistency_ratio < 1e-6);
            prop_assert!(result.is_consistent);
        }
    }
}
