//! ComparisonMatrix and MatrixBuilder.
//!
//! A matrix is built fresh for every evaluation step from the group's
//! judgments; it is never persisted on its own.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::NodeId;
use crate::domain::hierarchy::pair_count;

use super::{AnalysisError, ComparisonSet};

const RECIPROCAL_TOLERANCE: f64 = 1e-6;

/// Square positive reciprocal matrix over one sibling group.
///
/// # Invariants
///
/// - `values[i][i] == 1`
/// - `values[j][i] == 1 / values[i][j]`
/// - every entry is finite and positive
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonMatrix {
    values: Vec<Vec<f64>>,
}

impl ComparisonMatrix {
    /// Creates the all-neutral matrix of size `n`.
    pub fn neutral(n: usize) -> Self {
        Self {
            values: vec![vec![1.0; n]; n],
        }
    }

    /// Builds a matrix from full rows, checking the reciprocal invariants.
    pub fn from_rows(values: Vec<Vec<f64>>) -> Result<Self, AnalysisError> {
        let n = values.len();
        for (i, row) in values.iter().enumerate() {
            if row.len() != n {
                return Err(AnalysisError::NotSquare {
                    row: i,
                    len: row.len(),
                    expected: n,
                });
            }
        }
        for i in 0..n {
            for j in 0..n {
                let value = values[i][j];
                let reciprocal_ok = (value * values[j][i] - 1.0).abs() <= RECIPROCAL_TOLERANCE;
                let diagonal_ok = i != j || (value - 1.0).abs() <= RECIPROCAL_TOLERANCE;
                if !value.is_finite() || value <= 0.0 || !reciprocal_ok || !diagonal_ok {
                    return Err(AnalysisError::NotReciprocal {
                        row: i,
                        col: j,
                        value,
                    });
                }
            }
        }
        Ok(Self { values })
    }

    /// Builds the perfectly consistent matrix `m[i][j] = w[i] / w[j]`.
    pub fn from_ratios(weights: &[f64]) -> Result<Self, AnalysisError> {
        if let Some((index, &value)) = weights
            .iter()
            .enumerate()
            .find(|(_, w)| !w.is_finite() || **w <= 0.0)
        {
            return Err(AnalysisError::NotReciprocal {
                row: index,
                col: index,
                value,
            });
        }
        let values = weights
            .iter()
            .map(|wi| weights.iter().map(|wj| wi / wj).collect())
            .collect();
        Ok(Self { values })
    }

    /// Builds a matrix from upper-triangle cells, mirroring reciprocals.
    ///
    /// Used by aggregation, whose cell values are already positive.
    pub(crate) fn from_upper(n: usize, mut cell: impl FnMut(usize, usize) -> f64) -> Self {
        let mut values = vec![vec![1.0; n]; n];
        for i in 0..n {
            for j in (i + 1)..n {
                let value = cell(i, j);
                values[i][j] = value;
                values[j][i] = 1.0 / value;
            }
        }
        Self { values }
    }

    /// Returns the matrix dimension.
    pub fn size(&self) -> usize {
        self.values.len()
    }

    /// Returns entry (i, j).
    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.values[i][j]
    }

    /// Returns the rows.
    pub fn rows(&self) -> &[Vec<f64>] {
        &self.values
    }

    /// Multiplies the matrix by a column vector.
    pub fn multiply(&self, vector: &[f64]) -> Vec<f64> {
        self.values
            .iter()
            .map(|row| row.iter().zip(vector).map(|(a, v)| a * v).sum())
            .collect()
    }

    /// Returns the matrix with rows and columns reordered: entry (i, j) of
    /// the result is entry (order[i], order[j]) of `self`.
    pub fn permuted(&self, order: &[usize]) -> Self {
        let values = order
            .iter()
            .map(|&i| order.iter().map(|&j| self.values[i][j]).collect())
            .collect();
        Self { values }
    }
}

/// Result of assembling a matrix from a partial or complete judgment set.
#[derive(Debug, Clone, PartialEq)]
pub struct BuiltMatrix {
    pub elements: Vec<NodeId>,
    pub matrix: ComparisonMatrix,
    pub submitted_pairs: usize,
    pub required_pairs: usize,
}

impl BuiltMatrix {
    /// Returns true once every pair was explicitly judged.
    pub fn is_complete(&self) -> bool {
        self.submitted_pairs >= self.required_pairs
    }

    /// Pairs still missing a judgment.
    pub fn remaining_pairs(&self) -> usize {
        self.required_pairs.saturating_sub(self.submitted_pairs)
    }
}

/// Assembles reciprocal matrices from sparse judgments.
pub struct MatrixBuilder;

impl MatrixBuilder {
    /// Builds the matrix for `elements` (in order) from `comparisons`.
    ///
    /// Missing pairs default to the neutral judgment 1 so partially
    /// completed groups stay computable for previews.
    ///
    /// # Errors
    ///
    /// - `InsufficientElements` for fewer than two elements
    /// - `UnknownElement` if a judgment names an id outside the group
    pub fn build(
        elements: &[NodeId],
        comparisons: &ComparisonSet,
    ) -> Result<BuiltMatrix, AnalysisError> {
        let n = elements.len();
        if n < 2 {
            return Err(AnalysisError::InsufficientElements { actual: n });
        }

        for comparison in comparisons.iter() {
            for endpoint in [&comparison.row, &comparison.col] {
                if !elements.contains(endpoint) {
                    return Err(AnalysisError::UnknownElement(endpoint.clone()));
                }
            }
        }

        let mut submitted_pairs = 0;
        let matrix = ComparisonMatrix::from_upper(n, |i, j| {
            match comparisons.value_for(&elements[i], &elements[j]) {
                Some(value) => {
                    submitted_pairs += 1;
                    value
                }
                None => 1.0,
            }
        });

        Ok(BuiltMatrix {
            elements: elements.to_vec(),
            matrix,
            submitted_pairs,
            required_pairs: pair_count(n),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::analysis::PairwiseComparison;

    fn id(s: &str) -> NodeId {
        NodeId::new(s).unwrap()
    }

    fn ids(names: &[&str]) -> Vec<NodeId> {
        names.iter().map(|n| id(n)).collect()
    }

    fn cmp(a: &str, b: &str, v: f64) -> PairwiseComparison {
        PairwiseComparison::new(id(a), id(b), v).unwrap()
    }

    #[test]
    fn build_rejects_single_element_group() {
        let err = MatrixBuilder::build(&ids(&["a"]), &ComparisonSet::new()).unwrap_err();
        assert_eq!(err, AnalysisError::InsufficientElements { actual: 1 });
    }

    #[test]
    fn build_rejects_foreign_element() {
        let set: ComparisonSet = vec![cmp("a", "z", 3.0)].into_iter().collect();
        let err = MatrixBuilder::build(&ids(&["a", "b"]), &set).unwrap_err();
        assert_eq!(err, AnalysisError::UnknownElement(id("z")));
    }

    #[test]
    fn missing_pairs_default_to_neutral() {
        let set: ComparisonSet = vec![cmp("a", "b", 3.0)].into_iter().collect();
        let built = MatrixBuilder::build(&ids(&["a", "b", "c"]), &set).unwrap();

        assert_eq!(built.matrix.get(0, 1), 3.0);
        assert!((built.matrix.get(1, 0) - 1.0 / 3.0).abs() < 1e-12);
        assert_eq!(built.matrix.get(0, 2), 1.0);
        assert_eq!(built.matrix.get(2, 1), 1.0);
        assert!(!built.is_complete());
        assert_eq!(built.remaining_pairs(), 2);
    }

    #[test]
    fn reversed_judgment_lands_as_reciprocal() {
        let set: ComparisonSet = vec![cmp("b", "a", 4.0)].into_iter().collect();
        let built = MatrixBuilder::build(&ids(&["a", "b"]), &set).unwrap();

        assert_eq!(built.matrix.get(0, 1), 0.25);
        assert_eq!(built.matrix.get(1, 0), 4.0);
        assert!(built.is_complete());
    }

    #[test]
    fn built_matrix_keeps_reciprocal_invariant() {
        let set: ComparisonSet = vec![cmp("a", "b", 3.0), cmp("a", "c", 5.0), cmp("c", "b", 2.0)]
            .into_iter()
            .collect();
        let built = MatrixBuilder::build(&ids(&["a", "b", "c"]), &set).unwrap();
        let rows = built.matrix.rows().to_vec();

        assert!(ComparisonMatrix::from_rows(rows).is_ok());
        assert!(built.is_complete());
    }

    #[test]
    fn from_rows_rejects_non_reciprocal_matrix() {
        let err = ComparisonMatrix::from_rows(vec![vec![1.0, 3.0], vec![3.0, 1.0]]).unwrap_err();
        assert!(matches!(err, AnalysisError::NotReciprocal { row: 0, col: 1, .. }));
    }

    #[test]
    fn from_rows_rejects_ragged_rows() {
        let err = ComparisonMatrix::from_rows(vec![vec![1.0, 2.0], vec![0.5]]).unwrap_err();
        assert!(matches!(err, AnalysisError::NotSquare { row: 1, .. }));
    }

    #[test]
    fn from_ratios_builds_consistent_matrix() {
        let m = ComparisonMatrix::from_ratios(&[4.0, 2.0, 1.0]).unwrap();
        assert_eq!(m.get(0, 1), 2.0);
        assert_eq!(m.get(0, 2), 4.0);
        assert_eq!(m.get(2, 0), 0.25);
    }

    #[test]
    fn permuted_reorders_rows_and_columns() {
        let m = ComparisonMatrix::from_ratios(&[4.0, 2.0, 1.0]).unwrap();
        let p = m.permuted(&[2, 0, 1]);
        assert_eq!(p.get(0, 1), m.get(2, 0));
        assert_eq!(p.get(1, 2), m.get(0, 1));
    }

    #[test]
    fn multiply_applies_rows() {
        let m = ComparisonMatrix::neutral(3);
        assert_eq!(m.multiply(&[1.0, 2.0, 3.0]), vec![6.0, 6.0, 6.0]);
    }
}
