//! Pairwise comparisons and the per-group judgment set.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::NodeId;

use super::saaty_scale::is_on_scale;
use super::AnalysisError;

/// One judgment: `row` is `value` times as important as `col`.
///
/// The implied judgment for (col, row) is always `1 / value`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PairwiseComparison {
    pub row: NodeId,
    pub col: NodeId,
    pub value: f64,
}

impl PairwiseComparison {
    /// Creates a validated comparison.
    ///
    /// # Errors
    ///
    /// - `SelfComparison` if both ids are equal
    /// - `OffScale` if the value is not one of the 17 Saaty scale points
    pub fn new(row: NodeId, col: NodeId, value: f64) -> Result<Self, AnalysisError> {
        let comparison = Self { row, col, value };
        comparison.validate()?;
        Ok(comparison)
    }

    /// Re-checks a comparison that arrived through deserialization.
    pub fn validate(&self) -> Result<(), AnalysisError> {
        if self.row == self.col {
            return Err(AnalysisError::SelfComparison(self.row.clone()));
        }
        if !is_on_scale(self.value) {
            return Err(AnalysisError::OffScale(self.value));
        }
        Ok(())
    }

    /// Returns the same judgment seen from the other side.
    pub fn reciprocal(&self) -> Self {
        Self {
            row: self.col.clone(),
            col: self.row.clone(),
            value: 1.0 / self.value,
        }
    }

    /// Returns true if both comparisons cover the same unordered pair.
    pub fn same_pair(&self, other: &PairwiseComparison) -> bool {
        (self.row == other.row && self.col == other.col)
            || (self.row == other.col && self.col == other.row)
    }

    /// Returns the judgment oriented as (row, col), if this comparison covers the pair.
    pub fn value_for(&self, row: &NodeId, col: &NodeId) -> Option<f64> {
        if &self.row == row && &self.col == col {
            Some(self.value)
        } else if &self.row == col && &self.col == row {
            Some(1.0 / self.value)
        } else {
            None
        }
    }
}

/// The judgments submitted so far for one comparison group.
///
/// Holds at most one judgment per unordered pair; a later submission for
/// the same pair replaces the earlier one whatever its orientation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ComparisonSet {
    comparisons: Vec<PairwiseComparison>,
}

impl ComparisonSet {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces the judgment for the comparison's pair.
    pub fn upsert(&mut self, comparison: PairwiseComparison) {
        match self.comparisons.iter_mut().find(|c| c.same_pair(&comparison)) {
            Some(existing) => *existing = comparison,
            None => self.comparisons.push(comparison),
        }
    }

    /// Returns a copy with every comparison of `batch` applied.
    pub fn merged(&self, batch: &[PairwiseComparison]) -> Self {
        let mut merged = self.clone();
        for comparison in batch {
            merged.upsert(comparison.clone());
        }
        merged
    }

    /// Returns the judgment for (row, col), if submitted.
    pub fn value_for(&self, row: &NodeId, col: &NodeId) -> Option<f64> {
        self.comparisons.iter().find_map(|c| c.value_for(row, col))
    }

    /// Number of distinct pairs judged.
    pub fn len(&self) -> usize {
        self.comparisons.len()
    }

    /// Returns true if nothing has been judged.
    pub fn is_empty(&self) -> bool {
        self.comparisons.is_empty()
    }

    /// Iterates the stored judgments in submission order.
    pub fn iter(&self) -> impl Iterator<Item = &PairwiseComparison> {
        self.comparisons.iter()
    }
}

impl FromIterator<PairwiseComparison> for ComparisonSet {
    fn from_iter<I: IntoIterator<Item = PairwiseComparison>>(iter: I) -> Self {
        let mut set = ComparisonSet::new();
        for comparison in iter {
            set.upsert(comparison);
        }
        set
    }
}
