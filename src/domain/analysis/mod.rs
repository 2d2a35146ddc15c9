//! Analysis Module - Pure numerical services for pairwise comparison.
//!
//! # Components
//!
//! - `PairwiseComparison` / `ComparisonSet` - Validated judgments per group
//! - `MatrixBuilder` - Sparse judgments to a reciprocal matrix
//! - `EigenSolver` - Power Method priority vector and λmax
//! - `ConsistencyValidator` - CI, CR and adjustment suggestions
//! - `WeightPropagator` - Global weights and alternative ranking
//!
//! Everything here is synchronous and free of I/O.

mod comparison;
mod consistency;
mod eigen_solver;
mod errors;
mod matrix;
pub mod saaty_scale;
mod weight_propagator;

pub use comparison::{ComparisonSet, PairwiseComparison};
pub use consistency::{AdjustmentSuggestion, ConsistencyConfig, ConsistencyResult, ConsistencyValidator};
pub use eigen_solver::{EigenResult, EigenSolver, PowerMethodConfig};
pub use errors::AnalysisError;
pub use matrix::{BuiltMatrix, ComparisonMatrix, MatrixBuilder};
pub use saaty_scale::{random_index, snap_to_scale, SAATY_SCALE};
pub use weight_propagator::{
    AlternativeScore, CriterionWeight, GlobalWeightResult, ScoreContribution, WeightPropagator,
};

pub(crate) use eigen_solver::normalize;
