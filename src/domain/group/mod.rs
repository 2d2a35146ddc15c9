//! Group Module - Multi-rater aggregation and consensus.
//!
//! # Components
//!
//! - `GroupAggregator` - AIJ (geometric mean of judgments) and AIP
//!   (mean of priorities, optionally quality-weighted)
//! - `ConsensusAnalyzer` - Consensus index, Kendall's W, distances, disagreements
//! - `GroupCalculationResult` - Aggregated outcome plus per-rater contributions

mod aggregator;
mod consensus;
mod errors;
mod result;

pub use aggregator::{GroupAggregator, GroupConfig, RaterJudgment};
pub use consensus::{ConsensusAnalyzer, ConsensusMetrics, Disagreement, ResolutionHint};
pub use errors::GroupError;
pub use result::{
    AggregatedOutcome, AggregationStrategy, GroupCalculationResult, RaterContribution,
};
