//! Application layer - Commands, Queries, and Handlers.
//!
//! Handlers load hierarchies and sessions through ports, drive the domain
//! orchestrator or aggregator, and persist the outcome.

pub mod handlers;
mod registry;

#[cfg(test)]
pub(crate) mod test_support;

pub use handlers::{
    // Evaluation handlers
    GetProgressHandler, GetProgressQuery,
    PauseEvaluationCommand, PauseEvaluationHandler,
    PreviewConsistencyHandler, PreviewConsistencyQuery,
    ResumeEvaluationCommand, ResumeEvaluationHandler, ResumeEvaluationResult,
    StartEvaluationCommand, StartEvaluationHandler, StartEvaluationResult,
    SubmitComparisonsCommand, SubmitComparisonsHandler, SubmitComparisonsResult,
    // Group handlers
    CalculateGroupRankingHandler, CalculateGroupRankingQuery, GroupRankingResult,
    CalculateGroupResultHandler, CalculateGroupResultQuery,
};
pub use registry::{ActiveEvaluations, SharedOrchestrator};
