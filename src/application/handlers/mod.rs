//! Application handlers.
//!
//! Command and query handlers that orchestrate domain operations.

pub mod evaluation;
pub mod group;

pub use evaluation::{
    GetProgressHandler, GetProgressQuery, PauseEvaluationCommand, PauseEvaluationHandler,
    PreviewConsistencyHandler, PreviewConsistencyQuery, ResumeEvaluationCommand,
    ResumeEvaluationHandler, ResumeEvaluationResult, StartEvaluationCommand,
    StartEvaluationHandler, StartEvaluationResult, SubmitComparisonsCommand,
    SubmitComparisonsHandler, SubmitComparisonsResult,
};
pub use group::{
    CalculateGroupRankingHandler, CalculateGroupRankingQuery, CalculateGroupResultHandler,
    CalculateGroupResultQuery, GroupRankingResult,
};
