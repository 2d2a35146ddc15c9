//! Evaluation command and query handlers.

mod get_progress;
mod pause_evaluation;
mod preview_consistency;
mod resume_evaluation;
mod start_evaluation;
mod submit_comparisons;

pub use get_progress::{GetProgressHandler, GetProgressQuery};
pub use pause_evaluation::{PauseEvaluationCommand, PauseEvaluationHandler};
pub use preview_consistency::{PreviewConsistencyHandler, PreviewConsistencyQuery};
pub use resume_evaluation::{ResumeEvaluationCommand, ResumeEvaluationHandler, ResumeEvaluationResult};
pub use start_evaluation::{StartEvaluationCommand, StartEvaluationHandler, StartEvaluationResult};
pub use submit_comparisons::{
    SubmitComparisonsCommand, SubmitComparisonsHandler, SubmitComparisonsResult,
};
