//! Evaluation Module - One rater's session through a hierarchy.
//!
//! # Components
//!
//! - `EvaluationSession` - Persisted aggregate: status, judgments, frozen result
//! - `EvaluationOrchestrator` - State machine driving node-by-node evaluation
//! - `ConsistencyChecked` / `SessionUpdated` - Pushed notifications

mod errors;
mod events;
mod orchestrator;
mod session;

pub use errors::EvaluationError;
pub use events::{ConsistencyChecked, SessionUpdated};
pub use orchestrator::{next_unresolved_node, EvaluationOrchestrator, NodeCheck, StepOutcome};
pub use session::EvaluationSession;
