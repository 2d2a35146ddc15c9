//! Progress Module - Per-node progress and pushed snapshots.
//!
//! # Components
//!
//! - `NodeProgress` - Counts, consistency and timing of one comparison group
//! - `ProgressTracker` - Owns node progress, publishes `ProgressUpdated`
//! - `EvaluationProgress` / `StepDescriptor` - Snapshot handed to callers

mod events;
mod node_progress;
mod snapshot;
mod tracker;

pub use events::ProgressUpdated;
pub use node_progress::NodeProgress;
pub use snapshot::{EvaluationProgress, StepDescriptor};
pub use tracker::ProgressTracker;

pub(crate) use tracker::push_or_warn;
