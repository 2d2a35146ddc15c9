//! Adapters - Implementations of port interfaces.
//!
//! - `memory` - In-memory hierarchy store and session repository
//! - `progress` - Push channels (tokio watch fan-out, recording)

pub mod memory;
pub mod progress;

pub use memory::{InMemoryEvaluationSessionRepository, InMemoryHierarchyReader};
pub use progress::{RecordingProgressChannel, WatchProgressChannel};
