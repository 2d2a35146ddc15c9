//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the engine and its storage and notification infrastructure. Adapters
//! implement these ports.
//!
//! - `HierarchyReader` - Loads a project's goal, criteria and alternatives
//! - `EvaluationSessionRepository` - Persists rater sessions
//! - `ProgressChannel` - Non-blocking push sink for notifications

mod evaluation_session_repository;
mod hierarchy_reader;
mod progress_channel;

pub use evaluation_session_repository::EvaluationSessionRepository;
pub use hierarchy_reader::HierarchyReader;
pub use progress_channel::ProgressChannel;
