//! In-memory adapters for development and testing.

mod hierarchy_reader;
mod session_repository;

pub use hierarchy_reader::InMemoryHierarchyReader;
pub use session_repository::InMemoryEvaluationSessionRepository;
