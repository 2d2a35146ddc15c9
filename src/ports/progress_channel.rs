//! ProgressChannel port - Push sink for evaluation notifications.

use crate::domain::foundation::{DomainError, EventEnvelope};

/// Fire-and-forget sink for progress and consistency notifications.
///
/// `push` must not block: the engine calls it inline after every state
/// change. A returned error is logged by the caller and never alters
/// evaluation state.
pub trait ProgressChannel: Send + Sync {
    /// Push one notification, keyed by `event.aggregate_id` (the session id).
    fn push(&self, event: EventEnvelope) -> Result<(), DomainError>;

    /// Releases whatever the channel holds for a finished session.
    ///
    /// Called once after the completed session is stored. Nothing is pushed
    /// for that session afterwards.
    fn close(&self, _aggregate_id: &str) -> Result<(), DomainError> {
        Ok(())
    }
}
