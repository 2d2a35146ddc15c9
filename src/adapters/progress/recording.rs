//! Recording progress channel for testing.
//!
//! Captures every pushed notification for assertions.
//!
//! # Security Note
//!
//! This adapter is for **testing only**. It uses `.expect()` on lock
//! operations which will panic if locks are poisoned. Production code
//! should use `WatchProgressChannel`.

use std::sync::RwLock;

use crate::domain::foundation::{DomainError, EventEnvelope};
use crate::ports::ProgressChannel;

/// Progress channel that keeps every notification in push order.
///
/// # Example
///
/// ```ignore
/// let channel = Arc::new(RecordingProgressChannel::new());
/// let tracker = ProgressTracker::new(session_id, &hierarchy, channel.clone(), Timestamp::now());
/// // ...
/// assert!(channel.has_event("evaluation.progress_updated.v1"));
/// ```
#[derive(Debug, Default)]
pub struct RecordingProgressChannel {
    pushed: RwLock<Vec<EventEnvelope>>,
    closed: RwLock<Vec<String>>,
}

impl RecordingProgressChannel {
    /// Creates an empty channel.
    pub fn new() -> Self {
        Self::default()
    }

    // === Test Helpers ===

    /// Returns all pushed notifications.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    pub fn events(&self) -> Vec<EventEnvelope> {
        self.pushed
            .read()
            .expect("RecordingProgressChannel: lock poisoned")
            .clone()
    }

    /// Returns notifications of one type.
    pub fn events_of_type(&self, event_type: &str) -> Vec<EventEnvelope> {
        self.events()
            .into_iter()
            .filter(|e| e.event_type == event_type)
            .collect()
    }

    /// Returns the most recent notification of one type.
    pub fn last_of_type(&self, event_type: &str) -> Option<EventEnvelope> {
        self.events_of_type(event_type).pop()
    }

    /// Checks whether a notification type was pushed.
    pub fn has_event(&self, event_type: &str) -> bool {
        self.events().iter().any(|e| e.event_type == event_type)
    }

    /// Returns the number of pushed notifications.
    pub fn event_count(&self) -> usize {
        self.pushed
            .read()
            .expect("RecordingProgressChannel: lock poisoned")
            .len()
    }

    /// Returns the aggregate ids passed to `close`, in order.
    pub fn closed(&self) -> Vec<String> {
        self.closed
            .read()
            .expect("RecordingProgressChannel: lock poisoned")
            .clone()
    }

    /// Clears captured notifications.
    pub fn clear(&self) {
        self.pushed
            .write()
            .expect("RecordingProgressChannel: lock poisoned")
            .clear();
    }
}

impl ProgressChannel for RecordingProgressChannel {
    fn push(&self, event: EventEnvelope) -> Result<(), DomainError> {
        self.pushed
            .write()
            .expect("RecordingProgressChannel: lock poisoned")
            .push(event);
        Ok(())
    }

    fn close(&self, aggregate_id: &str) -> Result<(), DomainError> {
        self.closed
            .write()
            .expect("RecordingProgressChannel: lock poisoned")
            .push(aggregate_id.to_string());
        Ok(())
    }
}
