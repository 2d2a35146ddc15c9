//! Watch-based progress channel.
//!
//! Keeps only the latest notification per (session, event type) in a
//! `tokio::sync::watch` slot; a newer push supersedes an unread older one.
//! Pushing never waits on subscribers. Closing a session drops its slots;
//! receivers keep the last value they saw.

use std::collections::HashMap;
use std::sync::Mutex;
use tokio::sync::watch;

use crate::domain::foundation::{DomainError, ErrorCode, EventEnvelope};
use crate::ports::ProgressChannel;

type Slot = watch::Sender<Option<EventEnvelope>>;

/// Latest-value progress channel backed by `tokio::sync::watch`.
#[derive(Debug, Default)]
pub struct WatchProgressChannel {
    slots: Mutex<HashMap<(String, String), Slot>>,
}

impl WatchProgressChannel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribes to one session's notifications of one type.
    ///
    /// The receiver starts with the latest value, or `None` if nothing
    /// was pushed yet.
    pub fn subscribe(
        &self,
        session_id: &str,
        event_type: &str,
    ) -> Result<watch::Receiver<Option<EventEnvelope>>, DomainError> {
        let mut slots = self.lock()?;
        let slot = slots
            .entry((session_id.to_string(), event_type.to_string()))
            .or_insert_with(|| watch::channel(None).0);
        Ok(slot.subscribe())
    }

    /// Returns the latest notification without subscribing.
    pub fn latest(&self, session_id: &str, event_type: &str) -> Option<EventEnvelope> {
        let slots = self.lock().ok()?;
        slots
            .get(&(session_id.to_string(), event_type.to_string()))
            .and_then(|slot| slot.borrow().clone())
    }

    /// Number of live (session, event type) slots.
    pub fn slot_count(&self) -> usize {
        self.lock().map(|slots| slots.len()).unwrap_or(0)
    }

    fn lock(
        &self,
    ) -> Result<std::sync::MutexGuard<'_, HashMap<(String, String), Slot>>, DomainError> {
        self.slots.lock().map_err(|_| {
            DomainError::new(ErrorCode::InternalError, "Progress channel lock poisoned")
        })
    }
}

impl ProgressChannel for WatchProgressChannel {
    fn push(&self, event: EventEnvelope) -> Result<(), DomainError> {
        let mut slots = self.lock()?;
        let key = (event.aggregate_id.clone(), event.event_type.clone());
        match slots.get(&key) {
            Some(slot) => {
                slot.send_replace(Some(event));
            }
            None => {
                slots.insert(key, watch::channel(Some(event)).0);
            }
        }
        Ok(())
    }

    /// Drops every slot of the session; open receivers see the close.
    fn close(&self, aggregate_id: &str) -> Result<(), DomainError> {
        self.lock()?.retain(|(session, _), _| session != aggregate_id);
        Ok(())
    }
}
