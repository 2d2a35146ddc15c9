//! Foundation module - Shared domain primitives.
//!
//! Contains value objects, identifiers, enums, and error types
//! that form the vocabulary of the AHP engine.

mod errors;
mod evaluation_status;
mod events;
mod ids;
mod state_machine;
mod timestamp;

pub use errors::{DomainError, ErrorCode, ValidationError};
pub use evaluation_status::EvaluationStatus;
pub use events::{
    domain_event, DomainEvent, EventEnvelope, EventId, SerializableDomainEvent,
};
pub use ids::{NodeId, ProjectId, RaterId, SessionId};
pub use state_machine::StateMachine;
pub use timestamp::Timestamp;
