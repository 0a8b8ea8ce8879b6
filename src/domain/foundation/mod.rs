//! Foundation module - Shared domain primitives.
//!
//! Contains value objects, identifiers, error types and event plumbing
//! that form the vocabulary of the live presentation domain.

mod command;
mod errors;
mod events;
mod ids;
mod state_machine;
mod timestamp;

pub use command::CommandMetadata;
pub use errors::{DomainError, ErrorCode, ValidationError};
pub use events::{domain_event, DomainEvent, EventEnvelope, EventMetadata, SerializableDomainEvent};
pub use ids::{
    EventId, PollActivationId, PollId, PresentationId, SessionId, SlideId, TenantId, UserId,
};
pub use state_machine::{IllegalTransition, StateMachine};
pub use timestamp::Timestamp;
