//! EventPublisher port - Interface for publishing domain events.
//!
//! Handlers publish after the aggregate has been committed, so a published
//! event always describes durable state.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, EventEnvelope};

#[async_trait]
pub trait EventPublisher: Send + Sync {
    /// Errors are reported to the caller, which decides whether they matter.
    async fn publish(&self, event: EventEnvelope) -> Result<(), DomainError>;
}
