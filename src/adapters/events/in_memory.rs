//! In-memory event bus.
//!
//! Captures every published envelope in order so tests can assert on what a
//! handler emitted.

use async_trait::async_trait;
use std::sync::{RwLock, RwLockReadGuard};

use crate::domain::foundation::{DomainError, EventEnvelope};
use crate::ports::EventPublisher;

/// ```ignore
/// let bus = Arc::new(InMemoryEventBus::new());
/// handler.handle(cmd, metadata).await?;
/// assert!(bus.has_event("session.started.v1"));
/// ```
#[derive(Debug, Default)]
pub struct InMemoryEventBus {
    published: RwLock<Vec<EventEnvelope>>,
}

impl InMemoryEventBus {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, Vec<EventEnvelope>> {
        self.published
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Every envelope, oldest first.
    pub fn published_events(&self) -> Vec<EventEnvelope> {
        self.read().clone()
    }

    pub fn events_of_type(&self, event_type: &str) -> Vec<EventEnvelope> {
        self.filtered(|e| e.event_type == event_type)
    }

    pub fn events_for_aggregate(&self, aggregate_id: &str) -> Vec<EventEnvelope> {
        self.filtered(|e| e.aggregate_id == aggregate_id)
    }

    pub fn event_count(&self) -> usize {
        self.read().len()
    }

    pub fn has_event(&self, event_type: &str) -> bool {
        self.read().iter().any(|e| e.event_type == event_type)
    }

    fn filtered(&self, keep: impl Fn(&EventEnvelope) -> bool) -> Vec<EventEnvelope> {
        self.read().iter().filter(|e| keep(e)).cloned().collect()
    }
}

#[async_trait]
impl EventPublisher for InMemoryEventBus {
    async fn publish(&self, event: EventEnvelope) -> Result<(), DomainError> {
        self.published
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(event);
        Ok(())
    }
}
