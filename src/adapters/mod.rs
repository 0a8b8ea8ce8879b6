//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `events` - Event publishers (in-memory bus, tracing log)
//! - `http` - axum REST surface
//! - `memory` - In-memory repository and poll catalog
//! - `postgres` - JSONB document store

pub mod events;
pub mod http;
pub mod memory;
pub mod postgres;

pub use events::{InMemoryEventBus, TracingEventPublisher};
pub use memory::{InMemoryPollCatalog, InMemoryPresentationRepository};
pub use postgres::PostgresPresentationRepository;
