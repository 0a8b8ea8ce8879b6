//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! - `PresentationRepository` - Tenant-scoped aggregate persistence with
//!   optimistic locking
//! - `PollDefinitionReader` - Read-only lookup into the external poll store
//! - `EventPublisher` - Port for publishing domain events

mod event_publisher;
mod poll_definition_reader;
mod presentation_repository;

pub use event_publisher::EventPublisher;
pub use poll_definition_reader::PollDefinitionReader;
pub use presentation_repository::PresentationRepository;
