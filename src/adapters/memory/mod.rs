//! In-memory adapters for tests and database-less runs.

mod poll_definitions;
mod presentation_repository;

pub use poll_definitions::InMemoryPollCatalog;
pub use presentation_repository::InMemoryPresentationRepository;
