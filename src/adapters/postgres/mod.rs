//! PostgreSQL adapters - Database implementations for repository ports.
//!
//! - `PostgresPresentationRepository` - JSONB aggregate store with revision CAS

mod presentation_repository;

pub use presentation_repository::PostgresPresentationRepository;
