//! Application layer - Commands, Queries, and Handlers.
//!
//! This layer orchestrates domain operations and coordinates between ports.
//! Writes go through the optimistic-concurrency [`PresentationMutator`];
//! queries read the repository directly.

pub mod handlers;
pub mod mutator;

pub use handlers::*;
pub use mutator::{Locator, PresentationMutator};
