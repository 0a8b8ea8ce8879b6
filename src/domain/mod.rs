//! Domain layer containing the live presentation model.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (value objects, IDs, errors, events)
//! - `presentation` - Aggregate root: slide deck, settings, statistics
//! - `session` - Session lifecycle, participant roster
//! - `poll` - Poll activations, responses, definition read model

pub mod foundation;
pub mod poll;
pub mod presentation;
pub mod session;
