//! HTTP middleware for axum.
//!
//! - `context` - Tenant and user resolution for `/api` routes

pub mod context;

pub use context::{resolve_context, ContextRejection, RequestContext};
