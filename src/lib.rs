//! Live Presenter - Live presentation session engine.
//!
//! Tenant-scoped presentations own an ordered slide deck and the live
//! sessions run over it. A session tracks its lifecycle, current slide,
//! participant roster and poll activations, and completed sessions feed
//! rolling statistics back into the presentation.
//!
//! The crate is laid out as ports and adapters: `domain` holds the pure
//! aggregates, `ports` the async seams, `application` the command and query
//! handlers, `adapters` the in-memory, PostgreSQL, HTTP and event
//! implementations, and `config` the environment-driven settings.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
