//! Integration test utilities for the authorization engine
//!
//! In-memory repositories and fixtures for exercising the services end to
//! end, plus helpers for running the same flows against PostgreSQL.

pub mod helpers;

pub use fixtures::*;
pub use helpers::*;
pub use memory::MemoryStore;
