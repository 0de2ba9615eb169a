//! Infrastructure layer for external integrations.
//!
//! Implements the interfaces defined by the domain layer.
//!
//! # Modules
//!
//! - [`cache`] - Redirect cache backends (Redis, moka, no-op)
//! - [`persistence`] - PostgreSQL repository implementations
//! - [`memory`] - In-process implementation of every repository

pub mod cache;
pub mod memory;
pub mod persistence;
