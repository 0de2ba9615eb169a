//! HTTP middleware for request processing and protection.
//!
//! - [`identity`] resolves every caller to a user or a guest session
//! - [`auth`] guards user-only endpoints
//! - [`rate_limit`] and [`tracing`] wrap the whole router

pub mod auth;
pub mod identity;
pub mod rate_limit;
pub mod tracing;
