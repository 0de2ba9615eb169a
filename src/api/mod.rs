//! REST API layer for HTTP request/response handling.
//!
//! This layer translates HTTP requests into service calls and formats
//! responses in the common envelope.
//!
//! # Modules
//!
//! - [`dto`] - Data Transfer Objects for request/response serialization
//! - [`extractors`] - Request metadata extractors
//! - [`handlers`] - HTTP request handlers
//! - [`middleware`] - Identity, authentication and request processing middleware
//! - [`routes`] - Route groups

pub mod dto;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod routes;
