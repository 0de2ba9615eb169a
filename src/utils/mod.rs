//! Utility functions for code generation, URL validation, and request handling.
//!
//! - [`code_generator`] - Random short code generation
//! - [`url_validator`] - Destination URL validation
//! - [`client_ip`] - Client IP extraction from headers and peer address
//! - [`password`] - Argon2 password hashing

pub mod client_ip;
pub mod code_generator;
pub mod password;
pub mod url_validator;
