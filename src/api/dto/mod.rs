//! Data Transfer Objects for API requests and responses.
//!
//! Request DTOs derive `validator::Validate`; handlers call `validate()`
//! before touching a service. Responses are wrapped in [`envelope::ApiResponse`].

pub mod envelope;
pub mod health;
pub mod history;
pub mod pagination;
pub mod shorten;
pub mod users;
