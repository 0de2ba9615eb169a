//! Repository trait definitions for the domain layer.
//!
//! These traits abstract data access so that services can be tested with
//! fakes and run against PostgreSQL or the in-memory store alike.
//!
//! # Architecture
//!
//! - Traits define the contract for data operations
//! - Implementations live in `crate::infrastructure::persistence` and
//!   `crate::infrastructure::memory`
//! - Mock implementations are auto-generated via `mockall` for testing
//!
//! # Available Repositories
//!
//! - [`LinkRepository`] - Short link CRUD, ownership and counters
//! - [`ClickRepository`] - Click telemetry
//! - [`SessionRepository`] - Guest session lifecycle
//! - [`UserRepository`] - Registered accounts

pub mod click_repository;
pub mod link_repository;
pub mod session_repository;
pub mod user_repository;

pub use click_repository::ClickRepository;
pub use link_repository::LinkRepository;
pub use session_repository::SessionRepository;
pub use user_repository::UserRepository;

#[cfg(test)]
pub use click_repository::MockClickRepository;
#[cfg(test)]
pub use link_repository::MockLinkRepository;
#[cfg(test)]
pub use session_repository::MockSessionRepository;
#[cfg(test)]
pub use user_repository::MockUserRepository;
