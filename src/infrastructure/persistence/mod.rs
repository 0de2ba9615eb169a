//! PostgreSQL repository implementations.
//!
//! Concrete implementations of domain repository traits using SQLx with
//! bound parameters and `FromRow` row mapping.
//!
//! # Repositories
//!
//! - [`PgLinkRepository`] - Link storage, ownership and counters
//! - [`PgClickRepository`] - Click telemetry
//! - [`PgSessionRepository`] - Guest session storage
//! - [`PgUserRepository`] - User accounts

pub mod pg_click_repository;
pub mod pg_link_repository;
pub mod pg_session_repository;
pub mod pg_user_repository;

pub use pg_click_repository::PgClickRepository;
pub use pg_link_repository::PgLinkRepository;
pub use pg_session_repository::PgSessionRepository;
pub use pg_user_repository::PgUserRepository;
