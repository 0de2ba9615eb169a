//! Repository trait for short link data access.

use crate::domain::entities::{Link, NewLink, Owner};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Repository interface for managing short links.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgLinkRepository`] - PostgreSQL implementation
/// - [`crate::infrastructure::memory::InMemoryStore`] - in-process implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LinkRepository: Send + Sync {
    /// Inserts a new short link.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(Link))` if the link was stored
    /// - `Ok(None)` if the short code is already taken; the caller should
    ///   generate a new code and try again
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn create(&self, new_link: NewLink) -> Result<Option<Link>, AppError>;

    /// Finds a link by its short code.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn find_by_code(&self, code: &str) -> Result<Option<Link>, AppError>;

    /// Lists the links of a single owner, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn find_page(&self, owner: Owner, offset: i64, limit: i64)
    -> Result<Vec<Link>, AppError>;

    /// Atomically adds one to the click counter of a link.
    ///
    /// Concurrent calls must never lose an increment.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn increment_clicks(&self, link_id: i64) -> Result<(), AppError>;

    /// Deletes a link and its clicks if, and only if, `owner` owns it.
    ///
    /// Returns `Ok(false)` both when the code does not exist and when it
    /// belongs to someone else.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn delete_owned(&self, code: &str, owner: Owner) -> Result<bool, AppError>;

    /// Re-owns every link of a guest session to a user and clears the
    /// session pointer. Returns the number of links moved.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn transfer_session_links(&self, session_id: i64, user_id: i64)
    -> Result<u64, AppError>;

    /// Deletes every link (and its clicks) whose expiry lies before `now`.
    /// Returns the number of links removed.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn delete_expired(&self, now: DateTime<Utc>) -> Result<u64, AppError>;

    /// Counts all links.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn count(&self) -> Result<i64, AppError>;
}
