//! Repository trait for guest sessions.

use crate::domain::entities::GuestSession;
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Repository interface for guest session lifecycle.
///
/// All lookups take the HMAC of the session token, never the raw token.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// Persists a new guest session.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the token hash already exists.
    /// Returns [`AppError::Internal`] on database errors.
    async fn create(
        &self,
        token_hash: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<GuestSession, AppError>;

    /// Finds a session by token hash that is still valid at `now`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn find_active(
        &self,
        token_hash: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<GuestSession>, AppError>;

    /// Finds a session by token hash regardless of expiry.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn find_by_token_hash(&self, token_hash: &str)
    -> Result<Option<GuestSession>, AppError>;

    /// Slides the expiry of a session and records the access time.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn touch(
        &self,
        session_id: i64,
        expires_at: DateTime<Utc>,
        last_accessed: DateTime<Utc>,
    ) -> Result<(), AppError>;

    /// Deletes sessions that expired before `now`. Returns the number removed.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn delete_expired(&self, now: DateTime<Utc>) -> Result<u64, AppError>;
}
