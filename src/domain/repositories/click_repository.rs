//! Repository trait for click telemetry.

use crate::domain::entities::{Click, NewClick};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Repository interface for recording and querying clicks.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgClickRepository`] - PostgreSQL implementation
/// - [`crate::infrastructure::memory::InMemoryStore`] - in-process implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ClickRepository: Send + Sync {
    /// Appends a click record.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors, including a click
    /// whose link has been deleted in the meantime.
    async fn record_click(&self, new_click: NewClick) -> Result<Click, AppError>;

    /// Lists the clicks of a link, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn list_by_link(&self, link_id: i64) -> Result<Vec<Click>, AppError>;

    /// Counts all recorded clicks.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn count(&self) -> Result<i64, AppError>;

    /// Deletes clicks recorded before `cutoff`. Returns the number removed.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn delete_older_than(&self, cutoff: DateTime<Utc>) -> Result<u64, AppError>;
}
