//! Guest session entity for anonymous link owners.

use chrono::{DateTime, Utc};

use crate::domain::expiration;

/// An anonymous, time-limited identity.
///
/// Only the HMAC of the opaque session token is persisted; the raw token
/// lives with the client.
#[derive(Debug, Clone)]
pub struct GuestSession {
    pub id: i64,
    pub token_hash: String,
    pub expires_at: DateTime<Utc>,
    pub last_accessed: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl GuestSession {
    /// Returns true if the session can still be used at `now`.
    pub fn is_active_at(&self, now: DateTime<Utc>) -> bool {
        !expiration::is_expired(Some(self.expires_at), now)
    }
}
