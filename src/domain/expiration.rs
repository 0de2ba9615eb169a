//! Expiration policy shared by links and guest sessions.

use chrono::{DateTime, Utc};

/// Returns true if something with the given deadline is expired at `now`.
///
/// A missing deadline never expires. The deadline itself is still valid:
/// expiry starts strictly after it.
pub fn is_expired(expires_at: Option<DateTime<Utc>>, now: DateTime<Utc>) -> bool {
    expires_at.is_some_and(|deadline| now > deadline)
}
