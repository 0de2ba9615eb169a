//! Link entity representing a shortened URL mapping.

use chrono::{DateTime, Utc};

use crate::domain::expiration;

/// Who owns a link.
///
/// A link is owned either by a registered user or by a guest session,
/// never both. A link whose owner was removed has no owner at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Owner {
    User(i64),
    Session(i64),
}

impl Owner {
    /// Splits the owner into the `(user_id, session_id)` column pair.
    pub fn as_columns(&self) -> (Option<i64>, Option<i64>) {
        match *self {
            Owner::User(id) => (Some(id), None),
            Owner::Session(id) => (None, Some(id)),
        }
    }

    /// Rebuilds an owner from the `(user_id, session_id)` column pair.
    ///
    /// A user id wins if a row somehow carries both.
    pub fn from_columns(user_id: Option<i64>, session_id: Option<i64>) -> Option<Self> {
        match (user_id, session_id) {
            (Some(id), _) => Some(Owner::User(id)),
            (None, Some(id)) => Some(Owner::Session(id)),
            (None, None) => None,
        }
    }
}

/// A shortened URL with ownership and click metadata.
#[derive(Debug, Clone)]
pub struct Link {
    pub id: i64,
    pub code: String,
    pub original_url: String,
    pub owner: Option<Owner>,
    pub click_count: i64,
    pub expires_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl Link {
    /// Creates a new Link instance.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: i64,
        code: String,
        original_url: String,
        owner: Option<Owner>,
        click_count: i64,
        expires_at: Option<DateTime<Utc>>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            code,
            original_url,
            owner,
            click_count,
            expires_at,
            created_at,
        }
    }

    /// Returns true if the link can no longer be resolved at `now`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        expiration::is_expired(self.expires_at, now)
    }

    /// Returns true if `owner` owns this link.
    pub fn is_owned_by(&self, owner: Owner) -> bool {
        self.owner == Some(owner)
    }
}

/// Input data for creating a new link.
#[derive(Debug, Clone)]
pub struct NewLink {
    pub code: String,
    pub original_url: String,
    pub owner: Owner,
    pub expires_at: Option<DateTime<Utc>>,
}
