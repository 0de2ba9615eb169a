//! Click entity representing a single redirect event.

use chrono::{DateTime, Utc};

/// A click recorded when a shortened link is resolved.
///
/// Clicks are append-only and disappear only together with their link.
#[derive(Debug, Clone)]
pub struct Click {
    pub id: i64,
    pub link_id: i64,
    pub ip: Option<String>,
    pub user_agent: Option<String>,
    pub clicked_at: DateTime<Utc>,
}

impl Click {
    /// Creates a new Click instance.
    pub fn new(
        id: i64,
        link_id: i64,
        ip: Option<String>,
        user_agent: Option<String>,
        clicked_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            link_id,
            ip,
            user_agent,
            clicked_at,
        }
    }
}

/// Input data for recording a new click.
///
/// `clicked_at` is captured when the redirect is served, not when the
/// background worker gets around to persisting it.
#[derive(Debug, Clone)]
pub struct NewClick {
    pub link_id: i64,
    pub ip: Option<String>,
    pub user_agent: Option<String>,
    pub clicked_at: DateTime<Utc>,
}
