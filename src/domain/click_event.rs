//! Click event model for asynchronous click tracking.

use chrono::{DateTime, Utc};

use crate::domain::entities::NewClick;

/// An in-memory representation of a click for async processing.
///
/// Used to pass click information from the redirect path to the background
/// worker via a channel, so that persisting telemetry never delays the
/// redirect itself.
///
/// # Usage Flow
///
/// 1. Created by [`crate::application::services::RedirectService`] once the link resolved
/// 2. Sent to the channel without waiting (`try_send`)
/// 3. Processed by [`crate::domain::click_worker::run_click_worker`]
/// 4. Converted to [`NewClick`] for persistence
#[derive(Debug, Clone)]
pub struct ClickEvent {
    pub link_id: i64,
    pub code: String,
    pub ip: Option<String>,
    pub user_agent: Option<String>,
    pub clicked_at: DateTime<Utc>,
}

impl ClickEvent {
    /// Creates a new click event.
    pub fn new(
        link_id: i64,
        code: String,
        ip: Option<String>,
        user_agent: Option<&str>,
        clicked_at: DateTime<Utc>,
    ) -> Self {
        Self {
            link_id,
            code,
            ip,
            user_agent: user_agent.map(|s| s.to_string()),
            clicked_at,
        }
    }

    /// Converts the event into the persistence input.
    pub fn into_new_click(self) -> NewClick {
        NewClick {
            link_id: self.link_id,
            ip: self.ip,
            user_agent: self.user_agent,
            clicked_at: self.clicked_at,
        }
    }
}
