//! DTOs for the link history endpoint.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::entities::Link;

/// One link in the caller's history.
#[derive(Debug, Serialize)]
pub struct HistoryItem {
    pub id: i64,
    pub original_url: String,
    pub short_code: String,
    pub short_url: String,
    pub clicks: i64,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,

    pub created_at: DateTime<Utc>,
}

impl HistoryItem {
    pub fn from_link(link: Link, short_url: String) -> Self {
        Self {
            id: link.id,
            original_url: link.original_url,
            short_code: link.code,
            short_url,
            clicks: link.click_count,
            expires_at: link.expires_at,
            created_at: link.created_at,
        }
    }
}

/// Page position echoed back with the history.
///
/// `count` is the number of items on this page, not the total.
#[derive(Debug, Serialize)]
pub struct HistoryMeta {
    pub page: i64,
    pub limit: i64,
    pub count: usize,
}

#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    pub history: Vec<HistoryItem>,
    pub meta: HistoryMeta,
}
