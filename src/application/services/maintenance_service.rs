//! Housekeeping for expired data.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use std::sync::Arc;

use crate::domain::repositories::{ClickRepository, LinkRepository, SessionRepository};
use crate::error::AppError;

/// How long click telemetry is retained.
pub const CLICK_RETENTION_DAYS: i64 = 365;

/// Rows removed by one sweep.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SweepReport {
    pub links: u64,
    pub sessions: u64,
    pub clicks: u64,
}

/// Removes expired links, expired guest sessions and old clicks.
///
/// Not needed for correctness: expiry is enforced when links are read. The
/// sweep only keeps tables from growing without bound.
pub struct MaintenanceService {
    links: Arc<dyn LinkRepository>,
    sessions: Arc<dyn SessionRepository>,
    clicks: Arc<dyn ClickRepository>,
}

impl MaintenanceService {
    pub fn new(
        links: Arc<dyn LinkRepository>,
        sessions: Arc<dyn SessionRepository>,
        clicks: Arc<dyn ClickRepository>,
    ) -> Self {
        Self {
            links,
            sessions,
            clicks,
        }
    }

    /// Runs one sweep relative to `now`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on the first storage failure.
    pub async fn sweep(&self, now: DateTime<Utc>) -> Result<SweepReport, AppError> {
        let report = SweepReport {
            links: self.links.delete_expired(now).await?,
            sessions: self.sessions.delete_expired(now).await?,
            clicks: self
                .clicks
                .delete_older_than(now - Duration::days(CLICK_RETENTION_DAYS))
                .await?,
        };

        tracing::info!(
            links = report.links,
            sessions = report.sessions,
            clicks = report.clicks,
            "expired data swept"
        );
        Ok(report)
    }
}
