//! Cache-aside redirect resolution.

use chrono::{DateTime, Utc};
use serde_json::json;
use std::sync::Arc;
use tokio::sync::mpsc;

use crate::domain::click_event::ClickEvent;
use crate::domain::entities::Link;
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;
use crate::infrastructure::cache::CacheService;

/// Request metadata recorded with a click.
#[derive(Debug, Clone, Default)]
pub struct ClickContext {
    pub ip: Option<String>,
    pub user_agent: Option<String>,
}

/// Resolves short codes to destination URLs.
///
/// # Request Flow
///
/// 1. Look the code up in the cache
/// 2. Always load the link from the store (expiry and id are not cached);
///    on a cache miss, populate the cache from the store
/// 3. Reject missing (404) and expired (410) links
/// 4. Offer a [`ClickEvent`] to the click queue without waiting
/// 5. Atomically bump the link's click counter
///
/// A cache failure never fails the redirect; a store failure always does.
pub struct RedirectService {
    links: Arc<dyn LinkRepository>,
    cache: Arc<dyn CacheService>,
    click_sender: mpsc::Sender<ClickEvent>,
    cache_ttl_seconds: u64,
}

impl RedirectService {
    /// Creates a new redirect service.
    pub fn new(
        links: Arc<dyn LinkRepository>,
        cache: Arc<dyn CacheService>,
        click_sender: mpsc::Sender<ClickEvent>,
        cache_ttl_seconds: u64,
    ) -> Self {
        Self {
            links,
            cache,
            click_sender,
            cache_ttl_seconds,
        }
    }

    /// Resolves `code` at `now` and returns the URL to redirect to.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] for unknown codes.
    /// Returns [`AppError::Gone`] for expired links; no click is recorded.
    /// Returns [`AppError::Internal`] if the store is unavailable.
    pub async fn resolve(
        &self,
        code: &str,
        ctx: ClickContext,
        now: DateTime<Utc>,
    ) -> Result<String, AppError> {
        let (cached, cache_outcome) = match self.cache.get_url(code).await {
            Ok(Some(url)) => (Some(url), "hit"),
            Ok(None) => (None, "miss"),
            Err(e) => {
                tracing::warn!(code = %code, error = %e, "cache unavailable, using store");
                (None, "error")
            }
        };
        metrics::counter!("redirects_total", "cache" => cache_outcome).increment(1);

        let link = self
            .links
            .find_by_code(code)
            .await?
            .ok_or_else(|| AppError::not_found("URL not found", json!({})))?;

        if link.is_expired_at(now) {
            tracing::debug!(code = %code, "link expired");
            return Err(AppError::gone("URL expired", json!({})));
        }

        let destination = match cached {
            Some(url) => url,
            None => {
                if cache_outcome == "miss" {
                    self.populate_cache(&link).await;
                }
                link.original_url.clone()
            }
        };

        self.enqueue_click(&link, ctx, now);

        if let Err(e) = self.links.increment_clicks(link.id).await {
            tracing::error!(code = %code, error = %e, "failed to increment click counter");
        }

        Ok(destination)
    }

    async fn populate_cache(&self, link: &Link) {
        if let Err(e) = self
            .cache
            .set_url(&link.code, &link.original_url, Some(self.cache_ttl_seconds))
            .await
        {
            tracing::warn!(code = %link.code, error = %e, "failed to cache redirect");
        }
    }

    fn enqueue_click(&self, link: &Link, ctx: ClickContext, now: DateTime<Utc>) {
        let event = ClickEvent::new(
            link.id,
            link.code.clone(),
            ctx.ip,
            ctx.user_agent.as_deref(),
            now,
        );

        if let Err(e) = self.click_sender.try_send(event) {
            metrics::counter!("clicks_dropped_total").increment(1);
            tracing::warn!(code = %link.code, error = %e, "click dropped");
        }
    }
}
