//! In-process cache backed by `moka`.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use moka::future::Cache;
use moka::policy::Expiry;
use tracing::debug;

use super::service::{CacheResult, CacheService};

#[derive(Debug, Clone)]
struct Entry {
    url: String,
    ttl: Duration,
}

/// Expires every entry after the TTL it was inserted with.
struct EntryExpiry;

impl Expiry<String, Entry> for EntryExpiry {
    fn expire_after_create(
        &self,
        _key: &String,
        value: &Entry,
        _created_at: Instant,
    ) -> Option<Duration> {
        Some(value.ttl)
    }

    fn expire_after_update(
        &self,
        _key: &String,
        value: &Entry,
        _updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        Some(value.ttl)
    }
}

/// Single-node cache for deployments without Redis.
pub struct MemoryCache {
    inner: Cache<String, Entry>,
    default_ttl: Duration,
}

impl MemoryCache {
    /// Creates a cache holding at most `max_capacity` entries.
    pub fn new(max_capacity: u64, default_ttl_seconds: u64) -> Self {
        let inner = Cache::builder()
            .max_capacity(max_capacity)
            .expire_after(EntryExpiry)
            .build();

        debug!(
            max_capacity,
            default_ttl_seconds, "MemoryCache initialized"
        );
        Self {
            inner,
            default_ttl: Duration::from_secs(default_ttl_seconds),
        }
    }
}

#[async_trait]
impl CacheService for MemoryCache {
    async fn get_url(&self, short_code: &str) -> CacheResult<Option<String>> {
        Ok(self.inner.get(short_code).await.map(|e| e.url))
    }

    async fn set_url(
        &self,
        short_code: &str,
        original_url: &str,
        ttl_seconds: Option<u64>,
    ) -> CacheResult<()> {
        let ttl = ttl_seconds
            .map(Duration::from_secs)
            .unwrap_or(self.default_ttl);
        self.inner
            .insert(
                short_code.to_string(),
                Entry {
                    url: original_url.to_string(),
                    ttl,
                },
            )
            .await;
        Ok(())
    }

    async fn invalidate(&self, short_code: &str) -> CacheResult<()> {
        self.inner.invalidate(short_code).await;
        Ok(())
    }

    async fn health_check(&self) -> bool {
        true
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_set_get_invalidate() {
        let cache = MemoryCache::new(100, 60);

        assert_eq!(cache.get_url("abc").await.unwrap(), None);
        cache.set_url("abc", "https://example.com", None).await.unwrap();
        assert_eq!(
            cache.get_url("abc").await.unwrap().as_deref(),
            Some("https://example.com")
        );

        cache.invalidate("abc").await.unwrap();
        assert_eq!(cache.get_url("abc").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_entry_expires_after_ttl() {
        let cache = MemoryCache::new(100, 60);
        cache
            .set_url("short", "https://example.com", Some(1))
            .await
            .unwrap();

        tokio::time::sleep(Duration::from_millis(1100)).await;
        assert_eq!(cache.get_url("short").await.unwrap(), None);
    }
}
