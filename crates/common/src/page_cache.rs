//! Full-page caching for the index view.
//!
//! The index is the hottest read path and its content tolerates a little
//! staleness, so the rendered response body is cached for a short TTL
//! (20 seconds by default) keyed by page number. The cache is manually
//! clearable.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tokio::time::Instant;
use tracing::debug;

/// Default TTL for cached index pages.
const DEFAULT_TTL_SECS: u64 = 20;

#[derive(Debug, Clone)]
struct CacheEntry {
    body: String,
    stored_at: Instant,
}

/// TTL-based cache for rendered page bodies.
#[derive(Debug, Clone)]
pub struct PageCache {
    entries: Arc<RwLock<HashMap<u64, CacheEntry>>>,
    ttl: Duration,
}

impl Default for PageCache {
    fn default() -> Self {
        Self::new()
    }
}

impl PageCache {
    /// Create a page cache with the default TTL.
    #[must_use]
    pub fn new() -> Self {
        Self::with_ttl(Duration::from_secs(DEFAULT_TTL_SECS))
    }

    /// Create a page cache with a custom TTL.
    #[must_use]
    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
            ttl,
        }
    }

    /// Get the cached body for a page, if present and not expired.
    pub async fn get(&self, page: u64) -> Option<String> {
        let entries = self.entries.read().await;
        let entry = entries.get(&page)?;

        if entry.stored_at.elapsed() >= self.ttl {
            debug!(page, "Page cache entry expired");
            return None;
        }

        debug!(page, "Page cache hit");
        Some(entry.body.clone())
    }

    /// Store the rendered body for a page.
    pub async fn set(&self, page: u64, body: String) {
        let mut entries = self.entries.write().await;
        entries.insert(
            page,
            CacheEntry {
                body,
                stored_at: Instant::now(),
            },
        );
    }

    /// Drop every cached page.
    pub async fn clear(&self) {
        let mut entries = self.entries.write().await;
        entries.clear();
        debug!("Page cache cleared");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn get_returns_stored_body() {
        let cache = PageCache::new();
        cache.set(1, "body".to_string()).await;

        assert_eq!(cache.get(1).await.as_deref(), Some("body"));
        assert!(cache.get(2).await.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn entries_expire_after_ttl() {
        let cache = PageCache::with_ttl(Duration::from_secs(20));
        cache.set(1, "body".to_string()).await;

        tokio::time::advance(Duration::from_secs(19)).await;
        assert!(cache.get(1).await.is_some());

        tokio::time::advance(Duration::from_secs(2)).await;
        assert!(cache.get(1).await.is_none());
    }

    #[tokio::test]
    async fn clear_drops_all_pages() {
        let cache = PageCache::new();
        cache.set(1, "a".to_string()).await;
        cache.set(2, "b".to_string()).await;

        cache.clear().await;

        assert!(cache.get(1).await.is_none());
        assert!(cache.get(2).await.is_none());
    }

    #[tokio::test]
    async fn set_overwrites_existing_entry() {
        let cache = PageCache::new();
        cache.set(1, "old".to_string()).await;
        cache.set(1, "new".to_string()).await;

        assert_eq!(cache.get(1).await.as_deref(), Some("new"));
    }
}
