//! Caching layer for API responses to reduce repeated calls

use crate::model::{RiskMetrics, StockRecord};
use cached::{Cached, TimedCache};
use std::fmt::Debug;
use std::hash::Hash;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

/// Thread-safe TTL cache for decoded responses
///
/// A zero TTL disables the cache: lookups always miss and inserts are dropped.
pub struct ResponseCache<K, V> {
    cache: Arc<RwLock<TimedCache<K, V>>>,
    enabled: bool,
}

impl<K, V> ResponseCache<K, V>
where
    K: Hash + Eq + Clone + Debug,
    V: Clone,
{
    /// Create a new cache with specified TTL
    pub fn new(ttl: Duration) -> Self {
        Self {
            cache: Arc::new(RwLock::new(TimedCache::with_lifespan(ttl))),
            enabled: !ttl.is_zero(),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Get a value from the cache
    pub async fn get(&self, key: &K) -> Option<V> {
        if !self.enabled {
            return None;
        }
        let mut cache = self.cache.write().await;
        cache.cache_get(key).cloned()
    }

    /// Insert a value into the cache
    pub async fn insert(&self, key: K, value: V) {
        if !self.enabled {
            return;
        }
        let mut cache = self.cache.write().await;
        let _ = cache.cache_set(key, value);
    }

    /// Get or fetch a value using the provided fetcher function
    ///
    /// Errors from the fetcher are returned as-is and nothing is cached.
    pub async fn get_or_fetch<F, Fut, E>(&self, key: K, fetcher: F) -> Result<V, E>
    where
        F: FnOnce() -> Fut,
        Fut: std::future::Future<Output = Result<V, E>>,
    {
        if let Some(value) = self.get(&key).await {
            tracing::debug!("Cache hit for key: {:?}", key);
            return Ok(value);
        }

        tracing::debug!("Cache miss for key: {:?}", key);

        let value = fetcher().await?;
        self.insert(key, value.clone()).await;

        Ok(value)
    }

    /// Invalidate a specific cache entry
    pub async fn invalidate(&self, key: &K) {
        let mut cache = self.cache.write().await;
        let _ = cache.cache_remove(key);
    }

    /// Clear all cached entries
    pub async fn clear(&self) {
        let mut cache = self.cache.write().await;
        cache.cache_clear();
    }

    /// Get the number of cached entries
    pub async fn len(&self) -> usize {
        let cache = self.cache.read().await;
        cache.cache_size()
    }

    /// Check if the cache is empty
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

impl<K, V> Clone for ResponseCache<K, V> {
    fn clone(&self) -> Self {
        Self {
            cache: Arc::clone(&self.cache),
            enabled: self.enabled,
        }
    }
}

/// Per-endpoint caches for the idempotent GET calls
///
/// Keys are upper-cased tickers. Search and team analysis are not cached:
/// suggestions are cheap and team results depend on the whole member list.
#[derive(Clone)]
pub struct ApiCache {
    pub analysis: ResponseCache<String, Arc<StockRecord>>,
    pub risk: ResponseCache<String, Arc<RiskMetrics>>,
}

impl ApiCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            analysis: ResponseCache::new(ttl),
            risk: ResponseCache::new(ttl),
        }
    }

    /// Clear all caches
    pub async fn clear_all(&self) {
        self.analysis.clear().await;
        self.risk.clear().await;
    }
}
