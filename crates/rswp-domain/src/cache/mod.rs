//! Record caching with TTL eviction.
//!
//! This module provides the cache-aside layer the readers consult before
//! touching the backing store. The in-process implementation uses Moka's
//! async Cache which provides:
//! - Lock-free concurrent reads
//! - Automatic TTL-based eviction
//! - Memory-bounded storage
//!
//! Records are stored as JSON blobs keyed by a per-kind prefix plus the
//! record id (`wp_term_5`, `wp_post_42`). A miss is a normal outcome, and
//! cache failures never surface to callers: an entry that fails to decode
//! is treated as a miss and re-fetched from the store.
//!
//! # Example
//!
//! ```rust,ignore
//! use rswp_domain::cache::{MemoryRecordCache, RecordCache, RecordCacheConfig};
//!
//! let cache = MemoryRecordCache::new(RecordCacheConfig::default());
//! cache.set("wp_term_5".to_string(), "{...}".to_string()).await;
//! assert!(cache.get("wp_term_5").await.is_some());
//! ```

mod loader;

pub use loader::{encode_record, load_batch, record_key, spawn_write_back, BatchOutcome, MissingRecord};

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use moka::future::Cache;

/// Configuration for the record cache.
#[derive(Debug, Clone)]
pub struct RecordCacheConfig {
    /// Whether caching is enabled. Enabled by default; the cache is
    /// advisory, so a stale or missing entry only costs a store read.
    pub enabled: bool,
    /// Maximum number of entries in the cache.
    pub max_capacity: u64,
    /// Default TTL for cache entries.
    pub default_ttl: Duration,
}

impl Default for RecordCacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_capacity: 100_000,
            default_ttl: Duration::from_secs(300),
        }
    }
}

impl RecordCacheConfig {
    /// Enables or disables caching.
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Sets the maximum capacity.
    pub fn with_max_capacity(mut self, max_capacity: u64) -> Self {
        self.max_capacity = max_capacity;
        self
    }

    /// Sets the default TTL.
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.default_ttl = ttl;
        self
    }
}

/// A shared blob cache for encoded records.
///
/// Implementations must be thread-safe and must treat every operation as
/// best-effort: a get that finds nothing and a set that stores nothing are
/// both valid behaviors, never errors.
#[async_trait]
pub trait RecordCache: Send + Sync + 'static {
    /// Looks up a single entry.
    async fn get(&self, key: &str) -> Option<String>;

    /// Looks up a batch of entries. Absent keys are simply not present in
    /// the returned map.
    async fn get_multi(&self, keys: &[String]) -> HashMap<String, String>;

    /// Stores a single entry.
    async fn set(&self, key: String, value: String);

    /// Stores a batch of entries.
    async fn set_multi(&self, entries: Vec<(String, String)>);
}

/// In-process record cache backed by Moka.
///
/// # Thread Safety
///
/// This cache is fully thread-safe and can be shared across multiple
/// async tasks without external synchronization.
pub struct MemoryRecordCache {
    cache: Cache<String, String>,
    config: RecordCacheConfig,
}

impl std::fmt::Debug for MemoryRecordCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryRecordCache")
            .field("config", &self.config)
            .field("entry_count", &self.cache.entry_count())
            .finish()
    }
}

impl MemoryRecordCache {
    /// Creates a new record cache with the given configuration.
    pub fn new(config: RecordCacheConfig) -> Self {
        let cache = Cache::builder()
            .max_capacity(config.max_capacity)
            .time_to_live(config.default_ttl)
            .build();

        Self { cache, config }
    }

    /// Returns the configuration for this cache.
    pub fn config(&self) -> &RecordCacheConfig {
        &self.config
    }

    /// Returns the approximate number of entries in the cache.
    pub fn entry_count(&self) -> u64 {
        self.cache.entry_count()
    }

    /// Runs Moka's pending maintenance tasks. Tests call this so
    /// `entry_count` reflects recent inserts.
    pub async fn sync(&self) {
        self.cache.run_pending_tasks().await;
    }
}

#[async_trait]
impl RecordCache for MemoryRecordCache {
    /// Retrieves a cached entry.
    ///
    /// # Metrics
    ///
    /// Records cache hit/miss to:
    /// - `rswp_record_cache_hits_total` - Incremented on cache hit
    /// - `rswp_record_cache_misses_total` - Incremented on cache miss
    async fn get(&self, key: &str) -> Option<String> {
        let result = self.cache.get(key).await;
        if result.is_some() {
            metrics::counter!("rswp_record_cache_hits_total").increment(1);
        } else {
            metrics::counter!("rswp_record_cache_misses_total").increment(1);
        }
        result
    }

    async fn get_multi(&self, keys: &[String]) -> HashMap<String, String> {
        let mut found = HashMap::with_capacity(keys.len());
        for key in keys {
            if let Some(value) = self.cache.get(key).await {
                metrics::counter!("rswp_record_cache_hits_total").increment(1);
                found.insert(key.clone(), value);
            } else {
                metrics::counter!("rswp_record_cache_misses_total").increment(1);
            }
        }
        found
    }

    async fn set(&self, key: String, value: String) {
        self.cache.insert(key, value).await;
    }

    async fn set_multi(&self, entries: Vec<(String, String)>) {
        for (key, value) in entries {
            self.cache.insert(key, value).await;
        }
    }
}

/// Registers record cache metrics descriptions.
///
/// Call once at startup to register human-readable descriptions with the
/// metrics recorder. This is optional but improves exported metadata.
pub fn register_record_cache_metrics() {
    metrics::describe_counter!(
        "rswp_record_cache_hits_total",
        "Total number of record cache hits"
    );
    metrics::describe_counter!(
        "rswp_record_cache_misses_total",
        "Total number of record cache misses"
    );
}
