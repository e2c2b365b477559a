//! The content reader: cache-aside record assembly over a ContentStore.
//!
//! `ContentReader` is the crate's main entry point. Every record fetch
//! follows the same shape: collapse the requested ids, serve what the
//! cache holds, assemble the rest from the store, write the fresh records
//! back off the read path, and return results positionally aligned with
//! the request.
//!
//! # Architecture Decisions
//!
//! - **Cache-aside, not write-through**: the reader never blocks on cache
//!   writes. Write-backs run on a spawned task whose handle the read path
//!   drops.
//! - **Cycle Detection**: category parent chains track visited ids.
//! - **Depth Limiting**: parent-chain walks stop at a configurable depth
//!   (default 25) so corrupt hierarchies cannot hang a request.

mod menus;
mod posts;
mod terms;
mod users;

#[cfg(test)]
mod tests;

pub use menus::MenuRef;
pub use posts::PostTransform;

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;

use rswp_storage::ContentStore;

use crate::cache::{
    encode_record, load_batch, spawn_write_back, MemoryRecordCache, RecordCache,
    RecordCacheConfig,
};
use crate::dedupe::dedupe;
use crate::error::{DomainError, DomainResult};

/// Type alias for boxed future to handle async recursion.
pub(crate) type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Configuration for the content reader.
#[derive(Debug, Clone)]
pub struct ReaderConfig {
    /// Whether record reads consult the cache at all.
    pub cache_enabled: bool,
    /// Maximum depth for category parent-chain walks.
    pub max_parent_depth: u32,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            cache_enabled: true,
            max_parent_depth: 25,
        }
    }
}

impl ReaderConfig {
    /// Enables or disables cache reads.
    pub fn with_cache_enabled(mut self, enabled: bool) -> Self {
        self.cache_enabled = enabled;
        self
    }

    /// Sets the maximum parent-chain depth.
    pub fn with_max_parent_depth(mut self, max_parent_depth: u32) -> Self {
        self.max_parent_depth = max_parent_depth;
        self
    }
}

/// Read-oriented access layer over a content store.
///
/// Cloning is cheap; all state is behind `Arc`.
pub struct ContentReader<S> {
    pub(crate) store: Arc<S>,
    pub(crate) cache: Arc<dyn RecordCache>,
    pub(crate) config: ReaderConfig,
}

impl<S> Clone for ContentReader<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            cache: Arc::clone(&self.cache),
            config: self.config.clone(),
        }
    }
}

impl<S> std::fmt::Debug for ContentReader<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContentReader")
            .field("config", &self.config)
            .finish()
    }
}

impl<S: ContentStore> ContentReader<S> {
    /// Creates a reader over the given store and cache.
    pub fn new(store: Arc<S>, cache: Arc<dyn RecordCache>, config: ReaderConfig) -> Self {
        Self {
            store,
            cache,
            config,
        }
    }

    /// Creates a reader with an in-process cache and default configuration.
    pub fn with_memory_cache(store: Arc<S>) -> Self {
        Self::new(
            store,
            Arc::new(MemoryRecordCache::new(RecordCacheConfig::default())),
            ReaderConfig::default(),
        )
    }

    /// Reads a single site option.
    pub async fn site_option(&self, name: &str) -> DomainResult<Option<String>> {
        Ok(self.store.site_option(name).await?)
    }

    /// The cache-aside spine shared by every record kind.
    ///
    /// Serves what it can from the cache, asks `build` to assemble the
    /// rest from the store (keyed by id), schedules a write-back for the
    /// fresh records, and returns one record per requested id in request
    /// order. Ids that neither layer can produce fail the whole call with
    /// [`DomainError::MissingRecords`] naming exactly those ids.
    pub(crate) async fn resolve_batch<T, F, Fut>(
        &self,
        prefix: &str,
        ids: &[i64],
        build: F,
    ) -> DomainResult<Vec<T>>
    where
        T: Serialize + DeserializeOwned + Clone,
        F: FnOnce(Vec<i64>) -> Fut,
        Fut: Future<Output = DomainResult<HashMap<i64, T>>>,
    {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut outcome = if self.config.cache_enabled {
            load_batch::<T>(self.cache.as_ref(), prefix, ids).await
        } else {
            cold_outcome(prefix, ids)
        };

        if !outcome.complete() {
            let wanted: Vec<i64> = outcome.missing.iter().map(|m| m.id).collect();
            let mut built = build(wanted).await?;

            let mut write_back = Vec::new();
            let mut absent = Vec::new();
            for miss in &outcome.missing {
                match built.remove(&miss.id) {
                    Some(record) => {
                        if self.config.cache_enabled {
                            write_back.extend(encode_record(&miss.key, &record));
                        }
                        for &pos in &miss.positions {
                            outcome.records[pos] = Some(record.clone());
                        }
                    }
                    None => absent.push(miss.id),
                }
            }

            if !write_back.is_empty() {
                // Fire-and-forget; tests hold the cache and poll instead.
                drop(spawn_write_back(Arc::clone(&self.cache), write_back));
            }

            if !absent.is_empty() {
                return Err(DomainError::MissingRecords { ids: absent });
            }
        }

        Ok(outcome.records.into_iter().flatten().collect())
    }
}

/// A batch outcome where every id is a miss, used when the cache is off.
fn cold_outcome<T>(prefix: &str, ids: &[i64]) -> crate::cache::BatchOutcome<T> {
    let (unique, positions) = dedupe(ids);
    let mut records = Vec::new();
    records.resize_with(ids.len(), || None);

    let missing = unique
        .into_iter()
        .map(|id| crate::cache::MissingRecord {
            id,
            key: crate::cache::record_key(prefix, id),
            positions: positions[&id].clone(),
        })
        .collect();

    crate::cache::BatchOutcome { records, missing }
}
