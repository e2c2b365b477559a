//! Batched cache-aside loading.
//!
//! `load_batch` resolves a positional id list against the cache in one
//! multi-get, fanning duplicate ids out from a single lookup, and reports
//! exactly which ids still need a store fetch and where their records
//! belong in the caller's result.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::task::JoinHandle;
use tracing::warn;

use crate::dedupe::dedupe;

use super::RecordCache;

/// The cache key for one record: per-kind prefix plus the id.
pub fn record_key(prefix: &str, id: i64) -> String {
    format!("{prefix}{id}")
}

/// An id the cache could not serve.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingRecord {
    pub id: i64,
    /// The cache key a freshly fetched record should be written back under.
    pub key: String,
    /// Every position in the original request list this id occupied.
    pub positions: Vec<usize>,
}

/// The outcome of a batched cache lookup.
#[derive(Debug)]
pub struct BatchOutcome<T> {
    /// One slot per requested id, in request order. `None` marks a slot
    /// the store still has to fill.
    pub records: Vec<Option<T>>,
    /// The unique ids that missed, with their write-back keys and slots.
    pub missing: Vec<MissingRecord>,
}

impl<T> BatchOutcome<T> {
    /// True when the cache served every slot.
    pub fn complete(&self) -> bool {
        self.missing.is_empty()
    }
}

/// Resolves `ids` against the cache in a single multi-get.
///
/// Duplicate ids are looked up once and cloned into every slot they
/// occupy. An entry that fails to decode is treated as a miss rather than
/// an error; the store re-fetch will overwrite it.
pub async fn load_batch<T>(cache: &dyn RecordCache, prefix: &str, ids: &[i64]) -> BatchOutcome<T>
where
    T: DeserializeOwned + Clone,
{
    let mut records: Vec<Option<T>> = Vec::new();
    records.resize_with(ids.len(), || None);

    let (unique, positions) = dedupe(ids);
    let keys: Vec<String> = unique.iter().map(|id| record_key(prefix, *id)).collect();
    let found = cache.get_multi(&keys).await;

    let mut missing = Vec::new();
    for (id, key) in unique.into_iter().zip(keys) {
        let decoded: Option<T> = found.get(&key).and_then(|blob| {
            serde_json::from_str(blob)
                .map_err(|e| warn!(key = %key, error = %e, "discarding undecodable cache entry"))
                .ok()
        });

        match decoded {
            Some(record) => {
                for &pos in &positions[&id] {
                    records[pos] = Some(record.clone());
                }
            }
            None => missing.push(MissingRecord {
                id,
                key,
                positions: positions[&id].clone(),
            }),
        }
    }

    BatchOutcome { records, missing }
}

/// Encodes a record for write-back. Encoding failures are logged and
/// skipped; the record just stays uncached.
pub fn encode_record<T: Serialize>(key: &str, record: &T) -> Option<(String, String)> {
    match serde_json::to_string(record) {
        Ok(blob) => Some((key.to_string(), blob)),
        Err(e) => {
            warn!(key = %key, error = %e, "failed to encode record for cache");
            None
        }
    }
}

/// Writes freshly fetched records back to the cache off the read path.
///
/// The returned handle lets tests await completion; readers drop it.
pub fn spawn_write_back(
    cache: Arc<dyn RecordCache>,
    entries: Vec<(String, String)>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        if !entries.is_empty() {
            cache.set_multi(entries).await;
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{MemoryRecordCache, RecordCacheConfig};
    use serde::Deserialize;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Rec {
        id: i64,
    }

    async fn seeded(entries: &[(i64, i64)]) -> Arc<MemoryRecordCache> {
        let cache = Arc::new(MemoryRecordCache::new(RecordCacheConfig::default()));
        for (key_id, rec_id) in entries {
            let (key, blob) = encode_record(&record_key("wp_rec_", *key_id), &Rec { id: *rec_id })
                .expect("encode");
            cache.set(key, blob).await;
        }
        cache
    }

    #[test]
    fn test_record_key_concatenates_prefix_and_id() {
        assert_eq!(record_key("wp_term_", 5), "wp_term_5");
    }

    #[tokio::test]
    async fn test_full_hit_fills_every_slot() {
        let cache = seeded(&[(1, 1), (2, 2)]).await;

        let outcome: BatchOutcome<Rec> = load_batch(cache.as_ref(), "wp_rec_", &[1, 2, 1]).await;

        assert!(outcome.complete());
        let ids: Vec<i64> = outcome
            .records
            .iter()
            .map(|r| r.as_ref().expect("slot").id)
            .collect();
        assert_eq!(ids, vec![1, 2, 1]);
    }

    #[tokio::test]
    async fn test_miss_reports_key_and_positions() {
        let cache = seeded(&[(1, 1)]).await;

        let outcome: BatchOutcome<Rec> = load_batch(cache.as_ref(), "wp_rec_", &[9, 1, 9]).await;

        assert_eq!(outcome.records[1].as_ref().map(|r| r.id), Some(1));
        assert!(outcome.records[0].is_none());
        assert!(outcome.records[2].is_none());
        assert_eq!(
            outcome.missing,
            vec![MissingRecord {
                id: 9,
                key: "wp_rec_9".to_string(),
                positions: vec![0, 2],
            }]
        );
    }

    #[tokio::test]
    async fn test_undecodable_entry_is_a_miss() {
        let cache = Arc::new(MemoryRecordCache::new(RecordCacheConfig::default()));
        cache
            .set("wp_rec_1".to_string(), "not json".to_string())
            .await;

        let outcome: BatchOutcome<Rec> = load_batch(cache.as_ref(), "wp_rec_", &[1]).await;

        assert!(outcome.records[0].is_none());
        assert_eq!(outcome.missing.len(), 1);
    }

    #[tokio::test]
    async fn test_duplicate_ids_are_looked_up_once() {
        let cache = seeded(&[(7, 7)]).await;

        let outcome: BatchOutcome<Rec> =
            load_batch(cache.as_ref(), "wp_rec_", &[7, 7, 7, 7]).await;

        assert!(outcome.complete());
        assert_eq!(outcome.records.len(), 4);
    }

    #[tokio::test]
    async fn test_write_back_lands_in_cache() {
        let cache: Arc<MemoryRecordCache> =
            Arc::new(MemoryRecordCache::new(RecordCacheConfig::default()));
        let entry = encode_record("wp_rec_3", &Rec { id: 3 }).expect("encode");

        spawn_write_back(cache.clone(), vec![entry])
            .await
            .expect("join");

        let outcome: BatchOutcome<Rec> = load_batch(cache.as_ref(), "wp_rec_", &[3]).await;
        assert!(outcome.complete());
    }
}
