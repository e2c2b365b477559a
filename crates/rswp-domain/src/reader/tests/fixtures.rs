//! Shared fixtures for reader tests.

use std::sync::Arc;
use std::time::Duration;

use chrono::{NaiveDate, NaiveDateTime};

use rswp_storage::{MemoryContentStore, Object, PostStatus, PostType, Taxonomy, Term, User};

use crate::cache::{MemoryRecordCache, RecordCacheConfig};
use crate::reader::{ContentReader, ReaderConfig};

pub fn date(y: i32, m: u32, d: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .expect("valid date")
        .and_hms_opt(12, 0, 0)
        .expect("valid time")
}

pub fn term(id: i64, slug: &str, taxonomy: Taxonomy, parent: i64) -> Term {
    Term {
        id,
        name: slug.to_string(),
        slug: slug.to_string(),
        group: 0,
        taxonomy_id: id,
        taxonomy,
        description: String::new(),
        parent,
        count: 0,
    }
}

pub fn post(id: i64, slug: &str, published: NaiveDateTime) -> Object {
    Object {
        id,
        author_id: 1,
        date: published,
        date_gmt: published,
        content: String::new(),
        title: slug.to_string(),
        excerpt: String::new(),
        status: Some(PostStatus::Publish),
        comment_status: true,
        ping_status: true,
        password: String::new(),
        slug: slug.to_string(),
        to_ping: Vec::new(),
        pinged: Vec::new(),
        modified: published,
        modified_gmt: published,
        parent_id: 0,
        guid: String::new(),
        menu_order: 0,
        kind: PostType::Post,
        mime_type: String::new(),
        comment_count: 0,
    }
}

pub fn user(id: i64, slug: &str, email: &str) -> User {
    User {
        id,
        slug: slug.to_string(),
        name: slug.to_string(),
        description: String::new(),
        email: email.to_string(),
        website: String::new(),
        registered: date(2020, 1, 1),
    }
}

/// A reader over a fresh memory store and cache, both exposed so tests
/// can seed records and observe cache contents.
pub struct Harness {
    pub store: Arc<MemoryContentStore>,
    pub cache: Arc<MemoryRecordCache>,
    pub reader: ContentReader<MemoryContentStore>,
}

pub fn harness() -> Harness {
    harness_with(ReaderConfig::default())
}

pub fn harness_with(config: ReaderConfig) -> Harness {
    let store = MemoryContentStore::new_shared();
    let cache = Arc::new(MemoryRecordCache::new(RecordCacheConfig::default()));
    let reader = ContentReader::new(Arc::clone(&store), cache.clone(), config);
    Harness {
        store,
        cache,
        reader,
    }
}

/// Polls until the cache holds `key` or the deadline passes. Write-backs
/// run on a spawned task, so tests wait rather than assume ordering.
pub async fn await_cached(cache: &MemoryRecordCache, key: &str) {
    use crate::cache::RecordCache;

    for _ in 0..100 {
        if cache.get(key).await.is_some() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    panic!("cache entry {key} never appeared");
}
