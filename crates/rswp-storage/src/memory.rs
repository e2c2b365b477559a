//! In-memory storage implementation for testing.
//!
//! Interprets the same query semantics as the SQL builders over seeded
//! maps, so reader-level behavior can be tested without a database. A
//! fetch counter exposes how often the backing records were touched,
//! which cache tests assert on.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;

use crate::cursor::decode_cursor;
use crate::error::{StorageError, StorageResult};
use crate::query::{sanitize_order_column, search_tokens};
use crate::traits::ContentStore;
use crate::types::{
    IdCursorRow, MenuLocation, Object, ObjectQuery, PageCrumb, PostRoute, Taxonomy, Term,
    TermQuery, User, UserQuery,
};

/// In-memory implementation of ContentStore.
///
/// Uses DashMap for thread-safe concurrent access without locks. Queries
/// are linear scans; this store exists for tests, not production.
#[derive(Debug, Default)]
pub struct MemoryContentStore {
    terms: DashMap<i64, Term>,
    objects: DashMap<i64, Object>,
    users: DashMap<i64, User>,
    /// Metadata rows keyed by object id.
    meta: DashMap<i64, HashMap<String, String>>,
    /// Term attachments keyed by object id.
    object_terms: DashMap<i64, HashSet<i64>>,
    options: DashMap<String, String>,
    /// Counts calls that touch record rows (terms, objects, users).
    record_fetches: AtomicUsize,
}

impl MemoryContentStore {
    /// Creates a new empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new in-memory store wrapped in Arc.
    pub fn new_shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    // Seeding

    pub fn insert_term(&self, term: Term) {
        self.terms.insert(term.id, term);
    }

    pub fn insert_object(&self, object: Object) {
        self.objects.insert(object.id, object);
    }

    pub fn insert_user(&self, user: User) {
        self.users.insert(user.id, user);
    }

    pub fn set_meta(&self, object_id: i64, key: &str, value: &str) {
        self.meta
            .entry(object_id)
            .or_default()
            .insert(key.to_string(), value.to_string());
    }

    /// Attaches a term to an object.
    pub fn relate(&self, object_id: i64, term_id: i64) {
        self.object_terms.entry(object_id).or_default().insert(term_id);
    }

    pub fn set_option(&self, name: &str, value: &str) {
        self.options.insert(name.to_string(), value.to_string());
    }

    /// Number of record-fetching calls made so far. Cache tests use this
    /// to prove a fully-warm read never reaches the store.
    pub fn record_fetch_count(&self) -> usize {
        self.record_fetches.load(Ordering::SeqCst)
    }

    fn count_fetch(&self) {
        self.record_fetches.fetch_add(1, Ordering::SeqCst);
    }

    /// Ids of terms in one taxonomy attached to the object.
    fn attached_ids(&self, object_id: i64, taxonomy: &Taxonomy) -> HashSet<i64> {
        let Some(attached) = self.object_terms.get(&object_id) else {
            return HashSet::new();
        };
        attached
            .iter()
            .filter(|id| {
                self.terms
                    .get(id)
                    .is_some_and(|term| term.taxonomy == *taxonomy)
            })
            .copied()
            .collect()
    }

    /// Slugs of terms in one taxonomy attached to the object.
    fn attached_slugs(&self, object_id: i64, taxonomy: &Taxonomy) -> HashSet<String> {
        self.attached_ids(object_id, taxonomy)
            .iter()
            .filter_map(|id| self.terms.get(id).map(|term| term.slug.clone()))
            .collect()
    }

    fn matches_object(&self, object: &Object, q: &ObjectQuery) -> bool {
        if let Some(ref kind) = q.post_type {
            if object.kind != *kind {
                return false;
            }
        }
        if let Some(status) = q.post_status {
            if object.status != Some(status) {
                return false;
            }
        }

        if !axis_i64(object.author_id, q.author, &q.author_in, &q.author_not_in) {
            return false;
        }

        let author_slug = self
            .users
            .get(&object.author_id)
            .map(|user| user.slug.clone())
            .unwrap_or_default();
        if !axis_str(&author_slug, &q.author_slug, &q.author_slug_in, &q.author_slug_not_in) {
            return false;
        }

        let categories = self.attached_ids(object.id, &Taxonomy::Category);
        let category_ok = if q.category == 0 && !q.category_and.is_empty() {
            q.category_and
                .iter()
                .filter(|group| !group.is_empty())
                .all(|group| group.iter().any(|id| categories.contains(id)))
        } else {
            membership_i64(&categories, q.category, &[], &q.category_in, &q.category_not_in)
        };
        if !category_ok {
            return false;
        }

        let menus = self.attached_ids(object.id, &Taxonomy::NavMenu);
        if !membership_i64(&menus, q.menu_id, &q.menu_id_and, &q.menu_id_in, &q.menu_id_not_in) {
            return false;
        }
        let menu_slugs = self.attached_slugs(object.id, &Taxonomy::NavMenu);
        if !membership_str(&menu_slugs, &q.menu_slug, &[], &q.menu_slug_in, &q.menu_slug_not_in) {
            return false;
        }

        let meta = self.meta.get(&object.id);
        let meta_matches = |constraint: &String| match meta.as_deref() {
            Some(rows) => match constraint.split_once('=') {
                Some((key, value)) => rows.get(key).is_some_and(|v| v == value),
                None => rows.contains_key(constraint.as_str()),
            },
            None => false,
        };
        if !q.meta.is_empty() {
            if !meta_matches(&q.meta) {
                return false;
            }
        } else if !q.meta_and.is_empty() {
            if !q.meta_and.iter().all(meta_matches) {
                return false;
            }
        } else if !q.meta_in.is_empty() {
            if !q.meta_in.iter().any(meta_matches) {
                return false;
            }
        } else if !q.meta_not_in.is_empty() {
            if q.meta_not_in.iter().any(meta_matches) {
                return false;
            }
        }

        if !axis_str(&object.slug, &q.slug, &q.slug_in, &q.slug_not_in) {
            return false;
        }
        if !axis_i64(object.parent_id, q.parent, &q.parent_in, &q.parent_not_in) {
            return false;
        }
        if !axis_i64(object.id, q.id, &q.id_in, &q.id_not_in) {
            return false;
        }

        let tags = self.attached_ids(object.id, &Taxonomy::PostTag);
        if !membership_i64(&tags, q.tag, &q.tag_and, &q.tag_in, &q.tag_not_in) {
            return false;
        }
        let tag_slugs = self.attached_slugs(object.id, &Taxonomy::PostTag);
        if !membership_str(&tag_slugs, &q.tag_slug, &q.tag_slug_and, &q.tag_slug_in, &q.tag_slug_not_in) {
            return false;
        }

        if !q.search.is_empty() {
            let tokens = search_tokens(&q.search);
            if !tokens.is_empty() {
                let haystacks = [
                    object.slug.to_lowercase(),
                    object.title.to_lowercase(),
                    object.content.to_lowercase(),
                ];
                let hit = tokens.iter().any(|token| {
                    let token = token.to_lowercase();
                    haystacks.iter().any(|h| h.contains(&token))
                });
                if !hit {
                    return false;
                }
            }
        }

        use chrono::Datelike;
        if q.day > 0 && object.date.day() != q.day {
            return false;
        }
        if q.month > 0 && object.date.month() != q.month {
            return false;
        }
        if q.year > 0 && object.date.year() != q.year {
            return false;
        }
        if let Some(after_date) = q.after_date {
            if object.date <= after_date {
                return false;
            }
        }

        true
    }

    fn matches_term(&self, term: &Term, q: &TermQuery) -> bool {
        if !axis_str(&term.name, &q.name, &q.name_in, &q.name_not_in) {
            return false;
        }

        if q.object_id != 0 || !q.object_id_in.is_empty() || !q.object_id_not_in.is_empty() {
            let attached_to = |object_id: &i64| {
                self.object_terms
                    .get(object_id)
                    .is_some_and(|set| set.contains(&term.id))
            };
            if q.object_id != 0 {
                if !attached_to(&q.object_id) {
                    return false;
                }
            } else if !q.object_id_in.is_empty() {
                if !q.object_id_in.iter().any(attached_to) {
                    return false;
                }
            } else if q.object_id_not_in.iter().any(attached_to) {
                return false;
            }
        }

        if q.parent_id != 0 || !q.parent_id_in.is_empty() || !q.parent_id_not_in.is_empty() {
            if !axis_i64(term.parent, q.parent_id, &q.parent_id_in, &q.parent_id_not_in) {
                return false;
            }
        }

        if !axis_str(&term.slug, &q.slug, &q.slug_in, &q.slug_not_in) {
            return false;
        }

        if let Some(ref taxonomy) = q.taxonomy {
            if term.taxonomy != *taxonomy {
                return false;
            }
        } else if !q.taxonomy_in.is_empty() {
            if !q.taxonomy_in.contains(&term.taxonomy) {
                return false;
            }
        } else if q.taxonomy_not_in.contains(&term.taxonomy) {
            return false;
        }

        axis_i64(term.id, q.id, &q.id_in, &q.id_not_in)
    }
}

/// Exact > in > not-in precedence for an integer axis; 0 means unset.
fn axis_i64(value: i64, exact: i64, set_in: &[i64], set_not_in: &[i64]) -> bool {
    if exact != 0 {
        value == exact
    } else if !set_in.is_empty() {
        set_in.contains(&value)
    } else if !set_not_in.is_empty() {
        !set_not_in.contains(&value)
    } else {
        true
    }
}

/// Exact > in > not-in precedence for a string axis; empty means unset.
fn axis_str(value: &str, exact: &str, set_in: &[String], set_not_in: &[String]) -> bool {
    if !exact.is_empty() {
        value == exact
    } else if !set_in.is_empty() {
        set_in.iter().any(|v| v == value)
    } else if !set_not_in.is_empty() {
        !set_not_in.iter().any(|v| v == value)
    } else {
        true
    }
}

/// Exact > and > in > not-in precedence for a term membership axis.
fn membership_i64(attached: &HashSet<i64>, exact: i64, set_and: &[i64], set_in: &[i64], set_not_in: &[i64]) -> bool {
    if exact != 0 {
        attached.contains(&exact)
    } else if !set_and.is_empty() {
        set_and.iter().all(|id| attached.contains(id))
    } else if !set_in.is_empty() {
        set_in.iter().any(|id| attached.contains(id))
    } else if !set_not_in.is_empty() {
        !set_not_in.iter().any(|id| attached.contains(id))
    } else {
        true
    }
}

fn membership_str(
    attached: &HashSet<String>,
    exact: &str,
    set_and: &[String],
    set_in: &[String],
    set_not_in: &[String],
) -> bool {
    if !exact.is_empty() {
        attached.contains(exact)
    } else if !set_and.is_empty() {
        set_and.iter().all(|slug| attached.contains(slug))
    } else if !set_in.is_empty() {
        set_in.iter().any(|slug| attached.contains(slug))
    } else if !set_not_in.is_empty() {
        !set_not_in.iter().any(|slug| attached.contains(slug))
    } else {
        true
    }
}

/// Orders, applies the cursor, and truncates a list of candidate rows,
/// mirroring the SQL builders' ORDER BY / cursor / LIMIT behavior.
fn page(mut rows: Vec<IdCursorRow>, numeric: bool, ascending: bool, after: &str, limit: i64) -> Vec<IdCursorRow> {
    let key = |row: &IdCursorRow| -> (i64, String) {
        if numeric {
            (row.order_value.parse().unwrap_or(0), String::new())
        } else {
            (0, row.order_value.clone())
        }
    };

    rows.sort_by(|a, b| {
        let ord = key(a).cmp(&key(b)).then_with(|| a.id.cmp(&b.id));
        if ascending {
            ord
        } else {
            ord.reverse()
        }
    });

    if !after.is_empty() {
        if let Some(value) = decode_cursor(after) {
            let boundary = IdCursorRow {
                id: 0,
                order_value: value,
            };
            let boundary = key(&boundary);
            rows.retain(|row| {
                let k = key(row);
                if ascending {
                    (k.0, k.1.as_str()) > (boundary.0, boundary.1.as_str())
                } else {
                    (k.0, k.1.as_str()) < (boundary.0, boundary.1.as_str())
                }
            });
        }
    }

    let limit = if limit == 0 { 10 } else { limit };
    if limit > 0 {
        rows.truncate(limit as usize);
    }
    rows
}

fn object_order_value(object: &Object, order: &str) -> String {
    match order {
        "ID" => object.id.to_string(),
        "menu_order" => object.menu_order.to_string(),
        "post_modified" => object.modified.format("%Y-%m-%d %H:%M:%S").to_string(),
        _ => object.date.format("%Y-%m-%d %H:%M:%S").to_string(),
    }
}

#[async_trait]
impl ContentStore for MemoryContentStore {
    async fn get_terms(&self, ids: &[i64]) -> StorageResult<Vec<Term>> {
        self.count_fetch();
        Ok(ids
            .iter()
            .filter_map(|id| self.terms.get(id).map(|t| t.clone()))
            .collect())
    }

    async fn get_objects(&self, ids: &[i64]) -> StorageResult<Vec<Object>> {
        self.count_fetch();
        Ok(ids
            .iter()
            .filter_map(|id| self.objects.get(id).map(|o| o.clone()))
            .collect())
    }

    async fn get_users(&self, ids: &[i64]) -> StorageResult<Vec<User>> {
        self.count_fetch();
        Ok(ids
            .iter()
            .filter_map(|id| self.users.get(id).map(|u| u.clone()))
            .collect())
    }

    async fn get_object_meta(&self, object_id: i64) -> StorageResult<HashMap<String, String>> {
        Ok(self
            .meta
            .get(&object_id)
            .map(|rows| rows.clone())
            .unwrap_or_default())
    }

    async fn get_object_meta_batch(
        &self,
        object_ids: &[i64],
    ) -> StorageResult<HashMap<i64, HashMap<String, String>>> {
        Ok(object_ids
            .iter()
            .map(|id| {
                (
                    *id,
                    self.meta.get(id).map(|rows| rows.clone()).unwrap_or_default(),
                )
            })
            .collect())
    }

    async fn query_objects(&self, query: &ObjectQuery) -> StorageResult<Vec<IdCursorRow>> {
        let order = sanitize_order_column(&query.order, "post_date");
        let numeric = matches!(order.as_str(), "ID" | "menu_order");

        let rows = self
            .objects
            .iter()
            .filter(|object| self.matches_object(object, query))
            .map(|object| IdCursorRow {
                id: object.id,
                order_value: object_order_value(&object, &order),
            })
            .collect();

        Ok(page(rows, numeric, query.order_ascending, &query.after, query.limit))
    }

    async fn query_terms(&self, query: &TermQuery) -> StorageResult<Vec<IdCursorRow>> {
        let ascending = query.order.is_empty() || query.order_ascending;

        let rows = self
            .terms
            .iter()
            .filter(|term| self.matches_term(term, query))
            .map(|term| IdCursorRow {
                id: term.id,
                order_value: term.id.to_string(),
            })
            .collect();

        Ok(page(rows, true, ascending, &query.after, query.limit))
    }

    async fn query_users(&self, query: &UserQuery) -> StorageResult<Vec<IdCursorRow>> {
        let rows = self
            .users
            .iter()
            .filter(|user| {
                axis_i64(user.id, query.id, &query.id_in, &query.id_not_in)
                    && axis_str(&user.slug, &query.slug, &query.slug_in, &query.slug_not_in)
            })
            .map(|user| IdCursorRow {
                id: user.id,
                order_value: user.id.to_string(),
            })
            .collect();

        Ok(page(rows, true, true, &query.after, query.limit))
    }

    async fn term_children(&self, parent_id: i64) -> StorageResult<Vec<i64>> {
        let mut ids: Vec<i64> = self
            .terms
            .iter()
            .filter(|term| term.parent == parent_id)
            .map(|term| term.id)
            .collect();
        ids.sort_unstable();
        Ok(ids)
    }

    async fn page_chain(&self, page_id: i64) -> StorageResult<Vec<PageCrumb>> {
        let mut chain = Vec::new();
        let mut current = page_id;

        while current != 0 {
            if chain.len() >= 25 {
                return Err(StorageError::InternalError {
                    message: format!("page parent chain from {} exceeds depth limit", page_id),
                });
            }

            let Some(object) = self.objects.get(&current) else { break };
            let crumb = PageCrumb {
                title: object.title.clone(),
                slug: object.slug.clone(),
                parent_id: object.parent_id,
            };
            current = crumb.parent_id;
            chain.push(crumb);
        }

        Ok(chain)
    }

    async fn menu_locations(&self) -> StorageResult<Vec<MenuLocation>> {
        let mut locations: Vec<MenuLocation> = self
            .terms
            .iter()
            .filter(|term| term.taxonomy == Taxonomy::NavMenu)
            .map(|term| MenuLocation {
                id: term.id,
                name: term.name.clone(),
                slug: term.slug.clone(),
            })
            .collect();
        locations.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(locations)
    }

    async fn post_route(&self, post_id: i64) -> StorageResult<Option<PostRoute>> {
        use chrono::Datelike;
        Ok(self.objects.get(&post_id).map(|object| PostRoute {
            year: object.date.year(),
            month: object.date.month(),
            title: object.title.clone(),
            slug: object.slug.clone(),
        }))
    }

    async fn site_option(&self, name: &str) -> StorageResult<Option<String>> {
        Ok(self.options.get(name).map(|v| v.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cursor::encode_cursor;
    use crate::types::{PostStatus, PostType};
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> chrono::NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    fn object(id: i64, slug: &str, published: chrono::NaiveDateTime) -> Object {
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

    fn term(id: i64, slug: &str, taxonomy: Taxonomy, parent: i64) -> Term {
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

    #[tokio::test]
    async fn test_get_objects_skips_missing_ids_and_counts_fetches() {
        let store = MemoryContentStore::new();
        store.insert_object(object(1, "one", date(2024, 1, 1)));

        let found = store.get_objects(&[1, 404]).await.unwrap();

        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, 1);
        assert_eq!(store.record_fetch_count(), 1);
    }

    #[tokio::test]
    async fn test_query_objects_default_order_is_newest_first() {
        let store = MemoryContentStore::new();
        store.insert_object(object(1, "old", date(2024, 1, 1)));
        store.insert_object(object(2, "new", date(2024, 6, 1)));

        let rows = store.query_objects(&ObjectQuery::default()).await.unwrap();

        assert_eq!(rows.iter().map(|r| r.id).collect::<Vec<_>>(), vec![2, 1]);
    }

    #[tokio::test]
    async fn test_query_objects_cursor_pages_without_overlap() {
        let store = MemoryContentStore::new();
        for (id, month) in [(1, 1), (2, 2), (3, 3), (4, 4)] {
            store.insert_object(object(id, "p", date(2024, month, 1)));
        }

        let first = store
            .query_objects(&ObjectQuery { limit: 2, ..Default::default() })
            .await
            .unwrap();
        assert_eq!(first.iter().map(|r| r.id).collect::<Vec<_>>(), vec![4, 3]);

        let after = encode_cursor(&first[1].order_value);
        let second = store
            .query_objects(&ObjectQuery { limit: 2, after, ..Default::default() })
            .await
            .unwrap();
        assert_eq!(second.iter().map(|r| r.id).collect::<Vec<_>>(), vec![2, 1]);
    }

    #[tokio::test]
    async fn test_query_objects_category_membership() {
        let store = MemoryContentStore::new();
        store.insert_term(term(10, "news", Taxonomy::Category, 0));
        store.insert_object(object(1, "in-news", date(2024, 1, 1)));
        store.insert_object(object(2, "uncategorized", date(2024, 1, 2)));
        store.relate(1, 10);

        let rows = store
            .query_objects(&ObjectQuery { category_in: vec![10], ..Default::default() })
            .await
            .unwrap();

        assert_eq!(rows.iter().map(|r| r.id).collect::<Vec<_>>(), vec![1]);
    }

    #[tokio::test]
    async fn test_query_objects_meta_key_value_constraint() {
        let store = MemoryContentStore::new();
        store.insert_object(object(1, "red", date(2024, 1, 1)));
        store.insert_object(object(2, "blue", date(2024, 1, 2)));
        store.set_meta(1, "color", "red");
        store.set_meta(2, "color", "blue");

        let rows = store
            .query_objects(&ObjectQuery {
                meta_in: vec!["color=red".to_string()],
                ..Default::default()
            })
            .await
            .unwrap();

        assert_eq!(rows.iter().map(|r| r.id).collect::<Vec<_>>(), vec![1]);
    }

    #[tokio::test]
    async fn test_query_objects_search_matches_title_case_insensitively() {
        let store = MemoryContentStore::new();
        let mut hit = object(1, "about-rust", date(2024, 1, 1));
        hit.title = "About Rust".to_string();
        store.insert_object(hit);
        store.insert_object(object(2, "other", date(2024, 1, 2)));

        let rows = store
            .query_objects(&ObjectQuery { search: "rust".to_string(), ..Default::default() })
            .await
            .unwrap();

        assert_eq!(rows.iter().map(|r| r.id).collect::<Vec<_>>(), vec![1]);
    }

    #[tokio::test]
    async fn test_query_terms_by_parent_and_taxonomy() {
        let store = MemoryContentStore::new();
        store.insert_term(term(1, "root", Taxonomy::Category, 0));
        store.insert_term(term(2, "child-a", Taxonomy::Category, 1));
        store.insert_term(term(3, "child-b", Taxonomy::Category, 1));
        store.insert_term(term(4, "tag", Taxonomy::PostTag, 0));

        let rows = store
            .query_terms(&TermQuery {
                parent_id: 1,
                taxonomy: Some(Taxonomy::Category),
                ..Default::default()
            })
            .await
            .unwrap();

        assert_eq!(rows.iter().map(|r| r.id).collect::<Vec<_>>(), vec![2, 3]);
    }

    #[tokio::test]
    async fn test_term_children_are_direct_only() {
        let store = MemoryContentStore::new();
        store.insert_term(term(1, "root", Taxonomy::Category, 0));
        store.insert_term(term(2, "child", Taxonomy::Category, 1));
        store.insert_term(term(3, "grandchild", Taxonomy::Category, 2));

        assert_eq!(store.term_children(1).await.unwrap(), vec![2]);
    }

    #[tokio::test]
    async fn test_page_chain_walks_to_root() {
        let store = MemoryContentStore::new();
        let mut root = object(1, "root", date(2024, 1, 1));
        root.kind = PostType::Page;
        let mut child = object(2, "child", date(2024, 1, 2));
        child.kind = PostType::Page;
        child.parent_id = 1;
        store.insert_object(root);
        store.insert_object(child);

        let chain = store.page_chain(2).await.unwrap();

        let slugs: Vec<_> = chain.iter().map(|c| c.slug.as_str()).collect();
        assert_eq!(slugs, vec!["child", "root"]);
    }

    #[tokio::test]
    async fn test_page_chain_errors_on_cycle() {
        let store = MemoryContentStore::new();
        let mut a = object(1, "a", date(2024, 1, 1));
        a.parent_id = 2;
        let mut b = object(2, "b", date(2024, 1, 1));
        b.parent_id = 1;
        store.insert_object(a);
        store.insert_object(b);

        let err = store.page_chain(1).await.unwrap_err();
        assert!(matches!(err, StorageError::InternalError { .. }));
    }

    #[tokio::test]
    async fn test_site_option_round_trips() {
        let store = MemoryContentStore::new();
        store.set_option("siteurl", "https://example.com");

        assert_eq!(
            store.site_option("siteurl").await.unwrap().as_deref(),
            Some("https://example.com")
        );
        assert_eq!(store.site_option("missing").await.unwrap(), None);
    }
}
