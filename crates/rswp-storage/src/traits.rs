//! ContentStore trait definition.

use std::collections::HashMap;

use async_trait::async_trait;

use crate::error::StorageResult;
use crate::types::{
    IdCursorRow, MenuLocation, Object, ObjectQuery, PageCrumb, PostRoute, Term, TermQuery, User,
    UserQuery,
};

/// Abstract read interface over the content schema.
///
/// Implementations must be thread-safe (Send + Sync) and support
/// async operations. All operations are reads; callers layer caching
/// and assembly on top.
#[async_trait]
pub trait ContentStore: Send + Sync + 'static {
    // Record fetches

    /// Fetches terms by id. Missing ids are simply absent from the result;
    /// row order is not significant.
    async fn get_terms(&self, ids: &[i64]) -> StorageResult<Vec<Term>>;

    /// Fetches objects by id. Missing ids are simply absent from the result.
    async fn get_objects(&self, ids: &[i64]) -> StorageResult<Vec<Object>>;

    /// Fetches users by id. Missing ids are simply absent from the result.
    async fn get_users(&self, ids: &[i64]) -> StorageResult<Vec<User>>;

    /// Fetches all metadata rows for one object. Duplicate keys keep the
    /// last row read.
    async fn get_object_meta(&self, object_id: i64) -> StorageResult<HashMap<String, String>>;

    /// Fetches metadata for a batch of objects in one round trip, keyed by
    /// object id. Objects with no metadata map to an empty entry.
    async fn get_object_meta_batch(
        &self,
        object_ids: &[i64],
    ) -> StorageResult<HashMap<i64, HashMap<String, String>>>;

    // Filtered id queries

    /// Runs the object query and returns matching ids with their raw
    /// ordering values, in query order.
    async fn query_objects(&self, query: &ObjectQuery) -> StorageResult<Vec<IdCursorRow>>;

    /// Runs the term query and returns matching ids with their raw
    /// ordering values, in query order.
    async fn query_terms(&self, query: &TermQuery) -> StorageResult<Vec<IdCursorRow>>;

    /// Runs the user query and returns matching ids with their raw
    /// ordering values, in ascending id order.
    async fn query_users(&self, query: &UserQuery) -> StorageResult<Vec<IdCursorRow>>;

    // Hierarchy

    /// Returns the ids of terms whose parent is the given term, in
    /// ascending id order.
    async fn term_children(&self, parent_id: i64) -> StorageResult<Vec<i64>>;

    /// Returns the breadcrumb rows (title, slug, parent) walking up from
    /// the given page to the root, nearest ancestor first.
    async fn page_chain(&self, page_id: i64) -> StorageResult<Vec<PageCrumb>>;

    // Site structure

    /// Returns the registered menu locations with their assigned menu ids.
    async fn menu_locations(&self) -> StorageResult<Vec<MenuLocation>>;

    /// Returns the date and slug parts needed to build a post permalink.
    async fn post_route(&self, post_id: i64) -> StorageResult<Option<PostRoute>>;

    /// Reads a single site option by name.
    async fn site_option(&self, name: &str) -> StorageResult<Option<String>>;
}
