//! Post and attachment reads.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::instrument;

use rswp_storage::{
    ContentStore, Object, ObjectQuery, PostStatus, PostType, StorageResult, Taxonomy, TermQuery,
};

use crate::error::{DomainError, DomainResult};
use crate::iter::IdIterator;
use crate::records::{keys, Attachment, Post};

use super::terms::align_rows;
use super::ContentReader;

/// A caller-supplied post rewrite, applied in order after assembly.
pub type PostTransform = Arc<dyn Fn(&mut Post) + Send + Sync>;

/// The per-post pieces fetched concurrently during assembly.
#[derive(Default)]
struct PostParts {
    meta: HashMap<String, String>,
    category_ids: Vec<i64>,
    tag_ids: Vec<i64>,
}

/// One resolved piece of a post, tagged by which lookup produced it.
enum PostPart {
    Meta(HashMap<String, String>),
    CategoryIds(Vec<i64>),
    TagIds(Vec<i64>),
}

impl<S: ContentStore> ContentReader<S> {
    /// Fetches raw object rows positionally. Uncached.
    pub async fn get_objects(&self, ids: &[i64]) -> DomainResult<Vec<Object>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        align_rows(self.store.get_objects(ids).await?, ids)
    }

    /// Fetches fully assembled posts.
    pub async fn get_posts(&self, ids: &[i64]) -> DomainResult<Vec<Post>> {
        self.resolve_batch(keys::POST, ids, |missing| async move {
            self.build_posts(&missing).await
        })
        .await
    }

    /// Fetches posts, then applies each transform in order to every post.
    ///
    /// Transforms run on the assembled result only; the cache always holds
    /// the untransformed records.
    pub async fn get_posts_with(
        &self,
        ids: &[i64],
        transforms: &[PostTransform],
    ) -> DomainResult<Vec<Post>> {
        let mut posts = self.get_posts(ids).await?;
        for post in &mut posts {
            for transform in transforms {
                transform(post);
            }
        }
        Ok(posts)
    }

    /// Fetches attachments with their file locations resolved.
    pub async fn get_attachments(&self, ids: &[i64]) -> DomainResult<Vec<Attachment>> {
        self.resolve_batch(keys::ATTACHMENT, ids, |missing| async move {
            self.build_attachments(&missing).await
        })
        .await
    }

    /// Runs a post query and returns an iterator over the matching ids.
    ///
    /// The query is normalized first: the post type defaults to `post`,
    /// the status is forced to `publish`, and category axes (numeric and
    /// slug) are expanded to their hierarchy closures. A slug axis that
    /// resolves to no category short-circuits to an empty iterator.
    #[instrument(skip(self, query))]
    pub async fn query_posts(&self, query: &ObjectQuery) -> DomainResult<IdIterator> {
        let mut query = query.clone();
        if query.post_type.is_none() {
            query.post_type = Some(PostType::Post);
        }
        query.post_status = Some(PostStatus::Publish);

        match self.expand_category_axes(query).await? {
            Some(query) => Ok(IdIterator::new(self.store.query_objects(&query).await?)),
            None => Ok(IdIterator::empty()),
        }
    }

    /// Runs an attachment query: post type `attachment`, status `inherit`.
    pub async fn query_attachments(&self, query: &ObjectQuery) -> DomainResult<IdIterator> {
        let mut query = query.clone();
        query.post_type = Some(PostType::Attachment);
        query.post_status = Some(PostStatus::Inherit);

        match self.expand_category_axes(query).await? {
            Some(query) => Ok(IdIterator::new(self.store.query_objects(&query).await?)),
            None => Ok(IdIterator::empty()),
        }
    }

    /// The dated permalink path for a post, `/{year}/{month}/{slug}`.
    pub async fn post_link(&self, post_id: i64) -> DomainResult<Option<String>> {
        let route = self.store.post_route(post_id).await?;
        Ok(route.map(|r| format!("/{}/{:02}/{}", r.year, r.month, r.slug)))
    }

    /// The hierarchical permalink path for a page, `/parent/child`.
    pub async fn page_link(&self, page_id: i64) -> DomainResult<Option<String>> {
        let chain = self.store.page_chain(page_id).await?;
        if chain.is_empty() {
            return Ok(None);
        }

        let mut link = String::new();
        for crumb in chain.iter().rev() {
            link.push('/');
            link.push_str(&crumb.slug);
        }
        Ok(Some(link))
    }

    /// Rewrites category axes into closure-expanded id sets.
    ///
    /// Returns `None` when a requested slug axis resolves to no category,
    /// which by contract yields an empty result rather than silently
    /// dropping the filter.
    async fn expand_category_axes(&self, mut q: ObjectQuery) -> DomainResult<Option<ObjectQuery>> {
        // Slug axes resolve to ids first; closure expansion follows.
        if !q.category_slug.is_empty() {
            let slug = std::mem::take(&mut q.category_slug);
            match self.category_id_by_slug(&slug).await? {
                Some(id) => q.category = id,
                None => return Ok(None),
            }
        }
        if !q.category_slug_and.is_empty() {
            for slug in std::mem::take(&mut q.category_slug_and) {
                match self.category_id_by_slug(&slug).await? {
                    Some(id) => q.category_and.push(vec![id]),
                    None => return Ok(None),
                }
            }
        }
        if !q.category_slug_in.is_empty() {
            let mut resolved = Vec::new();
            for slug in std::mem::take(&mut q.category_slug_in) {
                if let Some(id) = self.category_id_by_slug(&slug).await? {
                    resolved.push(id);
                }
            }
            if resolved.is_empty() {
                return Ok(None);
            }
            q.category_in.extend(resolved);
        }
        if !q.category_slug_not_in.is_empty() {
            // An unresolvable excluded slug excludes nothing.
            for slug in std::mem::take(&mut q.category_slug_not_in) {
                if let Some(id) = self.category_id_by_slug(&slug).await? {
                    q.category_not_in.push(id);
                }
            }
        }

        // An exact category means membership anywhere in its subtree, so
        // it becomes an inclusion set over the closure. Conjunctive groups
        // expand the same way, one closure per group.
        if q.category != 0 {
            let root = std::mem::take(&mut q.category);
            q.category_in = self.category_descendants(root).await?;
        } else if !q.category_and.is_empty() {
            let mut groups = Vec::new();
            for group in std::mem::take(&mut q.category_and) {
                let mut expanded = Vec::new();
                for id in group {
                    for member in self.category_descendants(id).await? {
                        if !expanded.contains(&member) {
                            expanded.push(member);
                        }
                    }
                }
                groups.push(expanded);
            }
            q.category_and = groups;
        } else if !q.category_in.is_empty() {
            let mut expanded = Vec::new();
            for id in std::mem::take(&mut q.category_in) {
                for member in self.category_descendants(id).await? {
                    if !expanded.contains(&member) {
                        expanded.push(member);
                    }
                }
            }
            q.category_in = expanded;
        } else if !q.category_not_in.is_empty() {
            let mut expanded = Vec::new();
            for id in std::mem::take(&mut q.category_not_in) {
                for member in self.category_descendants(id).await? {
                    if !expanded.contains(&member) {
                        expanded.push(member);
                    }
                }
            }
            q.category_not_in = expanded;
        }

        Ok(Some(q))
    }

    /// Assembles posts from the store: one batched object fetch, then a
    /// concurrent fan-out for each post's metadata and term attachments.
    async fn build_posts(&self, ids: &[i64]) -> DomainResult<HashMap<i64, Post>> {
        let objects = self.store.get_objects(ids).await?;
        let mut parts = self.fetch_post_parts(objects.iter().map(|o| o.id)).await?;

        let mut posts = HashMap::with_capacity(objects.len());
        for object in objects {
            let PostParts {
                meta,
                category_ids,
                tag_ids,
            } = parts.remove(&object.id).unwrap_or_default();
            posts.insert(object.id, Post::assemble(object, meta, category_ids, tag_ids));
        }

        Ok(posts)
    }

    /// Assembles attachments: objects plus their metadata, resolved
    /// against the site's upload base URL.
    async fn build_attachments(&self, ids: &[i64]) -> DomainResult<HashMap<i64, Attachment>> {
        let objects = self.store.get_objects(ids).await?;
        let object_ids: Vec<i64> = objects.iter().map(|o| o.id).collect();
        let meta = self.store.get_object_meta_batch(&object_ids).await?;

        let upload_base = self.upload_base().await?;

        Ok(objects
            .into_iter()
            .map(|object| {
                let raw = meta.get(&object.id).cloned().unwrap_or_default();
                (object.id, Attachment::assemble(object, &raw, &upload_base))
            })
            .collect())
    }

    /// Resolves the base URL files are served from. An explicit
    /// `upload_url_path` option wins; otherwise the site URL is joined
    /// with the upload directory (`upload_path`, or the stock
    /// `wp-content/uploads`).
    async fn upload_base(&self) -> DomainResult<String> {
        if let Some(url) = self.store.site_option("upload_url_path").await? {
            if !url.is_empty() {
                return Ok(url.trim_end_matches('/').to_string());
            }
        }
        let Some(base) = self.store.site_option("siteurl").await? else {
            return Ok(String::new());
        };
        let dir = match self.store.site_option("upload_path").await? {
            Some(path) if !path.is_empty() => path.trim_matches('/').to_string(),
            _ => "wp-content/uploads".to_string(),
        };
        Ok(format!("{}/{}", base.trim_end_matches('/'), dir))
    }

    /// Fans out one task per independent attribute per post (metadata,
    /// category ids, tag ids), then drains every task before reporting the
    /// first error. Draining first means no task outlives the call with
    /// its result unread.
    async fn fetch_post_parts(
        &self,
        ids: impl Iterator<Item = i64>,
    ) -> DomainResult<HashMap<i64, PostParts>> {
        let (tx, mut rx) = mpsc::unbounded_channel();

        let mut spawned = 0usize;
        for id in ids {
            let store = Arc::clone(&self.store);
            let meta_tx = tx.clone();
            spawned += 1;
            tokio::spawn(async move {
                let result = store.get_object_meta(id).await.map(PostPart::Meta);
                // The receiver only closes when the call is abandoned.
                let _ = meta_tx.send((id, result));
            });

            let store = Arc::clone(&self.store);
            let category_tx = tx.clone();
            spawned += 1;
            tokio::spawn(async move {
                let result = attached_term_ids(store.as_ref(), id, Taxonomy::Category)
                    .await
                    .map(PostPart::CategoryIds);
                let _ = category_tx.send((id, result));
            });

            let store = Arc::clone(&self.store);
            let tag_tx = tx.clone();
            spawned += 1;
            tokio::spawn(async move {
                let result = attached_term_ids(store.as_ref(), id, Taxonomy::PostTag)
                    .await
                    .map(PostPart::TagIds);
                let _ = tag_tx.send((id, result));
            });
        }
        drop(tx);

        let mut parts: HashMap<i64, PostParts> = HashMap::new();
        let mut first_error = None;
        for _ in 0..spawned {
            let Some((id, result)) = rx.recv().await else {
                break;
            };
            match result {
                Ok(part) => {
                    let entry = parts.entry(id).or_default();
                    match part {
                        PostPart::Meta(meta) => entry.meta = meta,
                        PostPart::CategoryIds(ids) => entry.category_ids = ids,
                        PostPart::TagIds(ids) => entry.tag_ids = ids,
                    }
                }
                Err(e) => {
                    if first_error.is_none() {
                        first_error = Some(e);
                    }
                }
            }
        }

        match first_error {
            Some(e) => Err(DomainError::from(e)),
            None => Ok(parts),
        }
    }
}

/// Fetches the term ids attached to one object under one taxonomy.
async fn attached_term_ids<S: ContentStore + ?Sized>(
    store: &S,
    object_id: i64,
    taxonomy: Taxonomy,
) -> StorageResult<Vec<i64>> {
    let rows = store
        .query_terms(&TermQuery {
            object_id,
            taxonomy: Some(taxonomy),
            limit: -1,
            ..Default::default()
        })
        .await?;
    Ok(rows.into_iter().map(|row| row.id).collect())
}
