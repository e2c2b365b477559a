//! Term, category, and tag reads.

use std::collections::{HashMap, HashSet, VecDeque};

use tokio::sync::mpsc;

use rswp_storage::{ContentStore, Taxonomy, Term, TermQuery};

use crate::error::{DomainError, DomainResult};
use crate::iter::IdIterator;
use crate::records::{keys, Category, Tag};

use super::{BoxFuture, ContentReader};

impl<S: ContentStore> ContentReader<S> {
    /// Fetches raw term rows positionally. Uncached; the assembled
    /// category and tag reads are the cached paths.
    pub async fn get_terms(&self, ids: &[i64]) -> DomainResult<Vec<Term>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        align_rows(self.store.get_terms(ids).await?, ids)
    }

    /// Fetches categories with their hierarchy links resolved.
    pub async fn get_categories(&self, ids: &[i64]) -> DomainResult<Vec<Category>> {
        self.categories_guarded(ids.to_vec(), HashSet::new(), 0).await
    }

    /// Cache-aside category resolution carrying the parent-chain guards.
    /// Boxed because parent-link assembly recurses through this entry
    /// point, so warm chains are served from the cache level by level.
    fn categories_guarded(
        &self,
        ids: Vec<i64>,
        ancestry: HashSet<i64>,
        depth: u32,
    ) -> BoxFuture<'_, DomainResult<Vec<Category>>> {
        Box::pin(async move {
            self.resolve_batch(keys::CATEGORY, &ids, |missing| async move {
                self.build_categories(missing, ancestry, depth).await
            })
            .await
        })
    }

    /// Fetches tags.
    pub async fn get_tags(&self, ids: &[i64]) -> DomainResult<Vec<Tag>> {
        self.resolve_batch(keys::TAG, ids, |missing| async move {
            let terms = self.store.get_terms(&missing).await?;
            Ok(terms
                .into_iter()
                .map(|term| (term.id, Tag::assemble(term)))
                .collect::<HashMap<_, _>>())
        })
        .await
    }

    /// Runs a term query and returns an iterator over the matching ids.
    pub async fn query_terms(&self, query: &TermQuery) -> DomainResult<IdIterator> {
        Ok(IdIterator::new(self.store.query_terms(query).await?))
    }

    /// Resolves a hierarchical category slug path to its term id, walking
    /// one segment at a time with each lookup constrained to the parent
    /// resolved so far. A path that breaks at any segment yields `None`.
    pub async fn category_id_by_slug(&self, slug_path: &str) -> DomainResult<Option<i64>> {
        let mut parent = 0;
        let mut resolved = None;

        for segment in slug_path.split('/').filter(|s| !s.is_empty()) {
            let query = TermQuery {
                slug: segment.to_string(),
                parent_id: parent,
                taxonomy: Some(Taxonomy::Category),
                limit: 1,
                ..Default::default()
            };
            let mut iter = self.query_terms(&query).await?;
            let Some(id) = iter.next() else {
                return Ok(None);
            };
            parent = id;
            resolved = Some(id);
        }

        Ok(resolved)
    }

    /// Computes the closure of a category: the root id plus every
    /// descendant, breadth-first. A visited set makes the walk terminate
    /// even on corrupt cyclic hierarchies.
    pub async fn category_descendants(&self, root_id: i64) -> DomainResult<Vec<i64>> {
        let mut closure = Vec::new();
        let mut visited = HashSet::new();
        let mut frontier = VecDeque::from([root_id]);

        while let Some(id) = frontier.pop_front() {
            if !visited.insert(id) {
                continue;
            }
            closure.push(id);
            for child in self.store.term_children(id).await? {
                frontier.push_back(child);
            }
        }

        Ok(closure)
    }

    /// Assembles categories from the store, fanning out one task per
    /// non-root category to resolve its parent through the cached batch
    /// loader. All dispatched tasks are drained before the first error is
    /// reported, and errors from a parent chain are wrapped with the
    /// (category, parent) pair they arose from.
    async fn build_categories(
        &self,
        ids: Vec<i64>,
        ancestry: HashSet<i64>,
        depth: u32,
    ) -> DomainResult<HashMap<i64, Category>> {
        let terms = self.store.get_terms(&ids).await?;

        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut categories = HashMap::with_capacity(terms.len());
        let mut spawned = 0usize;
        let mut first_error = None;

        for term in terms {
            if term.parent == 0 {
                categories.insert(term.id, Category::assemble(term, &[]));
                continue;
            }

            let mut chain = ancestry.clone();
            chain.insert(term.id);
            if chain.contains(&term.parent) {
                if first_error.is_none() {
                    first_error = Some(DomainError::CycleDetected {
                        category_id: term.parent,
                    });
                }
                continue;
            }
            if depth >= self.config.max_parent_depth {
                if first_error.is_none() {
                    first_error = Some(DomainError::DepthLimitExceeded {
                        max_depth: self.config.max_parent_depth,
                    });
                }
                continue;
            }

            let reader = self.clone();
            let tx = tx.clone();
            spawned += 1;
            tokio::spawn(async move {
                let parent = reader
                    .categories_guarded(vec![term.parent], chain, depth + 1)
                    .await
                    .map(|mut parents| parents.pop());
                let _ = tx.send((term, parent));
            });
        }
        drop(tx);

        for _ in 0..spawned {
            let Some((term, result)) = rx.recv().await else {
                break;
            };
            match result {
                Ok(Some(parent)) => {
                    categories.insert(term.id, Category::assemble_under(term, &parent.link));
                }
                // A parent batch never comes back short without erroring.
                Ok(None) => {}
                Err(source) => {
                    if first_error.is_none() {
                        first_error = Some(DomainError::ParentResolution {
                            category_id: term.id,
                            parent_id: term.parent,
                            source: Box::new(source),
                        });
                    }
                }
            }
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(categories),
        }
    }
}

/// Fans fetched rows back out over the request positions and fails when
/// any requested id is absent.
pub(crate) fn align_rows<T: RowId + Clone>(rows: Vec<T>, ids: &[i64]) -> DomainResult<Vec<T>> {
    let by_id: HashMap<i64, T> = rows.into_iter().map(|r| (r.row_id(), r)).collect();

    let mut missing = Vec::new();
    let mut out = Vec::with_capacity(ids.len());
    for id in ids {
        match by_id.get(id) {
            Some(row) => out.push(row.clone()),
            None => {
                if !missing.contains(id) {
                    missing.push(*id);
                }
            }
        }
    }

    if missing.is_empty() {
        Ok(out)
    } else {
        Err(DomainError::MissingRecords { ids: missing })
    }
}

/// Rows that know their own id, for positional fan-out.
pub(crate) trait RowId {
    fn row_id(&self) -> i64;
}

impl RowId for Term {
    fn row_id(&self) -> i64 {
        self.id
    }
}

impl RowId for rswp_storage::Object {
    fn row_id(&self) -> i64 {
        self.id
    }
}
