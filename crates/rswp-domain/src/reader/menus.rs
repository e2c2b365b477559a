//! Navigation menu assembly.
//!
//! Menus are cached whole: one entry per menu holding the term, every
//! item, and every item's resolved metadata. Assembling a menu touches
//! three tables, so the whole-menu entry is the unit worth caching.

use std::sync::Arc;

use tokio::sync::mpsc;

use rswp_storage::{ContentStore, MenuLocation, ObjectQuery, PostStatus, PostType, Taxonomy, TermQuery};

use crate::cache::{encode_record, record_key, spawn_write_back};
use crate::error::{DomainError, DomainResult};
use crate::records::{keys, Menu, MenuItem};

use super::ContentReader;

/// Identifies a menu by its term slug or id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuRef {
    Slug(String),
    Id(i64),
}

impl MenuRef {
    fn cache_key(&self) -> String {
        match self {
            Self::Slug(slug) => format!("{}{}", keys::MENU, slug),
            Self::Id(id) => record_key(&format!("{}id_", keys::MENU), *id),
        }
    }
}

impl<S: ContentStore> ContentReader<S> {
    /// Fetches one menu with all its items, ordered. Returns `None` when
    /// no menu matches.
    pub async fn get_menu(&self, menu: &MenuRef) -> DomainResult<Option<Menu>> {
        let key = menu.cache_key();

        if self.config.cache_enabled {
            if let Some(blob) = self.cache.get(&key).await {
                if let Ok(cached) = serde_json::from_str::<Menu>(&blob) {
                    return Ok(Some(cached));
                }
            }
        }

        let Some(assembled) = self.assemble_menu(menu).await? else {
            return Ok(None);
        };

        if self.config.cache_enabled {
            if let Some(entry) = encode_record(&key, &assembled) {
                drop(spawn_write_back(Arc::clone(&self.cache), vec![entry]));
            }
        }

        Ok(Some(assembled))
    }

    /// Lists the registered menu locations.
    pub async fn menu_locations(&self) -> DomainResult<Vec<MenuLocation>> {
        Ok(self.store.menu_locations().await?)
    }

    async fn assemble_menu(&self, menu: &MenuRef) -> DomainResult<Option<Menu>> {
        let term_query = match menu {
            MenuRef::Slug(slug) => TermQuery {
                slug: slug.clone(),
                taxonomy: Some(Taxonomy::NavMenu),
                limit: 1,
                ..Default::default()
            },
            MenuRef::Id(id) => TermQuery {
                id: *id,
                taxonomy: Some(Taxonomy::NavMenu),
                limit: 1,
                ..Default::default()
            },
        };

        let rows = self.store.query_terms(&term_query).await?;
        let Some(term_id) = rows.first().map(|row| row.id) else {
            return Ok(None);
        };
        let Some(term) = self.store.get_terms(&[term_id]).await?.into_iter().next() else {
            return Ok(None);
        };

        // Menu items are unordered here; Menu::assemble sorts them.
        let item_rows = self
            .store
            .query_objects(&ObjectQuery {
                post_type: Some(PostType::NavMenuItem),
                post_status: Some(PostStatus::Publish),
                menu_id: term.id,
                limit: -1,
                ..Default::default()
            })
            .await?;
        let item_ids: Vec<i64> = item_rows.into_iter().map(|row| row.id).collect();

        let objects = self.store.get_objects(&item_ids).await?;
        let meta = self.store.get_object_meta_batch(&item_ids).await?;

        let items: Vec<MenuItem> = objects
            .iter()
            .map(|object| {
                let raw = meta.get(&object.id).cloned().unwrap_or_default();
                MenuItem::assemble(object, &raw)
            })
            .collect();
        let items = self.resolve_item_links(items).await?;

        Ok(Some(Menu::assemble(term.id, term.name, term.slug, items)))
    }

    /// Resolves the URL of every object-backed item, one task per item,
    /// draining all tasks before reporting the first error. Custom links
    /// keep the URL from their metadata.
    async fn resolve_item_links(&self, mut items: Vec<MenuItem>) -> DomainResult<Vec<MenuItem>> {
        let (tx, mut rx) = mpsc::unbounded_channel();

        let mut spawned = 0usize;
        for (idx, item) in items.iter().enumerate() {
            if item.target_id == 0 || item.link_kind == "custom" {
                continue;
            }

            let reader = self.clone();
            let tx = tx.clone();
            let link_kind = item.link_kind.clone();
            let target_kind = item.target_kind.clone();
            let target_id = item.target_id;
            spawned += 1;
            tokio::spawn(async move {
                let result = reader.item_link(&link_kind, &target_kind, target_id).await;
                let _ = tx.send((idx, result));
            });
        }
        drop(tx);

        let mut first_error = None;
        for _ in 0..spawned {
            let Some((idx, result)) = rx.recv().await else {
                break;
            };
            match result {
                Ok(Some(url)) => items[idx].url = url,
                Ok(None) => {}
                Err(e) => {
                    if first_error.is_none() {
                        first_error = Some(e);
                    }
                }
            }
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(items),
        }
    }

    /// The link for one menu target: a term link for taxonomy items, a
    /// dated permalink for posts, a breadcrumb path for pages. Targets no
    /// route can be built for resolve to `None`.
    async fn item_link(
        &self,
        link_kind: &str,
        target_kind: &str,
        target_id: i64,
    ) -> DomainResult<Option<String>> {
        match (link_kind, target_kind) {
            ("taxonomy", "category") => match self.get_categories(&[target_id]).await {
                Ok(categories) => Ok(categories.into_iter().next().map(|c| c.link)),
                Err(DomainError::MissingRecords { .. }) => Ok(None),
                Err(e) => Err(e),
            },
            ("taxonomy", "post_tag") => match self.get_tags(&[target_id]).await {
                Ok(tags) => Ok(tags.into_iter().next().map(|t| t.link)),
                Err(DomainError::MissingRecords { .. }) => Ok(None),
                Err(e) => Err(e),
            },
            ("post_type", "page") => self.page_link(target_id).await,
            ("post_type", _) => self.post_link(target_id).await,
            _ => Ok(None),
        }
    }
}
