//! Navigation menu records.
//!
//! A menu is a `nav_menu` term whose items are `nav_menu_item` objects,
//! each carrying its target and nesting in underscore-prefixed metadata.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use rswp_storage::Object;

pub const MENU_ITEM_PARENT_META_KEY: &str = "_menu_item_menu_item_parent";
pub const MENU_ITEM_OBJECT_ID_META_KEY: &str = "_menu_item_object_id";
pub const MENU_ITEM_OBJECT_META_KEY: &str = "_menu_item_object";
pub const MENU_ITEM_TYPE_META_KEY: &str = "_menu_item_type";
pub const MENU_ITEM_URL_META_KEY: &str = "_menu_item_url";

/// One entry in a navigation menu.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuItem {
    /// The menu item object's own id.
    pub id: i64,
    pub title: String,
    /// Explicit URL for custom links; empty for object-backed items.
    pub url: String,
    /// Id of the parent menu item; 0 for top-level entries.
    pub parent_id: i64,
    /// Id of the post, page, or term this item points at; 0 for custom links.
    pub target_id: i64,
    /// What the target is, e.g. `page` or `category`.
    pub target_kind: String,
    /// How the item links: `post_type`, `taxonomy`, or `custom`.
    pub link_kind: String,
    /// Position within the menu.
    pub order: i64,
}

impl MenuItem {
    /// Builds the item from its object row and raw metadata.
    pub fn assemble(object: &Object, raw_meta: &HashMap<String, String>) -> Self {
        let meta_i64 = |key: &str| {
            raw_meta
                .get(key)
                .and_then(|v| v.parse::<i64>().ok())
                .unwrap_or(0)
        };
        let meta_str = |key: &str| raw_meta.get(key).cloned().unwrap_or_default();

        Self {
            id: object.id,
            title: object.title.clone(),
            url: meta_str(MENU_ITEM_URL_META_KEY),
            parent_id: meta_i64(MENU_ITEM_PARENT_META_KEY),
            target_id: meta_i64(MENU_ITEM_OBJECT_ID_META_KEY),
            target_kind: meta_str(MENU_ITEM_OBJECT_META_KEY),
            link_kind: meta_str(MENU_ITEM_TYPE_META_KEY),
            order: object.menu_order,
        }
    }
}

/// A fully assembled navigation menu.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Menu {
    /// The `nav_menu` term id.
    pub id: i64,
    pub name: String,
    pub slug: String,
    /// Items in `menu_order`, ties broken by item id.
    pub items: Vec<MenuItem>,
}

impl Menu {
    pub fn assemble(id: i64, name: String, slug: String, mut items: Vec<MenuItem>) -> Self {
        items.sort_by(|a, b| a.order.cmp(&b.order).then_with(|| a.id.cmp(&b.id)));
        Self {
            id,
            name,
            slug,
            items,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rswp_storage::{PostStatus, PostType};

    fn item_object(id: i64, title: &str, order: i64) -> Object {
        let published = NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        Object {
            id,
            author_id: 1,
            date: published,
            date_gmt: published,
            content: String::new(),
            title: title.to_string(),
            excerpt: String::new(),
            status: Some(PostStatus::Publish),
            comment_status: false,
            ping_status: false,
            password: String::new(),
            slug: String::new(),
            to_ping: Vec::new(),
            pinged: Vec::new(),
            modified: published,
            modified_gmt: published,
            parent_id: 0,
            guid: String::new(),
            menu_order: order,
            kind: PostType::NavMenuItem,
            mime_type: String::new(),
            comment_count: 0,
        }
    }

    fn raw(entries: &[(&str, &str)]) -> HashMap<String, String> {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_assemble_item_reads_target_from_meta() {
        let meta = raw(&[
            ("_menu_item_object_id", "42"),
            ("_menu_item_object", "page"),
            ("_menu_item_type", "post_type"),
            ("_menu_item_menu_item_parent", "0"),
        ]);
        let item = MenuItem::assemble(&item_object(7, "About", 2), &meta);

        assert_eq!(item.id, 7);
        assert_eq!(item.target_id, 42);
        assert_eq!(item.target_kind, "page");
        assert_eq!(item.link_kind, "post_type");
        assert_eq!(item.parent_id, 0);
        assert_eq!(item.order, 2);
    }

    #[test]
    fn test_assemble_item_custom_link_keeps_url() {
        let meta = raw(&[
            ("_menu_item_type", "custom"),
            ("_menu_item_url", "https://example.com/"),
        ]);
        let item = MenuItem::assemble(&item_object(8, "External", 1), &meta);

        assert_eq!(item.url, "https://example.com/");
        assert_eq!(item.target_id, 0);
    }

    #[test]
    fn test_menu_sorts_items_by_order_then_id() {
        let a = MenuItem::assemble(&item_object(3, "third", 2), &HashMap::new());
        let b = MenuItem::assemble(&item_object(2, "second", 1), &HashMap::new());
        let c = MenuItem::assemble(&item_object(1, "also-second", 1), &HashMap::new());

        let menu = Menu::assemble(5, "Main".to_string(), "main".to_string(), vec![a, b, c]);

        let ids: Vec<i64> = menu.items.iter().map(|i| i.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }
}
