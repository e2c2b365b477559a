//! Post records.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use rswp_storage::Object;

/// Metadata key naming a post's featured media attachment.
pub const THUMBNAIL_META_KEY: &str = "_thumbnail_id";

/// Keys beginning with this prefix are internal bookkeeping and never
/// exposed as post metadata.
const RESERVED_META_PREFIX: char = '_';

/// A post with its taxonomy attachments and public metadata folded in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    #[serde(flatten)]
    pub object: Object,
    /// The featured attachment id; 0 when none is set.
    pub featured_media_id: i64,
    pub category_ids: Vec<i64>,
    pub tag_ids: Vec<i64>,
    /// Public metadata. Underscore-prefixed keys are stripped.
    pub meta: HashMap<String, String>,
}

impl Post {
    /// Builds the post from its object row, raw metadata, and the ids of
    /// its attached terms.
    pub fn assemble(
        object: Object,
        raw_meta: HashMap<String, String>,
        category_ids: Vec<i64>,
        tag_ids: Vec<i64>,
    ) -> Self {
        let (meta, featured_media_id) = split_meta(raw_meta);
        Self {
            object,
            featured_media_id,
            category_ids,
            tag_ids,
            meta,
        }
    }
}

/// Splits raw metadata into the public map and the featured media id.
///
/// The thumbnail pointer is pulled out before reserved keys are dropped;
/// a non-numeric thumbnail value counts as unset.
pub fn split_meta(raw: HashMap<String, String>) -> (HashMap<String, String>, i64) {
    let featured_media_id = raw
        .get(THUMBNAIL_META_KEY)
        .and_then(|v| v.parse::<i64>().ok())
        .unwrap_or(0);

    let meta = raw
        .into_iter()
        .filter(|(key, _)| !key.starts_with(RESERVED_META_PREFIX))
        .collect();

    (meta, featured_media_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(entries: &[(&str, &str)]) -> HashMap<String, String> {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_split_meta_strips_reserved_keys() {
        let (meta, _) = split_meta(raw(&[
            ("color", "red"),
            ("_edit_lock", "1"),
            ("_thumbnail_id", "9"),
        ]));

        assert_eq!(meta.len(), 1);
        assert_eq!(meta["color"], "red");
    }

    #[test]
    fn test_split_meta_extracts_thumbnail_id() {
        let (_, featured) = split_meta(raw(&[("_thumbnail_id", "9")]));
        assert_eq!(featured, 9);
    }

    #[test]
    fn test_split_meta_non_numeric_thumbnail_is_unset() {
        let (_, featured) = split_meta(raw(&[("_thumbnail_id", "not-a-number")]));
        assert_eq!(featured, 0);
    }

    #[test]
    fn test_split_meta_without_thumbnail() {
        let (meta, featured) = split_meta(raw(&[("color", "red")]));
        assert_eq!(featured, 0);
        assert_eq!(meta.len(), 1);
    }
}
