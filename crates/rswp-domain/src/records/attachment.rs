//! Attachment records.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use rswp_storage::Object;

/// Metadata key holding an attachment's upload-relative file path.
pub const ATTACHED_FILE_META_KEY: &str = "_wp_attached_file";

/// Metadata key holding an attachment's alt text.
pub const IMAGE_ALT_META_KEY: &str = "_wp_attachment_image_alt";

/// A media attachment with its file location resolved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attachment {
    #[serde(flatten)]
    pub object: Object,
    /// Upload-relative file path, e.g. `2024/05/cat.jpg`.
    pub file: String,
    /// Absolute URL; empty when the site base URL is unknown.
    pub url: String,
    pub alt: String,
    /// The caption lives in the object's excerpt column.
    pub caption: String,
}

impl Attachment {
    /// Builds the attachment from its object row, raw metadata, and the
    /// site's upload base URL (no trailing slash).
    pub fn assemble(object: Object, raw_meta: &HashMap<String, String>, upload_base: &str) -> Self {
        let file = raw_meta
            .get(ATTACHED_FILE_META_KEY)
            .cloned()
            .unwrap_or_default();
        let alt = raw_meta
            .get(IMAGE_ALT_META_KEY)
            .cloned()
            .unwrap_or_default();
        let url = if upload_base.is_empty() || file.is_empty() {
            String::new()
        } else {
            format!("{upload_base}/{file}")
        };
        let caption = object.excerpt.clone();

        Self {
            object,
            file,
            url,
            alt,
            caption,
        }
    }
}
