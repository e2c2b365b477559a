//! Assembled record types.
//!
//! Storage rows are raw table shapes; the types here are what callers
//! consume: terms with their hierarchy links resolved, posts with their
//! taxonomy attachments and public metadata folded in, users with derived
//! avatar URLs. Each kind carries its own cache key prefix.

mod attachment;
mod menu;
mod post;
mod term;
mod user;

pub use attachment::Attachment;
pub use menu::{Menu, MenuItem};
pub use post::{split_meta, Post};
pub use term::{Category, Tag};
pub use user::User;

/// Cache key prefixes, one per record kind.
pub mod keys {
    pub const CATEGORY: &str = "wp_category_";
    pub const TAG: &str = "wp_tag_";
    pub const POST: &str = "wp_post_";
    pub const ATTACHMENT: &str = "wp_attachment_";
    pub const USER: &str = "wp_user_";
    pub const MENU: &str = "wp_menu_";
}
