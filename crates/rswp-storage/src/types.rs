//! Row types, enumerations and query options for the content schema.
//!
//! These are the shapes the [`ContentStore`](crate::traits::ContentStore)
//! trait speaks. Hydrated records (posts with metadata, categories with
//! links) are assembled on top of these by the domain crate.
//!
//! # Zero means "not specified"
//!
//! Every query-option axis treats its zero value (`0`, `""`, empty vec) as
//! "axis not filtered". This is preserved, documented behavior from the
//! upstream schema: identifiers in this schema start at 1, so zero is never
//! a legitimate id.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// A post's publication status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PostStatus {
    Publish,
    Future,
    Draft,
    Pending,
    Private,
    Trash,
    AutoDraft,
    Inherit,
}

impl PostStatus {
    /// The string form stored in the `post_status` column.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Publish => "publish",
            Self::Future => "future",
            Self::Draft => "draft",
            Self::Pending => "pending",
            Self::Private => "private",
            Self::Trash => "trash",
            Self::AutoDraft => "auto-draft",
            Self::Inherit => "inherit",
        }
    }

    /// Parses a `post_status` column value. Unknown statuses map to `None`.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "publish" => Some(Self::Publish),
            "future" => Some(Self::Future),
            "draft" => Some(Self::Draft),
            "pending" => Some(Self::Pending),
            "private" => Some(Self::Private),
            "trash" => Some(Self::Trash),
            "auto-draft" => Some(Self::AutoDraft),
            "inherit" => Some(Self::Inherit),
            _ => None,
        }
    }
}

/// A post's type within the shared `posts` table.
///
/// The table holds more than blog posts: pages, attachments, revisions and
/// navigation menu items all live there, discriminated by `post_type`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PostType {
    Post,
    Page,
    Attachment,
    Revision,
    NavMenuItem,
    /// A site-defined custom post type.
    #[serde(untagged)]
    Custom(String),
}

impl PostType {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Post => "post",
            Self::Page => "page",
            Self::Attachment => "attachment",
            Self::Revision => "revision",
            Self::NavMenuItem => "nav_menu_item",
            Self::Custom(s) => s,
        }
    }

    pub fn parse(s: &str) -> Self {
        match s {
            "post" => Self::Post,
            "page" => Self::Page,
            "attachment" => Self::Attachment,
            "revision" => Self::Revision,
            "nav_menu_item" => Self::NavMenuItem,
            other => Self::Custom(other.to_string()),
        }
    }
}

/// A classification axis for terms.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Taxonomy {
    Category,
    PostTag,
    NavMenu,
    #[serde(untagged)]
    Custom(String),
}

impl Taxonomy {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Category => "category",
            Self::PostTag => "post_tag",
            Self::NavMenu => "nav_menu",
            Self::Custom(s) => s,
        }
    }

    pub fn parse(s: &str) -> Self {
        match s {
            "category" => Self::Category,
            "post_tag" => Self::PostTag,
            "nav_menu" => Self::NavMenu,
            other => Self::Custom(other.to_string()),
        }
    }
}

/// A term joined with its taxonomy row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Term {
    /// Term id (`terms.term_id`).
    pub id: i64,
    pub name: String,
    pub slug: String,
    pub group: i64,
    /// Term taxonomy id (`term_taxonomy.term_taxonomy_id`).
    pub taxonomy_id: i64,
    pub taxonomy: Taxonomy,
    pub description: String,
    /// Parent term id; 0 means root.
    pub parent: i64,
    /// Cached object count for this term.
    pub count: i64,
}

/// A row of the shared `posts` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Object {
    pub id: i64,
    pub author_id: i64,
    /// Local publication time.
    pub date: NaiveDateTime,
    /// GMT publication time.
    pub date_gmt: NaiveDateTime,
    pub content: String,
    pub title: String,
    pub excerpt: String,
    pub status: Option<PostStatus>,
    /// Whether comments are allowed.
    pub comment_status: bool,
    /// Whether pings are allowed.
    pub ping_status: bool,
    /// The post's password in plain text; empty when unprotected.
    pub password: String,
    /// The post's slug (`post_name`).
    pub slug: String,
    /// URLs queued to be pinged.
    pub to_ping: Vec<String>,
    /// URLs that have been pinged.
    pub pinged: Vec<String>,
    pub modified: NaiveDateTime,
    pub modified_gmt: NaiveDateTime,
    pub parent_id: i64,
    /// Feed GUID; not necessarily a URL.
    pub guid: String,
    /// Ordering field for menu items.
    pub menu_order: i64,
    pub kind: PostType,
    /// An attachment's mime type; empty otherwise.
    pub mime_type: String,
    pub comment_count: i64,
}

/// A user joined with its description metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    /// The user's slug (`user_nicename`).
    pub slug: String,
    /// Display name.
    pub name: String,
    pub description: String,
    pub email: String,
    pub website: String,
    pub registered: NaiveDateTime,
}

/// A menu location: a term under the `nav_menu` taxonomy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuLocation {
    pub id: i64,
    pub name: String,
    pub slug: String,
}

/// Routing fields for composing a dated post permalink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostRoute {
    pub year: i32,
    pub month: u32,
    pub title: String,
    pub slug: String,
}

/// One ancestor in a page's parent chain, nearest first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageCrumb {
    pub title: String,
    pub slug: String,
    pub parent_id: i64,
}

/// One row of a query result: the matched id plus the raw value of the
/// ordering column, used to mint the next cursor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdCursorRow {
    pub id: i64,
    pub order_value: String,
}

/// Filter over the shared `posts` table.
///
/// Each axis supports three mutually exclusive forms (exact value,
/// inclusion set, exclusion set) checked in that order; the first populated
/// form wins and the rest are ignored for that axis. Axes compose with AND.
///
/// Category axes (`category`, `category_and`, `category_in`,
/// `category_not_in`, and the slug variants) are resolved and
/// closure-expanded by the reader before the query is built; the slug
/// variants never reach the SQL builder.
#[derive(Debug, Clone, Default)]
pub struct ObjectQuery {
    /// Opaque resume cursor; malformed cursors fall back to the first page.
    pub after: String,
    /// 0 means the default of 10; negative means unbounded.
    pub limit: i64,

    /// Ordering column; empty means `post_date`.
    pub order: String,
    pub order_ascending: bool,

    pub post_type: Option<PostType>,
    pub post_status: Option<PostStatus>,

    pub author: i64,
    pub author_in: Vec<i64>,
    pub author_not_in: Vec<i64>,

    pub author_slug: String,
    pub author_slug_in: Vec<String>,
    pub author_slug_not_in: Vec<String>,

    pub category: i64,
    /// Conjunctive membership groups: every group must contain at least
    /// one of the post's categories. The reader expands each group into a
    /// hierarchy closure before the query is built.
    pub category_and: Vec<Vec<i64>>,
    pub category_in: Vec<i64>,
    pub category_not_in: Vec<i64>,

    /// Slash-delimited hierarchical category paths; resolved by the reader.
    pub category_slug: String,
    pub category_slug_and: Vec<String>,
    pub category_slug_in: Vec<String>,
    pub category_slug_not_in: Vec<String>,

    pub menu_id: i64,
    pub menu_id_and: Vec<i64>,
    pub menu_id_in: Vec<i64>,
    pub menu_id_not_in: Vec<i64>,

    pub menu_slug: String,
    pub menu_slug_in: Vec<String>,
    pub menu_slug_not_in: Vec<String>,

    /// Metadata constraints as `key` or `key=value` strings.
    pub meta: String,
    pub meta_and: Vec<String>,
    pub meta_in: Vec<String>,
    pub meta_not_in: Vec<String>,

    pub slug: String,
    pub slug_in: Vec<String>,
    pub slug_not_in: Vec<String>,

    pub parent: i64,
    pub parent_in: Vec<i64>,
    pub parent_not_in: Vec<i64>,

    pub id: i64,
    pub id_in: Vec<i64>,
    pub id_not_in: Vec<i64>,

    pub tag: i64,
    pub tag_and: Vec<i64>,
    pub tag_in: Vec<i64>,
    pub tag_not_in: Vec<i64>,

    pub tag_slug: String,
    pub tag_slug_and: Vec<String>,
    pub tag_slug_in: Vec<String>,
    pub tag_slug_not_in: Vec<String>,

    /// Free-text search over slug, title and content.
    pub search: String,

    pub day: u32,
    pub month: u32,
    pub year: i32,

    /// Only rows strictly after this publication time.
    pub after_date: Option<NaiveDateTime>,
}

/// Filter over terms.
#[derive(Debug, Clone, Default)]
pub struct TermQuery {
    pub after: String,
    pub limit: i64,

    /// Ordering column; empty means `t.term_id`.
    pub order: String,
    pub order_ascending: bool,

    pub id: i64,
    pub id_in: Vec<i64>,
    pub id_not_in: Vec<i64>,

    pub name: String,
    pub name_in: Vec<String>,
    pub name_not_in: Vec<String>,

    /// Terms attached to this object (via term relationships).
    pub object_id: i64,
    pub object_id_in: Vec<i64>,
    pub object_id_not_in: Vec<i64>,

    pub parent_id: i64,
    pub parent_id_in: Vec<i64>,
    pub parent_id_not_in: Vec<i64>,

    pub slug: String,
    pub slug_in: Vec<String>,
    pub slug_not_in: Vec<String>,

    pub taxonomy: Option<Taxonomy>,
    pub taxonomy_in: Vec<Taxonomy>,
    pub taxonomy_not_in: Vec<Taxonomy>,
}

/// Filter over users.
#[derive(Debug, Clone, Default)]
pub struct UserQuery {
    pub after: String,
    pub limit: i64,

    pub id: i64,
    pub id_in: Vec<i64>,
    pub id_not_in: Vec<i64>,

    pub slug: String,
    pub slug_in: Vec<String>,
    pub slug_not_in: Vec<String>,
}
