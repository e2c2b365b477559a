//! rswp-domain: Content assembly domain logic
//!
//! This crate contains the read-side domain logic including:
//! - Batched cache-aside record resolution
//! - Assembled record types (categories, posts, users, menus)
//! - Category hierarchy closure and link resolution
//! - Cursor-paginated query iteration
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │                rswp-domain                   │
//! ├─────────────────────────────────────────────┤
//! │  reader/   - ContentReader entry point      │
//! │  records/  - Assembled record types         │
//! │  cache/    - Record blob caching            │
//! │  dedupe    - Request id deduplication       │
//! │  iter      - Result page iteration          │
//! └─────────────────────────────────────────────┘
//! ```

pub mod cache;
pub mod dedupe;
pub mod error;
pub mod iter;
pub mod reader;
pub mod records;

// Re-export commonly used types at the crate root
pub use error::{DomainError, DomainResult};
pub use iter::IdIterator;
pub use reader::{ContentReader, MenuRef, PostTransform, ReaderConfig};
pub use records::{Attachment, Category, Menu, MenuItem, Post, Tag, User};
