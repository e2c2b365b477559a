//! rswp-storage: Storage abstraction layer
//!
//! This crate provides read access to the content schema, including:
//! - ContentStore trait for storage operations
//! - Cursor-paginated query construction
//! - MySQL implementation for production
//! - In-memory implementation for testing
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │               rswp-storage                   │
//! ├─────────────────────────────────────────────┤
//! │  traits.rs  - ContentStore trait definition │
//! │  types.rs   - Row types and query options   │
//! │  query.rs   - SQL construction              │
//! │  cursor.rs  - Opaque pagination cursors     │
//! │  mysql.rs   - MySQL implementation          │
//! │  memory.rs  - In-memory implementation      │
//! └─────────────────────────────────────────────┘
//! ```

pub mod cursor;
pub mod error;
pub mod memory;
pub mod mysql;
pub mod query;
pub mod traits;
pub mod types;

// Re-export commonly used types
pub use cursor::{decode_cursor, encode_cursor};
pub use error::{StorageError, StorageResult};
pub use memory::MemoryContentStore;
pub use mysql::{MySqlConfig, MySqlContentStore};
pub use query::{SqlArg, SqlQuery};
pub use traits::ContentStore;
pub use types::{
    IdCursorRow, MenuLocation, Object, ObjectQuery, PageCrumb, PostRoute, PostStatus, PostType,
    Taxonomy, Term, TermQuery, User, UserQuery,
};
