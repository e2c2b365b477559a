//! Domain error types for content assembly operations.

use thiserror::Error;

use rswp_storage::StorageError;

/// Domain-specific errors for content assembly operations.
#[derive(Debug, Error)]
pub enum DomainError {
    /// One or more requested records do not exist. Batch reads fail as a
    /// whole rather than returning a shorter array than requested.
    #[error("missing records: {ids:?}")]
    MissingRecords { ids: Vec<i64> },

    /// A category's parent chain could not be resolved.
    #[error("resolving parent {parent_id} of category {category_id}: {source}")]
    ParentResolution {
        category_id: i64,
        parent_id: i64,
        #[source]
        source: Box<DomainError>,
    },

    /// Cycle detected while walking a category parent chain.
    #[error("cycle detected in category hierarchy at {category_id}")]
    CycleDetected { category_id: i64 },

    /// Depth limit exceeded while walking a category parent chain.
    #[error("category depth limit exceeded (max: {max_depth})")]
    DepthLimitExceeded { max_depth: u32 },

    /// Underlying storage failure.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}

impl DomainError {
    /// The ids a `MissingRecords` error names, if any.
    pub fn missing_ids(&self) -> Option<&[i64]> {
        match self {
            Self::MissingRecords { ids } => Some(ids),
            _ => None,
        }
    }
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
