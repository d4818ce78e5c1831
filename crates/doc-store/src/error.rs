use thiserror::Error;
use uuid::Uuid;

use common::Version;

/// Errors that can occur when interacting with the document store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A compare-and-swap write found a different version than the caller read.
    #[error(
        "version conflict for {collection} {id}: expected version {expected}, found {actual}"
    )]
    VersionConflict {
        collection: &'static str,
        id: Uuid,
        expected: Version,
        actual: Version,
    },

    /// The document was not found in its collection.
    #[error("{collection} not found: {id}")]
    NotFound { collection: &'static str, id: Uuid },

    /// A document with the same id already exists in the collection.
    #[error("{collection} {id} already exists")]
    DuplicateId { collection: &'static str, id: Uuid },

    /// A database error occurred.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A serialization/deserialization error occurred.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for document store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
