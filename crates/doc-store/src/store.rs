use async_trait::async_trait;
use uuid::Uuid;

use common::Version;

use crate::{Document, Result};

/// Per-collection CRUD with optimistic concurrency.
///
/// `get` has read-your-writes consistency: a document returned by `get`
/// reflects every write this store has acknowledged. Listing order is
/// unspecified; callers sort.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Inserts a new document at [`Version::first`].
    ///
    /// Fails with [`StoreError::DuplicateId`] if the id is already taken.
    ///
    /// [`StoreError::DuplicateId`]: crate::StoreError::DuplicateId
    async fn insert<T: Document>(&self, doc: &T) -> Result<Version>;

    /// Loads a document by id, or `None` if it does not exist.
    async fn get<T: Document>(&self, id: Uuid) -> Result<Option<T>>;

    /// Replaces a document, compare-and-swapping on the version it was read
    /// with.
    ///
    /// On success the stored version advances by one and is returned; the
    /// caller is responsible for calling [`Document::set_version`] with it.
    /// Fails with [`StoreError::VersionConflict`] when the stored version no
    /// longer matches `doc.version()`.
    ///
    /// [`StoreError::VersionConflict`]: crate::StoreError::VersionConflict
    async fn update<T: Document>(&self, doc: &T) -> Result<Version>;

    /// Removes a document, compare-and-swapping on `expected`.
    async fn delete<T: Document>(&self, id: Uuid, expected: Version) -> Result<()>;

    /// Returns every document in the collection.
    async fn list<T: Document>(&self) -> Result<Vec<T>>;
}
