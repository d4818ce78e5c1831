use serde::Serialize;
use serde::de::DeserializeOwned;
use uuid::Uuid;

use common::Version;

/// A persistable entity.
///
/// Implementors name their collection and expose the id and the version the
/// document was read with. The store bumps the version on every successful
/// write; `set_version` lets it hand the new value back to the entity.
pub trait Document: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// The collection this document type is stored in.
    fn collection() -> &'static str;

    /// The document's unique id within its collection.
    fn document_id(&self) -> Uuid;

    /// The version this document was read with.
    fn version(&self) -> Version;

    /// Sets the version after a successful write.
    fn set_version(&mut self, version: Version);
}
