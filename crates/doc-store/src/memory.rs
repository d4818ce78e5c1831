use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use common::Version;

use crate::{Document, DocumentStore, Result, StoreError};

#[derive(Clone)]
struct StoredDoc {
    version: Version,
    data: serde_json::Value,
}

/// In-memory document store for tests and local development.
///
/// Stores serialized documents per collection behind an `RwLock` and provides
/// the same compare-and-swap semantics as the PostgreSQL implementation.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    collections: Arc<RwLock<HashMap<&'static str, HashMap<Uuid, StoredDoc>>>>,
}

impl InMemoryStore {
    /// Creates a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of documents in a collection.
    pub async fn count(&self, collection: &'static str) -> usize {
        self.collections
            .read()
            .await
            .get(collection)
            .map(HashMap::len)
            .unwrap_or(0)
    }

    /// Removes every document from every collection.
    pub async fn clear(&self) {
        self.collections.write().await.clear();
    }
}

#[async_trait]
impl DocumentStore for InMemoryStore {
    async fn insert<T: Document>(&self, doc: &T) -> Result<Version> {
        let data = serde_json::to_value(doc)?;
        let mut collections = self.collections.write().await;
        let collection = collections.entry(T::collection()).or_default();

        let id = doc.document_id();
        if collection.contains_key(&id) {
            return Err(StoreError::DuplicateId {
                collection: T::collection(),
                id,
            });
        }

        collection.insert(
            id,
            StoredDoc {
                version: Version::first(),
                data,
            },
        );
        Ok(Version::first())
    }

    async fn get<T: Document>(&self, id: Uuid) -> Result<Option<T>> {
        let collections = self.collections.read().await;
        let Some(stored) = collections.get(T::collection()).and_then(|c| c.get(&id)) else {
            return Ok(None);
        };

        let mut doc: T = serde_json::from_value(stored.data.clone())?;
        doc.set_version(stored.version);
        Ok(Some(doc))
    }

    async fn update<T: Document>(&self, doc: &T) -> Result<Version> {
        let data = serde_json::to_value(doc)?;
        let mut collections = self.collections.write().await;
        let id = doc.document_id();

        let stored = collections
            .get_mut(T::collection())
            .and_then(|c| c.get_mut(&id))
            .ok_or(StoreError::NotFound {
                collection: T::collection(),
                id,
            })?;

        if stored.version != doc.version() {
            return Err(StoreError::VersionConflict {
                collection: T::collection(),
                id,
                expected: doc.version(),
                actual: stored.version,
            });
        }

        stored.version = stored.version.next();
        stored.data = data;
        Ok(stored.version)
    }

    async fn delete<T: Document>(&self, id: Uuid, expected: Version) -> Result<()> {
        let mut collections = self.collections.write().await;
        let collection =
            collections
                .get_mut(T::collection())
                .ok_or(StoreError::NotFound {
                    collection: T::collection(),
                    id,
                })?;

        let stored = collection.get(&id).ok_or(StoreError::NotFound {
            collection: T::collection(),
            id,
        })?;

        if stored.version != expected {
            return Err(StoreError::VersionConflict {
                collection: T::collection(),
                id,
                expected,
                actual: stored.version,
            });
        }

        collection.remove(&id);
        Ok(())
    }

    async fn list<T: Document>(&self) -> Result<Vec<T>> {
        let collections = self.collections.read().await;
        let Some(collection) = collections.get(T::collection()) else {
            return Ok(Vec::new());
        };

        collection
            .values()
            .map(|stored| {
                let mut doc: T = serde_json::from_value(stored.data.clone())?;
                doc.set_version(stored.version);
                Ok(doc)
            })
            .collect()
    }
}
