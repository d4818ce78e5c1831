//! PostgreSQL integration tests.
//!
//! These tests use a shared PostgreSQL container for efficiency.
//! Run with:
//!
//! ```bash
//! cargo test -p doc-store --test postgres_integration -- --test-threads=1
//! ```

use std::sync::Arc;

use doc_store::{Document, DocumentStore, PostgresStore, StoreError, Version};
use serde::{Deserialize, Serialize};
use serial_test::serial;
use sqlx::PgPool;
use testcontainers::{ContainerAsync, runners::AsyncRunner};
use testcontainers_modules::postgres::Postgres;
use tokio::sync::OnceCell;
use uuid::Uuid;

/// Shared container info - container stays alive for all tests
struct ContainerInfo {
    #[allow(dead_code)] // Container must stay alive for tests
    container: ContainerAsync<Postgres>,
    connection_string: String,
}

static CONTAINER: OnceCell<Arc<ContainerInfo>> = OnceCell::const_new();

async fn get_container_info() -> Arc<ContainerInfo> {
    CONTAINER
        .get_or_init(|| async {
            let container = Postgres::default().start().await.unwrap();

            let host = container.get_host().await.unwrap();
            let port = container.get_host_port_ipv4(5432).await.unwrap();

            let connection_string =
                format!("postgres://postgres:postgres@{}:{}/postgres", host, port);

            let temp_pool = PgPool::connect(&connection_string).await.unwrap();
            sqlx::raw_sql(include_str!(
                "../../../migrations/001_create_documents_table.sql"
            ))
            .execute(&temp_pool)
            .await
            .unwrap();
            temp_pool.close().await;

            Arc::new(ContainerInfo {
                container,
                connection_string,
            })
        })
        .await
        .clone()
}

async fn create_store() -> PostgresStore {
    let info = get_container_info().await;
    let pool = PgPool::connect(&info.connection_string).await.unwrap();
    PostgresStore::new(pool)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct TestDoc {
    id: Uuid,
    #[serde(skip)]
    version: Version,
    name: String,
}

impl TestDoc {
    fn new(name: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            version: Version::default(),
            name: name.to_string(),
        }
    }
}

impl Document for TestDoc {
    fn collection() -> &'static str {
        "pg_test_docs"
    }

    fn document_id(&self) -> Uuid {
        self.id
    }

    fn version(&self) -> Version {
        self.version
    }

    fn set_version(&mut self, version: Version) {
        self.version = version;
    }
}

#[tokio::test]
#[serial]
async fn insert_and_get_roundtrip() {
    let store = create_store().await;
    let doc = TestDoc::new("widget");

    let version = store.insert(&doc).await.unwrap();
    assert_eq!(version, Version::first());

    let loaded: TestDoc = store.get(doc.id).await.unwrap().unwrap();
    assert_eq!(loaded.name, "widget");
    assert_eq!(loaded.version(), Version::first());
}

#[tokio::test]
#[serial]
async fn duplicate_insert_is_rejected() {
    let store = create_store().await;
    let doc = TestDoc::new("widget");

    store.insert(&doc).await.unwrap();
    let result = store.insert(&doc).await;
    assert!(matches!(result, Err(StoreError::DuplicateId { .. })));
}

#[tokio::test]
#[serial]
async fn compare_and_swap_update() {
    let store = create_store().await;
    let doc = TestDoc::new("widget");
    store.insert(&doc).await.unwrap();

    let mut first: TestDoc = store.get(doc.id).await.unwrap().unwrap();
    let mut second: TestDoc = store.get(doc.id).await.unwrap().unwrap();

    first.name = "gadget".to_string();
    let version = store.update(&first).await.unwrap();
    assert_eq!(version, Version::new(2));

    second.name = "gizmo".to_string();
    let result = store.update(&second).await;
    assert!(matches!(result, Err(StoreError::VersionConflict { .. })));

    let reloaded: TestDoc = store.get(doc.id).await.unwrap().unwrap();
    assert_eq!(reloaded.name, "gadget");
}

#[tokio::test]
#[serial]
async fn update_missing_document_is_not_found() {
    let store = create_store().await;
    let mut doc = TestDoc::new("ghost");
    doc.set_version(Version::first());

    let result = store.update(&doc).await;
    assert!(matches!(result, Err(StoreError::NotFound { .. })));
}

#[tokio::test]
#[serial]
async fn delete_requires_matching_version() {
    let store = create_store().await;
    let doc = TestDoc::new("widget");
    store.insert(&doc).await.unwrap();

    let result = store.delete::<TestDoc>(doc.id, Version::new(9)).await;
    assert!(matches!(result, Err(StoreError::VersionConflict { .. })));

    store
        .delete::<TestDoc>(doc.id, Version::first())
        .await
        .unwrap();
    let gone: Option<TestDoc> = store.get(doc.id).await.unwrap();
    assert!(gone.is_none());
}

#[tokio::test]
#[serial]
async fn list_returns_collection_contents() {
    let store = create_store().await;
    let a = TestDoc::new("list-a");
    let b = TestDoc::new("list-b");
    store.insert(&a).await.unwrap();
    store.insert(&b).await.unwrap();

    let docs: Vec<TestDoc> = store.list().await.unwrap();
    let names: Vec<_> = docs.iter().map(|d| d.name.as_str()).collect();
    assert!(names.contains(&"list-a"));
    assert!(names.contains(&"list-b"));
}
