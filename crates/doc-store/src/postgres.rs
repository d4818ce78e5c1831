use async_trait::async_trait;
use chrono::Utc;
use sqlx::{PgPool, Row, postgres::PgRow};
use uuid::Uuid;

use common::Version;

use crate::{Document, DocumentStore, Result, StoreError};

/// PostgreSQL-backed document store.
///
/// Documents live in a single `documents` table keyed by `(collection, id)`
/// with a JSONB payload. Compare-and-swap is a conditional `UPDATE` on the
/// version column; a lost race is reported as
/// [`StoreError::VersionConflict`].
#[derive(Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    /// Creates a new PostgreSQL document store.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Gets a reference to the underlying connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Runs the database migrations.
    pub async fn run_migrations(&self) -> std::result::Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("../../migrations").run(&self.pool).await
    }

    fn row_to_doc<T: Document>(row: PgRow) -> Result<T> {
        let data: serde_json::Value = row.try_get("data")?;
        let version = Version::new(row.try_get::<i64, _>("version")?);

        let mut doc: T = serde_json::from_value(data)?;
        doc.set_version(version);
        Ok(doc)
    }

    async fn stored_version(&self, collection: &'static str, id: Uuid) -> Result<Option<Version>> {
        let version: Option<i64> =
            sqlx::query_scalar("SELECT version FROM documents WHERE collection = $1 AND id = $2")
                .bind(collection)
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(version.map(Version::new))
    }
}

#[async_trait]
impl DocumentStore for PostgresStore {
    async fn insert<T: Document>(&self, doc: &T) -> Result<Version> {
        let data = serde_json::to_value(doc)?;
        let id = doc.document_id();

        let result = sqlx::query(
            r#"
            INSERT INTO documents (collection, id, version, data, updated_at)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (collection, id) DO NOTHING
            "#,
        )
        .bind(T::collection())
        .bind(id)
        .bind(Version::first().as_i64())
        .bind(&data)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::DuplicateId {
                collection: T::collection(),
                id,
            });
        }

        Ok(Version::first())
    }

    async fn get<T: Document>(&self, id: Uuid) -> Result<Option<T>> {
        let row = sqlx::query(
            "SELECT version, data FROM documents WHERE collection = $1 AND id = $2",
        )
        .bind(T::collection())
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Self::row_to_doc).transpose()
    }

    async fn update<T: Document>(&self, doc: &T) -> Result<Version> {
        let data = serde_json::to_value(doc)?;
        let id = doc.document_id();
        let expected = doc.version();

        let new_version: Option<i64> = sqlx::query_scalar(
            r#"
            UPDATE documents
            SET version = version + 1, data = $4, updated_at = $5
            WHERE collection = $1 AND id = $2 AND version = $3
            RETURNING version
            "#,
        )
        .bind(T::collection())
        .bind(id)
        .bind(expected.as_i64())
        .bind(&data)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await?;

        match new_version {
            Some(v) => Ok(Version::new(v)),
            // Distinguish a missing document from a lost race.
            None => match self.stored_version(T::collection(), id).await? {
                Some(actual) => {
                    tracing::debug!(
                        collection = T::collection(),
                        %id,
                        expected = expected.as_i64(),
                        actual = actual.as_i64(),
                        "update lost a compare-and-swap race"
                    );
                    Err(StoreError::VersionConflict {
                        collection: T::collection(),
                        id,
                        expected,
                        actual,
                    })
                }
                None => Err(StoreError::NotFound {
                    collection: T::collection(),
                    id,
                }),
            },
        }
    }

    async fn delete<T: Document>(&self, id: Uuid, expected: Version) -> Result<()> {
        let result = sqlx::query(
            "DELETE FROM documents WHERE collection = $1 AND id = $2 AND version = $3",
        )
        .bind(T::collection())
        .bind(id)
        .bind(expected.as_i64())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return match self.stored_version(T::collection(), id).await? {
                Some(actual) => {
                    tracing::debug!(
                        collection = T::collection(),
                        %id,
                        expected = expected.as_i64(),
                        actual = actual.as_i64(),
                        "delete lost a compare-and-swap race"
                    );
                    Err(StoreError::VersionConflict {
                        collection: T::collection(),
                        id,
                        expected,
                        actual,
                    })
                }
                None => Err(StoreError::NotFound {
                    collection: T::collection(),
                    id,
                }),
            };
        }

        Ok(())
    }

    async fn list<T: Document>(&self) -> Result<Vec<T>> {
        let rows = sqlx::query(
            "SELECT version, data FROM documents WHERE collection = $1 ORDER BY updated_at",
        )
        .bind(T::collection())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Self::row_to_doc).collect()
    }
}
