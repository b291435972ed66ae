//! PostgreSQL document store
//!
//! All collections live in one `documents` table
//! (`collection`, `id`, `revision`, `data JSONB`), see
//! `database/migrations`.

use serde_json::{Map, Value};
use sqlx::types::Json;
use sqlx::{PgPool, Postgres, QueryBuilder};

use super::{DocStoreError, DocStoreResult, DocumentStore, Filter, Order, Query, StoredDocument};

/// Row shape shared by every read
#[derive(sqlx::FromRow)]
struct DocumentRow {
    id: String,
    revision: i64,
    data: Json<Value>,
}

impl DocumentRow {
    fn into_document(self) -> StoredDocument {
        StoredDocument {
            id: self.id,
            revision: u64::try_from(self.revision).unwrap_or_default(),
            data: self.data.0,
        }
    }
}

/// PostgreSQL-backed document store
#[derive(Clone)]
pub struct PgDocumentStore {
    pool: PgPool,
}

impl PgDocumentStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Append `WHERE collection = .. AND <filters>` to a statement
    fn push_where(builder: &mut QueryBuilder<'_, Postgres>, collection: &str, query: &Query) {
        builder.push(" WHERE collection = ");
        builder.push_bind(collection.to_string());

        for filter in query.filters() {
            match filter {
                Filter::Eq(field, value) => {
                    // Containment on a single top-level key is equality for scalars.
                    let mut probe = Map::new();
                    probe.insert(field.clone(), value.clone());
                    builder.push(" AND data @> ");
                    builder.push_bind(Json(Value::Object(probe)));
                    builder.push("::jsonb");
                }
                Filter::Lt(field, value) => {
                    builder.push(" AND data -> ");
                    builder.push_bind(field.clone());
                    builder.push(" < ");
                    builder.push_bind(Json(value.clone()));
                    builder.push("::jsonb");
                }
            }
        }
    }

    fn map_write_error(err: sqlx::Error, collection: &str, id: &str) -> DocStoreError {
        match &err {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                DocStoreError::AlreadyExists {
                    collection: collection.to_string(),
                    id: id.to_string(),
                }
            }
            _ => DocStoreError::Backend(err),
        }
    }
}

impl DocumentStore for PgDocumentStore {
    async fn insert(&self, collection: &str, id: &str, data: Value) -> DocStoreResult<u64> {
        if !data.is_object() {
            return Err(DocStoreError::InvalidDocument(
                "document payload must be a JSON object".to_string(),
            ));
        }

        sqlx::query(
            r#"
            INSERT INTO documents (collection, id, revision, data)
            VALUES ($1, $2, 1, $3)
            "#,
        )
        .bind(collection)
        .bind(id)
        .bind(Json(data))
        .execute(&self.pool)
        .await
        .map_err(|e| Self::map_write_error(e, collection, id))?;

        Ok(1)
    }

    async fn get(&self, collection: &str, id: &str) -> DocStoreResult<Option<StoredDocument>> {
        let row = sqlx::query_as::<_, DocumentRow>(
            r#"
            SELECT id, revision, data
            FROM documents
            WHERE collection = $1 AND id = $2
            "#,
        )
        .bind(collection)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(DocumentRow::into_document))
    }

    async fn find(&self, collection: &str, query: &Query) -> DocStoreResult<Vec<StoredDocument>> {
        let mut builder = QueryBuilder::<Postgres>::new("SELECT id, revision, data FROM documents");
        Self::push_where(&mut builder, collection, query);

        if let Some((field, order)) = query.ordering() {
            builder.push(" ORDER BY data -> ");
            builder.push_bind(field.to_string());
            builder.push(match order {
                Order::Asc => " ASC NULLS LAST",
                Order::Desc => " DESC NULLS LAST",
            });
            builder.push(", id ASC");
        } else {
            builder.push(" ORDER BY id ASC");
        }

        if let Some(limit) = query.limit_value() {
            builder.push(" LIMIT ");
            builder.push_bind(i64::try_from(limit).unwrap_or(i64::MAX));
        }

        let rows = builder
            .build_query_as::<DocumentRow>()
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(DocumentRow::into_document).collect())
    }

    async fn update(
        &self,
        collection: &str,
        id: &str,
        data: Value,
        expected_revision: Option<u64>,
    ) -> DocStoreResult<u64> {
        if !data.is_object() {
            return Err(DocStoreError::InvalidDocument(
                "document payload must be a JSON object".to_string(),
            ));
        }

        let expected = expected_revision.map(|r| i64::try_from(r).unwrap_or(i64::MAX));

        let updated = sqlx::query_scalar::<_, i64>(
            r#"
            UPDATE documents SET
                data = $3,
                revision = revision + 1,
                updated_at = now()
            WHERE collection = $1
              AND id = $2
              AND ($4::BIGINT IS NULL OR revision = $4)
            RETURNING revision
            "#,
        )
        .bind(collection)
        .bind(id)
        .bind(Json(data))
        .bind(expected)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| Self::map_write_error(e, collection, id))?;

        if let Some(revision) = updated {
            return Ok(u64::try_from(revision).unwrap_or_default());
        }

        // Nothing written: tell "gone" apart from "stale".
        let actual = sqlx::query_scalar::<_, i64>(
            "SELECT revision FROM documents WHERE collection = $1 AND id = $2",
        )
        .bind(collection)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        match (actual, expected_revision) {
            (Some(actual), Some(expected)) => Err(DocStoreError::RevisionConflict {
                collection: collection.to_string(),
                id: id.to_string(),
                expected,
                actual: u64::try_from(actual).unwrap_or_default(),
            }),
            _ => Err(DocStoreError::NotFound {
                collection: collection.to_string(),
                id: id.to_string(),
            }),
        }
    }

    async fn delete(&self, collection: &str, id: &str) -> DocStoreResult<bool> {
        let deleted = sqlx::query("DELETE FROM documents WHERE collection = $1 AND id = $2")
            .bind(collection)
            .bind(id)
            .execute(&self.pool)
            .await?
            .rows_affected();

        Ok(deleted > 0)
    }

    async fn delete_where(&self, collection: &str, query: &Query) -> DocStoreResult<u64> {
        let mut builder = QueryBuilder::<Postgres>::new("DELETE FROM documents");
        Self::push_where(&mut builder, collection, query);

        let deleted = builder.build().execute(&self.pool).await?.rows_affected();

        tracing::debug!(collection, deleted, "Deleted matching documents");

        Ok(deleted)
    }
}
