use async_trait::async_trait;
use sqlx::{PgPool, types::Json};

use super::{Document, DocumentStore, Fields, StoreError, new_document_id, split_server_timestamps};

const INSERT_DOCUMENT: &str = r#"
    INSERT INTO documents (collection, id, fields)
    VALUES (
        $1,
        $2,
        $3::jsonb || COALESCE(
            (SELECT jsonb_object_agg(t.name, jsonb_build_object('timestampValue', now()))
             FROM unnest($4::text[]) AS t(name)),
            '{}'::jsonb
        )
    )
"#;

// `||` keeps fields that are not named in $3/$4, such as `created_at`.
const UPDATE_DOCUMENT: &str = r#"
    UPDATE documents
    SET fields = fields || $3::jsonb || COALESCE(
        (SELECT jsonb_object_agg(t.name, jsonb_build_object('timestampValue', now()))
         FROM unnest($4::text[]) AS t(name)),
        '{}'::jsonb
    )
    WHERE collection = $1 AND id = $2
"#;

/// PostgresDocumentStore
///
/// The `DocumentStore` implementation backed by PostgreSQL. Every collection
/// lives in the single `documents` table; the document body is a JSONB object
/// of typed field values.
#[derive(Clone)]
pub struct PostgresDocumentStore {
    pool: PgPool,
}

impl PostgresDocumentStore {
    /// Creates a new store using the initialized connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// migrate
    ///
    /// Applies the embedded migrations (creates the `documents` table).
    /// Safe to call on every startup.
    pub async fn migrate(&self) -> Result<(), StoreError> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await?;
        Ok(())
    }
}

#[async_trait]
impl DocumentStore for PostgresDocumentStore {
    async fn add(&self, collection: &str, fields: Fields) -> Result<String, StoreError> {
        let (values, stamped) = split_server_timestamps(fields);
        let id = new_document_id();

        // Stamped fields get `now()` from the database clock, not ours.
        sqlx::query(INSERT_DOCUMENT)
            .bind(collection)
            .bind(&id)
            .bind(Json(&values))
            .bind(stamped)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("add error in {}: {:?}", collection, e);
                StoreError::from(e)
            })?;

        Ok(id)
    }

    async fn list(&self, collection: &str) -> Result<Vec<Document>, StoreError> {
        let rows = sqlx::query_as::<_, (String, Json<Fields>)>(
            "SELECT id, fields FROM documents WHERE collection = $1",
        )
        .bind(collection)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("list error in {}: {:?}", collection, e);
            StoreError::from(e)
        })?;

        Ok(rows
            .into_iter()
            .map(|(id, Json(fields))| Document { id, fields })
            .collect())
    }

    /// Zero affected rows means the id is absent.
    async fn update(&self, collection: &str, id: &str, fields: Fields) -> Result<(), StoreError> {
        let (values, stamped) = split_server_timestamps(fields);

        let result = sqlx::query(UPDATE_DOCUMENT)
            .bind(collection)
            .bind(id)
            .bind(Json(&values))
            .bind(stamped)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("update error for {}/{}: {:?}", collection, id, e);
                StoreError::from(e)
            })?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound {
                collection: collection.to_string(),
                id: id.to_string(),
            });
        }
        Ok(())
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM documents WHERE collection = $1 AND id = $2")
            .bind(collection)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("delete error for {}/{}: {:?}", collection, id, e);
                StoreError::from(e)
            })?;
        Ok(())
    }
}
