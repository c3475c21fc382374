//! PostgreSQL document store. Each collection is a table `<schema>.<collection>` holding one
//! JSONB document per row; tables are created on first use.

use super::{check_collection, is_identifier, with_id, Document, DocumentId, DocumentStore, ID_KEY};
use crate::error::{AppError, ConfigError};
use async_trait::async_trait;
use serde_json::Value;
use sqlx::postgres::PgConnectOptions;
use sqlx::ConnectOptions;
use sqlx::PgPool;
use std::collections::HashSet;
use std::str::FromStr;
use std::sync::RwLock;
use uuid::Uuid;

pub struct PgDocumentStore {
    pool: PgPool,
    schema: String,
    /// Collections whose table is known to exist.
    ensured: RwLock<HashSet<String>>,
}

impl PgDocumentStore {
    /// Wrap `pool` and create `schema` if missing. `schema` must be a lowercase identifier.
    pub async fn new(pool: PgPool, schema: &str) -> Result<Self, AppError> {
        if !is_identifier(schema) {
            return Err(AppError::Storage(format!("invalid schema name: '{}'", schema)));
        }
        sqlx::query(&format!("CREATE SCHEMA IF NOT EXISTS {}", quote_ident(schema)))
            .execute(&pool)
            .await?;
        tracing::info!(schema, "document store ready");
        Ok(PgDocumentStore {
            pool,
            schema: schema.to_string(),
            ensured: RwLock::new(HashSet::new()),
        })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    fn qualified(&self, collection: &str) -> String {
        format!("{}.{}", quote_ident(&self.schema), quote_ident(collection))
    }

    fn is_ensured(&self, collection: &str) -> bool {
        self.ensured
            .read()
            .map(|set| set.contains(collection))
            .unwrap_or(false)
    }

    /// Create the collection table if this process has not seen it yet. Returns the qualified name.
    async fn ensure_collection(&self, collection: &str) -> Result<String, AppError> {
        check_collection(collection)?;
        let q_table = self.qualified(collection);
        if self.is_ensured(collection) {
            return Ok(q_table);
        }
        let ddl = format!(
            r#"
            CREATE TABLE IF NOT EXISTS {} (
                seq BIGSERIAL,
                id UUID PRIMARY KEY,
                document JSONB NOT NULL,
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
            )
            "#,
            q_table
        );
        sqlx::query(&ddl).execute(&self.pool).await?;
        if let Ok(mut set) = self.ensured.write() {
            set.insert(collection.to_string());
        }
        tracing::debug!(collection, "collection table ensured");
        Ok(q_table)
    }
}

fn into_document(id: Uuid, value: Value) -> Result<Document, AppError> {
    match value {
        Value::Object(map) => Ok(with_id(&DocumentId(id), map)),
        other => Err(AppError::Storage(format!(
            "document {} is not an object: {}",
            id, other
        ))),
    }
}

#[async_trait]
impl DocumentStore for PgDocumentStore {
    fn name(&self) -> &str {
        &self.schema
    }

    async fn create_document(&self, collection: &str, mut record: Document) -> Result<String, AppError> {
        let q_table = self.ensure_collection(collection).await?;
        record.remove(ID_KEY);
        let id = DocumentId::generate();
        sqlx::query(&format!("INSERT INTO {} (id, document) VALUES ($1, $2)", q_table))
            .bind(id.as_uuid())
            .bind(Value::Object(record))
            .execute(&self.pool)
            .await?;
        tracing::info!(collection, %id, "document inserted");
        Ok(id.to_string())
    }

    async fn get_documents(&self, collection: &str) -> Result<Vec<Document>, AppError> {
        let q_table = self.ensure_collection(collection).await?;
        let rows: Vec<(Uuid, Value)> = sqlx::query_as(&format!("SELECT id, document FROM {} ORDER BY seq", q_table))
            .fetch_all(&self.pool)
            .await?;
        tracing::debug!(collection, count = rows.len(), "documents read");
        rows.into_iter().map(|(id, doc)| into_document(id, doc)).collect()
    }

    async fn find_document(&self, collection: &str, id: &DocumentId) -> Result<Option<Document>, AppError> {
        let q_table = self.ensure_collection(collection).await?;
        let row: Option<(Uuid, Value)> = sqlx::query_as(&format!("SELECT id, document FROM {} WHERE id = $1", q_table))
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await?;
        row.map(|(id, doc)| into_document(id, doc)).transpose()
    }

    async fn count_documents(&self, collection: &str) -> Result<u64, AppError> {
        let q_table = self.ensure_collection(collection).await?;
        let (count,): (i64,) = sqlx::query_as(&format!("SELECT COUNT(*) FROM {}", q_table))
            .fetch_one(&self.pool)
            .await?;
        Ok(count.max(0) as u64)
    }

    async fn list_collection_names(&self) -> Result<Vec<String>, AppError> {
        let names: Vec<(String,)> = sqlx::query_as(
            "SELECT table_name::text FROM information_schema.tables WHERE table_schema = $1 ORDER BY table_name",
        )
        .bind(&self.schema)
        .fetch_all(&self.pool)
        .await?;
        Ok(names.into_iter().map(|(n,)| n).collect())
    }
}

/// Connect to the server's `postgres` database and create the database named in `database_url` if missing.
pub async fn ensure_database_exists(database_url: &str) -> Result<(), AppError> {
    let Some((admin, db_name)) = admin_options(database_url)? else {
        return Ok(());
    };
    let mut conn: sqlx::PgConnection = admin.connect().await.map_err(AppError::Db)?;
    let exists: (bool,) = sqlx::query_as("SELECT EXISTS(SELECT 1 FROM pg_database WHERE datname = $1)")
        .bind(&db_name)
        .fetch_one(&mut conn)
        .await
        .map_err(AppError::Db)?;
    if !exists.0 {
        tracing::info!(database = %db_name, "creating database");
        sqlx::query(&format!("CREATE DATABASE {}", quote_ident(&db_name)))
            .execute(&mut conn)
            .await
            .map_err(AppError::Db)?;
    }
    Ok(())
}

/// Options for the `postgres` maintenance database with every other setting of `database_url`
/// kept, plus the target database name. None when the URL names no database or names `postgres`.
fn admin_options(database_url: &str) -> Result<Option<(PgConnectOptions, String)>, AppError> {
    let opts = PgConnectOptions::from_str(database_url).map_err(|e| ConfigError::InvalidVar {
        name: "DATABASE_URL",
        value: e.to_string(),
    })?;
    let db_name = match opts.get_database() {
        Some(name) if !name.is_empty() && name != "postgres" => name.to_string(),
        _ => return Ok(None),
    };
    Ok(Some((opts.database("postgres"), db_name)))
}

fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}
