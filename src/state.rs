//! Shared application state for all routes. The store is connected once at startup and reused.

use crate::config::Settings;
use crate::error::AppError;
use crate::store::{ensure_database_exists, DocumentStore, PgDocumentStore};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    /// None when no `DATABASE_URL` is configured; store-backed routes then fail with 500.
    pub store: Option<Arc<dyn DocumentStore>>,
    pub settings: Arc<Settings>,
}

impl AppState {
    pub fn new(store: Option<Arc<dyn DocumentStore>>, settings: Settings) -> Self {
        AppState {
            store,
            settings: Arc::new(settings),
        }
    }

    /// Connect to PostgreSQL when a URL is configured, creating the database and schema if missing.
    pub async fn connect(settings: Settings) -> Result<Self, AppError> {
        let Some(url) = settings.database_url.clone() else {
            tracing::warn!("DATABASE_URL not set; store-backed routes will fail");
            return Ok(AppState::new(None, settings));
        };
        ensure_database_exists(&url).await?;
        let pool = sqlx::postgres::PgPoolOptions::new()
            .max_connections(settings.max_connections)
            .connect(&url)
            .await?;
        let store = PgDocumentStore::new(pool, &settings.database_name).await?;
        Ok(AppState::new(Some(Arc::new(store)), settings))
    }

    /// The configured store, or `StorageUnavailable`.
    pub fn store(&self) -> Result<&dyn DocumentStore, AppError> {
        self.store.as_deref().ok_or(AppError::StorageUnavailable)
    }
}
