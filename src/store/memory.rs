//! In-process document store. Used by tests and for running without PostgreSQL.

use super::{check_collection, with_id, Document, DocumentId, DocumentStore, ID_KEY};
use crate::error::AppError;
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::RwLock;

type Collections = BTreeMap<String, Vec<(DocumentId, Document)>>;

pub struct MemoryDocumentStore {
    name: String,
    collections: RwLock<Collections>,
}

impl MemoryDocumentStore {
    pub fn new(name: impl Into<String>) -> Self {
        MemoryDocumentStore {
            name: name.into(),
            collections: RwLock::new(BTreeMap::new()),
        }
    }

    fn read(&self) -> Result<std::sync::RwLockReadGuard<'_, Collections>, AppError> {
        self.collections
            .read()
            .map_err(|_| AppError::Storage("memory store lock poisoned".into()))
    }
}

impl Default for MemoryDocumentStore {
    fn default() -> Self {
        MemoryDocumentStore::new("memory")
    }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    fn name(&self) -> &str {
        &self.name
    }

    async fn create_document(&self, collection: &str, mut record: Document) -> Result<String, AppError> {
        check_collection(collection)?;
        record.remove(ID_KEY);
        let id = DocumentId::generate();
        let mut collections = self
            .collections
            .write()
            .map_err(|_| AppError::Storage("memory store lock poisoned".into()))?;
        collections
            .entry(collection.to_string())
            .or_default()
            .push((id, record));
        Ok(id.to_string())
    }

    async fn get_documents(&self, collection: &str) -> Result<Vec<Document>, AppError> {
        check_collection(collection)?;
        let collections = self.read()?;
        Ok(collections
            .get(collection)
            .map(|docs| docs.iter().map(|(id, doc)| with_id(id, doc.clone())).collect())
            .unwrap_or_default())
    }

    async fn find_document(&self, collection: &str, id: &DocumentId) -> Result<Option<Document>, AppError> {
        check_collection(collection)?;
        let collections = self.read()?;
        Ok(collections
            .get(collection)
            .and_then(|docs| docs.iter().find(|(doc_id, _)| doc_id == id))
            .map(|(doc_id, doc)| with_id(doc_id, doc.clone())))
    }

    async fn count_documents(&self, collection: &str) -> Result<u64, AppError> {
        check_collection(collection)?;
        let collections = self.read()?;
        Ok(collections.get(collection).map(|d| d.len() as u64).unwrap_or(0))
    }

    async fn list_collection_names(&self) -> Result<Vec<String>, AppError> {
        Ok(self.read()?.keys().cloned().collect())
    }
}
