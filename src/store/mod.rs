//! Document store adapter: collection-scoped create and read over schema-flexible records.

mod memory;
mod postgres;

pub use memory::MemoryDocumentStore;
pub use postgres::{ensure_database_exists, PgDocumentStore};

use crate::error::AppError;
use async_trait::async_trait;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;
use thiserror::Error;
use uuid::Uuid;

/// Raw persisted record. Key order is preserved.
pub type Document = serde_json::Map<String, serde_json::Value>;

/// Reserved key carrying the store-assigned identifier on documents read back.
pub const ID_KEY: &str = "_id";

/// Store-assigned identifier. Only obtainable from the store or by parsing its string form.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(Uuid);

#[derive(Error, Debug, Clone, PartialEq)]
#[error("not a document id: '{0}'")]
pub struct InvalidDocumentId(pub String);

impl DocumentId {
    pub(crate) fn generate() -> Self {
        DocumentId(Uuid::new_v4())
    }

    pub(crate) fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl FromStr for DocumentId {
    type Err = InvalidDocumentId;

    /// Accepts only the lowercase hyphenated form produced by `Display`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match Uuid::try_parse(s) {
            Ok(uuid) if uuid.hyphenated().to_string() == s => Ok(DocumentId(uuid)),
            _ => Err(InvalidDocumentId(s.to_string())),
        }
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}

/// Collection-scoped document operations. Implementations are shared across requests.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Database name reported by diagnostics.
    fn name(&self) -> &str;

    /// Insert `record` and return its new identifier. Any `_id` in the record is discarded.
    async fn create_document(&self, collection: &str, record: Document) -> Result<String, AppError>;

    /// Every document in insertion order, each with its identifier under `_id`.
    async fn get_documents(&self, collection: &str) -> Result<Vec<Document>, AppError>;

    /// One document by identifier, with `_id` set.
    async fn find_document(&self, collection: &str, id: &DocumentId) -> Result<Option<Document>, AppError>;

    async fn count_documents(&self, collection: &str) -> Result<u64, AppError>;

    async fn list_collection_names(&self) -> Result<Vec<String>, AppError>;
}

fn identifier_regex() -> &'static Regex {
    static IDENT: OnceLock<Regex> = OnceLock::new();
    IDENT.get_or_init(|| Regex::new(r"^[a-z_][a-z0-9_]{0,62}$").expect("identifier pattern is valid"))
}

/// Lowercase SQL-safe identifier, used for collection and database names.
pub fn is_identifier(name: &str) -> bool {
    identifier_regex().is_match(name)
}

pub(crate) fn check_collection(collection: &str) -> Result<(), AppError> {
    if is_identifier(collection) {
        Ok(())
    } else {
        Err(AppError::Storage(format!("invalid collection name: '{}'", collection)))
    }
}

/// Copy of `record` with `_id` set to `id`, placed first.
pub(crate) fn with_id(id: &DocumentId, record: Document) -> Document {
    let mut out = Document::with_capacity(record.len() + 1);
    out.insert(ID_KEY.to_string(), serde_json::Value::String(id.to_string()));
    out.extend(record.into_iter().filter(|(k, _)| k != ID_KEY));
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_id_round_trips_through_string() {
        let id = DocumentId::generate();
        let parsed: DocumentId = id.to_string().parse().unwrap();
        assert_eq!(parsed, id);
    }

    #[test]
    fn malformed_document_id_is_rejected() {
        let err = "64b7f0c2e1".parse::<DocumentId>().unwrap_err();
        assert_eq!(err, InvalidDocumentId("64b7f0c2e1".into()));
        assert!("".parse::<DocumentId>().is_err());
    }

    #[test]
    fn only_canonical_form_parses() {
        let id = DocumentId::generate().to_string();
        let simple = id.replace('-', "");
        for alias in [
            format!("urn:uuid:{}", id),
            format!("{{{}}}", id),
            format!(" {} ", id),
            id.to_uppercase(),
            simple,
        ] {
            assert_eq!(alias.parse::<DocumentId>(), Err(InvalidDocumentId(alias.clone())));
        }
        assert!(id.parse::<DocumentId>().is_ok());
    }

    #[test]
    fn collection_names_must_be_identifiers() {
        assert!(check_collection("tree").is_ok());
        assert!(check_collection("order_archive").is_ok());
        assert!(check_collection("Tree").is_err());
        assert!(check_collection("tree; DROP TABLE x").is_err());
        assert!(check_collection("").is_err());
    }

    #[test]
    fn with_id_replaces_caller_id() {
        let id = DocumentId::generate();
        let mut record = Document::new();
        record.insert(ID_KEY.into(), "forged".into());
        record.insert("name".into(), "Fraser Fir".into());
        let doc = with_id(&id, record);
        assert_eq!(doc.len(), 2);
        assert_eq!(doc.get(ID_KEY).and_then(|v| v.as_str()), Some(id.to_string().as_str()));
    }
}
