//! Tree catalog: listing and one-time seeding.

use crate::error::AppError;
use crate::schema::{Schema, Tree};
use crate::store::{DocumentStore, ID_KEY};
use serde::Serialize;

/// Tree as returned to clients, with its identifier as a public `id`.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TreeRecord {
    pub id: String,
    #[serde(flatten)]
    pub tree: Tree,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SeedOutcome {
    /// The collection already had this many trees; nothing was written.
    AlreadySeeded(u64),
    /// This many sample trees were inserted.
    Seeded(u64),
}

/// Sample catalog inserted by seeding, in insertion order.
pub fn sample_trees() -> Vec<Tree> {
    vec![
        Tree {
            name: "Fraser Fir".into(),
            description: Some("Soft needles, strong branches, classic fragrance.".into()),
            price: 89.0,
            size: "Medium".into(),
            image: Some("https://images.unsplash.com/photo-1543589077-5161fec4e69b?w=800&q=80".into()),
            in_stock: true,
        },
        Tree {
            name: "Douglas Fir".into(),
            description: Some("Full shape, sweet scent, budget friendly.".into()),
            price: 69.0,
            size: "Small".into(),
            image: Some("https://images.unsplash.com/photo-1512070800541-1ff33acc2d64?w=800&q=80".into()),
            in_stock: true,
        },
        Tree {
            name: "Nordmann Fir".into(),
            description: Some("Excellent needle retention, deep green color.".into()),
            price: 119.0,
            size: "Large".into(),
            image: Some("https://images.unsplash.com/photo-1484704849700-f032a568e944?w=800&q=80".into()),
            in_stock: true,
        },
    ]
}

pub struct CatalogService;

impl CatalogService {
    /// Every stored tree in insertion order. A stored document that no longer
    /// satisfies the Tree schema is a storage error, not a client error.
    pub async fn list_trees(store: &dyn DocumentStore) -> Result<Vec<TreeRecord>, AppError> {
        let docs = store.get_documents(Tree::COLLECTION).await?;
        let mut out = Vec::with_capacity(docs.len());
        for mut doc in docs {
            let id = doc
                .remove(ID_KEY)
                .and_then(|v| v.as_str().map(String::from))
                .ok_or_else(|| AppError::Storage("tree document without identifier".into()))?;
            let tree = Tree::from_document(&doc)
                .map_err(|e| AppError::Storage(format!("tree {} is invalid: {}", id, e)))?;
            out.push(TreeRecord { id, tree });
        }
        Ok(out)
    }

    /// Insert the sample trees unless the collection already has any.
    pub async fn seed_trees(store: &dyn DocumentStore) -> Result<SeedOutcome, AppError> {
        let existing = store.count_documents(Tree::COLLECTION).await?;
        if existing > 0 {
            tracing::info!(existing, "tree collection already seeded");
            return Ok(SeedOutcome::AlreadySeeded(existing));
        }
        let sample = sample_trees();
        for tree in &sample {
            let document = tree
                .to_document()
                .map_err(|e| AppError::Storage(format!("tree not serializable: {}", e)))?;
            store.create_document(Tree::COLLECTION, document).await?;
        }
        tracing::info!(count = sample.len(), "seeded tree collection");
        Ok(SeedOutcome::Seeded(sample.len() as u64))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryDocumentStore;
    use serde_json::json;

    #[tokio::test]
    async fn seeding_twice_keeps_three_trees() {
        let store = MemoryDocumentStore::default();
        assert_eq!(CatalogService::seed_trees(&store).await.unwrap(), SeedOutcome::Seeded(3));
        assert_eq!(CatalogService::seed_trees(&store).await.unwrap(), SeedOutcome::AlreadySeeded(3));
        assert_eq!(store.count_documents("tree").await.unwrap(), 3);
    }

    #[tokio::test]
    async fn listing_exposes_ids_and_fields() {
        let store = MemoryDocumentStore::default();
        CatalogService::seed_trees(&store).await.unwrap();
        let trees = CatalogService::list_trees(&store).await.unwrap();
        let names: Vec<_> = trees.iter().map(|t| t.tree.name.as_str()).collect();
        assert_eq!(names, vec!["Fraser Fir", "Douglas Fir", "Nordmann Fir"]);
        assert!(trees.iter().all(|t| !t.id.is_empty()));
        assert_eq!(trees[0].tree, sample_trees()[0]);
    }

    #[tokio::test]
    async fn invalid_stored_tree_is_a_storage_error() {
        let store = MemoryDocumentStore::default();
        let mut bad = crate::store::Document::new();
        bad.insert("name".into(), json!("Broken"));
        store.create_document("tree", bad).await.unwrap();
        let err = CatalogService::list_trees(&store).await.unwrap_err();
        assert!(matches!(err, AppError::Storage(_)));
    }

    #[test]
    fn record_serializes_id_first() {
        let record = TreeRecord {
            id: "abc".into(),
            tree: sample_trees().remove(1),
        };
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["id"], json!("abc"));
        assert_eq!(value["price"], json!(69.0));
        assert_eq!(value.as_object().unwrap().keys().next().map(String::as_str), Some("id"));
    }
}
