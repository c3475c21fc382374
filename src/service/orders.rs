//! Order placement: every referenced tree must exist before anything is written.

use crate::error::AppError;
use crate::schema::{Order, Schema, Tree};
use crate::store::{DocumentId, DocumentStore};

pub struct OrderService;

impl OrderService {
    /// Check every item's `tree_id`, then insert the order. Returns the new order id.
    ///
    /// The existence check and the insert are not one transaction; a tree removed in
    /// between leaves the order with a dangling reference.
    pub async fn place_order(store: &dyn DocumentStore, order: &Order) -> Result<String, AppError> {
        for item in &order.items {
            Self::resolve_tree(store, &item.tree_id).await?;
        }
        let document = order
            .to_document()
            .map_err(|e| AppError::Storage(format!("order not serializable: {}", e)))?;
        let order_id = store.create_document(Order::COLLECTION, document).await?;
        tracing::info!(%order_id, items = order.items.len(), total = order.total, "order placed");
        Ok(order_id)
    }

    async fn resolve_tree(store: &dyn DocumentStore, tree_id: &str) -> Result<DocumentId, AppError> {
        if tree_id.is_empty() {
            return Err(AppError::BadRequest("Missing tree_id in item".into()));
        }
        let id: DocumentId = tree_id.parse().map_err(|_| {
            tracing::warn!(tree_id, "malformed tree_id in order");
            AppError::Reference(tree_id.to_string())
        })?;
        match store.find_document(Tree::COLLECTION, &id).await? {
            Some(_) => Ok(id),
            None => {
                tracing::warn!(tree_id, "order references unknown tree");
                Err(AppError::Reference(tree_id.to_string()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::OrderItem;
    use crate::service::CatalogService;
    use crate::store::MemoryDocumentStore;
    use pretty_assertions::assert_eq;

    fn order_for(tree_ids: &[&str]) -> Order {
        Order {
            customer_name: "Ada Lovelace".into(),
            email: "ada@example.com".into(),
            address: "12 Holly Lane".into(),
            city: "London".into(),
            postal_code: "N1 9GU".into(),
            items: tree_ids
                .iter()
                .map(|id| OrderItem {
                    tree_id: id.to_string(),
                    name: "Fraser Fir".into(),
                    price: 89.0,
                    quantity: 1,
                })
                .collect(),
            subtotal: 89.0,
            shipping: 0.0,
            total: 89.0,
        }
    }

    async fn seeded() -> (MemoryDocumentStore, Vec<String>) {
        let store = MemoryDocumentStore::default();
        CatalogService::seed_trees(&store).await.unwrap();
        let ids = CatalogService::list_trees(&store)
            .await
            .unwrap()
            .into_iter()
            .map(|t| t.id)
            .collect();
        (store, ids)
    }

    #[tokio::test]
    async fn stores_order_when_all_trees_exist() {
        let (store, ids) = seeded().await;
        let order = order_for(&[ids[0].as_str(), ids[2].as_str()]);
        let order_id = OrderService::place_order(&store, &order).await.unwrap();
        assert!(!order_id.is_empty());
        let stored = store
            .find_document("order", &order_id.parse().unwrap())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(Order::from_document(&stored).unwrap(), order);
    }

    #[tokio::test]
    async fn unknown_tree_aborts_without_insert() {
        let (store, ids) = seeded().await;
        let missing = DocumentId::generate().to_string();
        let order = order_for(&[ids[0].as_str(), missing.as_str()]);
        let err = OrderService::place_order(&store, &order).await.unwrap_err();
        assert!(matches!(err, AppError::Reference(ref id) if *id == missing));
        assert_eq!(store.count_documents("order").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn malformed_and_empty_tree_ids() {
        let (store, _) = seeded().await;
        let err = OrderService::place_order(&store, &order_for(&["64b7f0c2e1"])).await.unwrap_err();
        assert_eq!(err.to_string(), "Invalid tree_id: 64b7f0c2e1");
        let err = OrderService::place_order(&store, &order_for(&[""])).await.unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
        let err = OrderService::place_order(&store, &order_for(&["   "])).await.unwrap_err();
        assert!(matches!(err, AppError::Reference(ref id) if id == "   "));
        assert_eq!(store.count_documents("order").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn non_canonical_tree_ids_are_rejected() {
        let (store, ids) = seeded().await;
        for alias in [
            format!("urn:uuid:{}", ids[0]),
            format!(" {} ", ids[0]),
            ids[0].to_uppercase(),
            ids[0].replace('-', ""),
        ] {
            let err = OrderService::place_order(&store, &order_for(&[alias.as_str()])).await.unwrap_err();
            assert!(matches!(err, AppError::Reference(ref id) if *id == alias));
        }
        assert_eq!(store.count_documents("order").await.unwrap(), 0);
    }
}
