use super::{Fields, Schema, ValidationError};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Line item. `name` and `price` are copies taken by the client and are not checked
/// against the referenced tree.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OrderItem {
    /// Referenced tree id as string.
    pub tree_id: String,
    pub name: String,
    pub price: f64,
    pub quantity: i64,
}

impl OrderItem {
    fn from_value(value: &Value, path: &str) -> Result<Self, ValidationError> {
        let mut f = Fields::at(value, path);
        let item = OrderItem {
            tree_id: f.string("tree_id"),
            name: f.string("name"),
            price: f.number("price", None),
            quantity: f.integer("quantity", Some(1), None),
        };
        f.finish(item)
    }
}

/// Customer order. Collection: `order`.
///
/// `total` is trusted as sent; it is not compared with `subtotal + shipping`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub customer_name: String,
    pub email: String,
    pub address: String,
    pub city: String,
    pub postal_code: String,
    pub items: Vec<OrderItem>,
    pub subtotal: f64,
    pub shipping: f64,
    pub total: f64,
}

impl Schema for Order {
    const COLLECTION: &'static str = "order";

    fn from_value(value: &Value, path: &str) -> Result<Self, ValidationError> {
        let mut f = Fields::at(value, path);
        let order = Order {
            customer_name: f.string("customer_name"),
            email: f.email("email"),
            address: f.string("address"),
            city: f.string("city"),
            postal_code: f.string("postal_code"),
            items: f.list("items", 1, OrderItem::from_value),
            subtotal: f.number("subtotal", Some(0.0)),
            shipping: f.number("shipping", Some(0.0)),
            total: f.number("total", Some(0.0)),
        };
        f.finish(order)
    }
}
