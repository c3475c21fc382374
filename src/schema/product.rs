use super::{Fields, Schema, ValidationError};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Collection: `product`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub title: String,
    pub description: Option<String>,
    /// Price in dollars.
    pub price: f64,
    pub category: String,
    pub in_stock: bool,
}

impl Schema for Product {
    const COLLECTION: &'static str = "product";

    fn from_value(value: &Value, path: &str) -> Result<Self, ValidationError> {
        let mut f = Fields::at(value, path);
        let product = Product {
            title: f.string("title"),
            description: f.optional_string("description"),
            price: f.number("price", Some(0.0)),
            category: f.string("category"),
            in_stock: f.flag("in_stock", true),
        };
        f.finish(product)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn wrong_types_are_listed() {
        let doc = json!({ "title": 7, "price": 3.5, "category": "garland", "in_stock": "no" });
        let err = Product::from_value(&doc, "").unwrap_err();
        assert_eq!(err.fields(), vec!["title", "in_stock"]);
    }
}
