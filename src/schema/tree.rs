use super::{Fields, Schema, ValidationError};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Christmas tree product. Collection: `tree`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Tree {
    pub name: String,
    pub description: Option<String>,
    /// Price in USD.
    pub price: f64,
    /// Size label, e.g. Small, Medium, Large.
    pub size: String,
    /// Image URL.
    pub image: Option<String>,
    pub in_stock: bool,
}

impl Schema for Tree {
    const COLLECTION: &'static str = "tree";

    fn from_value(value: &Value, path: &str) -> Result<Self, ValidationError> {
        let mut f = Fields::at(value, path);
        let tree = Tree {
            name: f.string("name"),
            description: f.optional_string("description"),
            price: f.number("price", Some(0.0)),
            size: f.string("size"),
            image: f.optional_string("image"),
            in_stock: f.flag("in_stock", true),
        };
        f.finish(tree)
    }
}
