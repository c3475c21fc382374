use super::{Fields, Schema, ValidationError};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Collection: `user`. The email is stored as given, without format checks.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub name: String,
    pub email: String,
    pub address: String,
    /// Age in years, 0..=120.
    pub age: Option<i64>,
    pub is_active: bool,
}

impl Schema for User {
    const COLLECTION: &'static str = "user";

    fn from_value(value: &Value, path: &str) -> Result<Self, ValidationError> {
        let mut f = Fields::at(value, path);
        let user = User {
            name: f.string("name"),
            email: f.string("email"),
            address: f.string("address"),
            age: f.optional_integer("age", Some(0), Some(120)),
            is_active: f.flag("is_active", true),
        };
        f.finish(user)
    }
}
