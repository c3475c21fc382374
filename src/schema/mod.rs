//! Record schemas: typed entities built from raw documents with per-field validation.

mod fields;
mod order;
mod product;
mod tree;
mod user;

pub use order::{Order, OrderItem};
pub use product::Product;
pub use tree::Tree;
pub use user::User;

pub(crate) use fields::Fields;

use crate::store::Document;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

/// A record type stored in its own collection.
pub trait Schema: Serialize + Sized {
    /// Collection name: the lowercase type name.
    const COLLECTION: &'static str;

    /// Build the record from a raw document at the top level.
    fn from_document(doc: &Document) -> Result<Self, ValidationError> {
        Self::from_value(&Value::Object(doc.clone()), "")
    }

    /// Build the record from a value nested at `path` (empty for top level).
    fn from_value(value: &Value, path: &str) -> Result<Self, ValidationError>;

    /// Raw document for persistence. Optional fields are written as null.
    /// Fails if the record does not serialize to a JSON object.
    fn to_document(&self) -> Result<Document, serde_json::Error> {
        match serde_json::to_value(self)? {
            Value::Object(map) => Ok(map),
            other => Err(serde::ser::Error::custom(format!(
                "{} record serialized to a non-object: {}",
                Self::COLLECTION,
                other
            ))),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Serialize)]
pub enum ViolationKind {
    #[error("field required")]
    Missing,
    #[error("expected {expected}")]
    WrongType { expected: &'static str },
    #[error("must be greater than or equal to {min}")]
    BelowMinimum { min: f64 },
    #[error("must be less than or equal to {max}")]
    AboveMaximum { max: f64 },
    #[error("value is not a valid email address")]
    InvalidEmail,
    #[error("must contain at least {min} item(s)")]
    TooFewItems { min: usize },
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldViolation {
    pub field: String,
    pub kind: ViolationKind,
}

impl Serialize for FieldViolation {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeStruct;
        let mut s = serializer.serialize_struct("FieldViolation", 2)?;
        s.serialize_field("field", &self.field)?;
        s.serialize_field("message", &self.kind.to_string())?;
        s.end()
    }
}

/// Every violation found in one record, in field order.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("validation failed: {}", summary(.violations))]
pub struct ValidationError {
    pub violations: Vec<FieldViolation>,
}

impl ValidationError {
    pub fn single(field: impl Into<String>, kind: ViolationKind) -> Self {
        ValidationError {
            violations: vec![FieldViolation {
                field: field.into(),
                kind,
            }],
        }
    }

    pub fn fields(&self) -> Vec<&str> {
        self.violations.iter().map(|v| v.field.as_str()).collect()
    }
}

fn summary(violations: &[FieldViolation]) -> String {
    violations
        .iter()
        .map(|v| format!("{} {}", v.field, v.kind))
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Serialize)]
    struct Label(String);

    impl Schema for Label {
        const COLLECTION: &'static str = "label";

        fn from_value(value: &Value, _path: &str) -> Result<Self, ValidationError> {
            Ok(Label(value.as_str().unwrap_or_default().to_string()))
        }
    }

    #[test]
    fn non_object_record_does_not_become_an_empty_document() {
        let err = Label("star".into()).to_document().unwrap_err();
        assert!(err.to_string().contains("non-object"));
    }
}
