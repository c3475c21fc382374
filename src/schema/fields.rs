//! Field reader that collects violations instead of stopping at the first one.
//!
//! Accessors return a placeholder when a field is invalid; the placeholder never escapes
//! because `finish` fails whenever a violation was recorded.

use super::{FieldViolation, ValidationError, ViolationKind};
use crate::store::Document;
use regex::Regex;
use serde_json::Value;
use std::sync::OnceLock;

fn email_regex() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| {
        Regex::new(r"^[A-Za-z0-9.!#$%&'*+/=?^_`{|}~-]+@[A-Za-z0-9](?:[A-Za-z0-9-]*[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]*[A-Za-z0-9])?)+$")
            .expect("email pattern is valid")
    })
}

pub fn is_email(s: &str) -> bool {
    email_regex().is_match(s)
}

pub(crate) struct Fields<'a> {
    path: String,
    object: Option<&'a Document>,
    violations: Vec<FieldViolation>,
}

impl<'a> Fields<'a> {
    /// Reader over `value` located at `path`. A non-object value is itself a violation.
    pub fn at(value: &'a Value, path: &str) -> Self {
        let mut fields = Fields {
            path: path.to_string(),
            object: value.as_object(),
            violations: Vec::new(),
        };
        if fields.object.is_none() {
            let kind = if value.is_null() {
                ViolationKind::Missing
            } else {
                ViolationKind::WrongType { expected: "object" }
            };
            fields.violations.push(FieldViolation {
                field: if path.is_empty() { "$".into() } else { path.into() },
                kind,
            });
        }
        fields
    }

    fn field_path(&self, name: &str) -> String {
        if self.path.is_empty() {
            name.to_string()
        } else {
            format!("{}.{}", self.path, name)
        }
    }

    fn reject(&mut self, name: &str, kind: ViolationKind) {
        let field = self.field_path(name);
        self.violations.push(FieldViolation { field, kind });
    }

    /// Present and non-null value. Absent objects report nothing extra.
    fn present(&self, name: &str) -> Option<&'a Value> {
        self.object?.get(name).filter(|v| !v.is_null())
    }

    fn require(&mut self, name: &str) -> Option<&'a Value> {
        let value = self.present(name);
        if value.is_none() && self.object.is_some() {
            self.reject(name, ViolationKind::Missing);
        }
        value
    }

    fn as_str(&mut self, name: &str, value: &'a Value) -> Option<String> {
        match value.as_str() {
            Some(s) => Some(s.to_string()),
            None => {
                self.reject(name, ViolationKind::WrongType { expected: "string" });
                None
            }
        }
    }

    fn as_number(&mut self, name: &str, value: &'a Value, min: Option<f64>) -> Option<f64> {
        let Some(n) = value.as_f64() else {
            self.reject(name, ViolationKind::WrongType { expected: "number" });
            return None;
        };
        if let Some(min) = min {
            if n < min {
                self.reject(name, ViolationKind::BelowMinimum { min });
                return None;
            }
        }
        Some(n)
    }

    fn as_integer(&mut self, name: &str, value: &'a Value, min: Option<i64>, max: Option<i64>) -> Option<i64> {
        let n = match value.as_i64() {
            Some(n) => n,
            None => match value.as_f64() {
                Some(f) if f.fract() == 0.0 && f >= i64::MIN as f64 && f <= i64::MAX as f64 => f as i64,
                _ => {
                    self.reject(name, ViolationKind::WrongType { expected: "integer" });
                    return None;
                }
            },
        };
        if let Some(min) = min {
            if n < min {
                self.reject(name, ViolationKind::BelowMinimum { min: min as f64 });
                return None;
            }
        }
        if let Some(max) = max {
            if n > max {
                self.reject(name, ViolationKind::AboveMaximum { max: max as f64 });
                return None;
            }
        }
        Some(n)
    }

    pub fn string(&mut self, name: &str) -> String {
        self.require(name)
            .and_then(|v| self.as_str(name, v))
            .unwrap_or_default()
    }

    pub fn optional_string(&mut self, name: &str) -> Option<String> {
        self.present(name).and_then(|v| self.as_str(name, v))
    }

    pub fn email(&mut self, name: &str) -> String {
        let s = self.string(name);
        if !s.is_empty() && !is_email(&s) {
            self.reject(name, ViolationKind::InvalidEmail);
        } else if s.is_empty() && self.present(name).map(Value::is_string).unwrap_or(false) {
            self.reject(name, ViolationKind::InvalidEmail);
        }
        s
    }

    pub fn number(&mut self, name: &str, min: Option<f64>) -> f64 {
        self.require(name)
            .and_then(|v| self.as_number(name, v, min))
            .unwrap_or_default()
    }

    pub fn integer(&mut self, name: &str, min: Option<i64>, max: Option<i64>) -> i64 {
        self.require(name)
            .and_then(|v| self.as_integer(name, v, min, max))
            .unwrap_or_default()
    }

    pub fn optional_integer(&mut self, name: &str, min: Option<i64>, max: Option<i64>) -> Option<i64> {
        self.present(name).and_then(|v| self.as_integer(name, v, min, max))
    }

    pub fn flag(&mut self, name: &str, default: bool) -> bool {
        match self.present(name) {
            None => default,
            Some(Value::Bool(b)) => *b,
            Some(_) => {
                self.reject(name, ViolationKind::WrongType { expected: "boolean" });
                default
            }
        }
    }

    /// Required array of nested records, each parsed by `parse` at `<path>.<name>[i]`.
    pub fn list<T>(
        &mut self,
        name: &str,
        min_items: usize,
        parse: impl Fn(&'a Value, &str) -> Result<T, ValidationError>,
    ) -> Vec<T> {
        let Some(value) = self.require(name) else {
            return Vec::new();
        };
        let Some(items) = value.as_array() else {
            self.reject(name, ViolationKind::WrongType { expected: "array" });
            return Vec::new();
        };
        if items.len() < min_items {
            self.reject(name, ViolationKind::TooFewItems { min: min_items });
        }
        let base = self.field_path(name);
        let mut out = Vec::with_capacity(items.len());
        for (i, item) in items.iter().enumerate() {
            match parse(item, &format!("{}[{}]", base, i)) {
                Ok(parsed) => out.push(parsed),
                Err(e) => self.violations.extend(e.violations),
            }
        }
        out
    }

    pub fn finish<T>(self, record: T) -> Result<T, ValidationError> {
        if self.violations.is_empty() {
            Ok(record)
        } else {
            Err(ValidationError {
                violations: self.violations,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn email_pattern() {
        assert!(is_email("jane@example.com"));
        assert!(is_email("first.last+tag@mail.example.co.uk"));
        assert!(!is_email("jane"));
        assert!(!is_email("jane@"));
        assert!(!is_email("jane@example"));
        assert!(!is_email("ja ne@example.com"));
    }

    #[test]
    fn collects_every_violation() {
        let value = json!({ "a": 1, "c": -2.0, "d": "yes" });
        let mut f = Fields::at(&value, "root");
        f.string("a");
        f.string("b");
        f.number("c", Some(0.0));
        f.flag("d", true);
        let err = f.finish(()).unwrap_err();
        assert_eq!(err.fields(), vec!["root.a", "root.b", "root.c", "root.d"]);
        assert_eq!(err.violations[1].kind, ViolationKind::Missing);
    }

    #[test]
    fn null_is_absent_for_optional_and_missing_for_required() {
        let value = json!({ "note": null, "name": null });
        let mut f = Fields::at(&value, "");
        assert_eq!(f.optional_string("note"), None);
        f.string("name");
        let err = f.finish(()).unwrap_err();
        assert_eq!(err.fields(), vec!["name"]);
    }

    #[test]
    fn integer_accepts_whole_floats_only() {
        let value = json!({ "a": 2.0, "b": 2.5 });
        let mut f = Fields::at(&value, "");
        assert_eq!(f.integer("a", Some(1), None), 2);
        f.integer("b", Some(1), None);
        let err = f.finish(()).unwrap_err();
        assert_eq!(
            err.violations[0].kind,
            ViolationKind::WrongType { expected: "integer" }
        );
    }

    #[test]
    fn non_object_is_reported_once() {
        let value = json!([1, 2]);
        let mut f = Fields::at(&value, "order");
        f.string("name");
        let err = f.finish(()).unwrap_err();
        assert_eq!(err.fields(), vec!["order"]);
    }
}
