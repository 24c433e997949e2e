// src/core/args.rs

use crate::{core::errors::LookupError, models::Value};
use serde::Serialize;
use std::collections::BTreeMap;

/// Conversion from a parsed `Value` into a concrete Rust type.
///
/// Implementations never coerce between variants: asking for an `i64`
/// when a string was stored is a type mismatch, not a parse attempt.
pub trait FromValue: Sized {
    /// Name used when reporting a mismatch.
    const EXPECTED: &'static str;

    /// Extracts `Self`, or `None` when the value is of another variant.
    fn from_value(value: &Value) -> Option<Self>;
}

impl FromValue for String {
    const EXPECTED: &'static str = "string";

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Str(s) => Some(s.clone()),
            _ => None,
        }
    }
}

impl FromValue for i64 {
    const EXPECTED: &'static str = "int";

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }
}

impl FromValue for f64 {
    const EXPECTED: &'static str = "float";

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Float(x) => Some(*x),
            _ => None,
        }
    }
}

impl FromValue for bool {
    const EXPECTED: &'static str = "bool";

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

impl FromValue for Value {
    const EXPECTED: &'static str = "value";

    fn from_value(value: &Value) -> Option<Self> {
        Some(value.clone())
    }
}

impl<T: FromValue> FromValue for Vec<T> {
    const EXPECTED: &'static str = "list";

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::List(items) => items.iter().map(T::from_value).collect(),
            _ => None,
        }
    }
}

/// Parsed arguments ready for use, keyed by destination name.
///
/// A fresh `Args` is produced by every parse call and owns its values.
#[derive(Serialize, Debug, Clone, Default, PartialEq)]
#[serde(transparent)]
pub struct Args {
    values: BTreeMap<String, Value>,
}

impl Args {
    /// An empty result set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Retrieves the value stored under `dest` as a `T`.
    ///
    /// Both a missing destination and a stored value of another type are
    /// reported as errors; nothing is silently defaulted.
    pub fn get<T: FromValue>(&self, dest: &str) -> Result<T, LookupError> {
        let value = self
            .values
            .get(dest)
            .ok_or_else(|| LookupError::Absent(dest.to_string()))?;
        T::from_value(value).ok_or_else(|| LookupError::TypeMismatch {
            dest: dest.to_string(),
            expected: T::EXPECTED,
            found: value.type_name(),
        })
    }

    /// Like `get`, but maps absence to `None` while still reporting a type mismatch.
    pub fn get_opt<T: FromValue>(&self, dest: &str) -> Result<Option<T>, LookupError> {
        match self.get(dest) {
            Ok(v) => Ok(Some(v)),
            Err(LookupError::Absent(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// The raw value stored under `dest`, if any.
    pub fn value(&self, dest: &str) -> Option<&Value> {
        self.values.get(dest)
    }

    /// Whether anything is stored under `dest`.
    pub fn contains(&self, dest: &str) -> bool {
        self.values.contains_key(dest)
    }

    /// Number of stored destinations.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether no destination holds a value.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterates over `(dest, value)` pairs in lexical order of `dest`.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub(crate) fn insert(&mut self, dest: &str, value: Value) {
        self.values.insert(dest.to_string(), value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Args {
        let mut args = Args::new();
        args.insert("count", Value::Int(3));
        args.insert("name", Value::from("bob"));
        args.insert("files", Value::from(vec!["a", "b"]));
        args
    }

    #[test]
    fn test_get_typed_values() {
        let args = sample();
        assert_eq!(args.get::<i64>("count"), Ok(3));
        assert_eq!(args.get::<String>("name"), Ok("bob".to_string()));
        assert_eq!(
            args.get::<Vec<String>>("files"),
            Ok(vec!["a".to_string(), "b".to_string()])
        );
    }

    #[test]
    fn test_get_reports_absence_and_mismatch() {
        let args = sample();
        assert_eq!(
            args.get::<i64>("missing"),
            Err(LookupError::Absent("missing".to_string()))
        );
        assert_eq!(
            args.get::<i64>("name"),
            Err(LookupError::TypeMismatch {
                dest: "name".to_string(),
                expected: "int",
                found: "string",
            })
        );
    }

    #[test]
    fn test_get_opt() {
        let args = sample();
        assert_eq!(args.get_opt::<i64>("missing"), Ok(None));
        assert_eq!(args.get_opt::<i64>("count"), Ok(Some(3)));
        assert!(args.get_opt::<bool>("count").is_err());
    }

    #[test]
    fn test_serializes_as_plain_json_object() {
        let json = serde_json::to_string(&sample()).unwrap();
        assert_eq!(json, r#"{"count":3,"files":["a","b"],"name":"bob"}"#);
    }
}
