//! Untyped and loosely-typed row representations.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::field::Field;
use crate::source::SourceKind;

/// A cell as it came out of a source reader.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum RawValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl RawValue {
    /// Null, NaN, or text that is blank or a null marker.
    pub fn is_null(&self) -> bool {
        match self {
            RawValue::Null => true,
            RawValue::Float(v) => v.is_nan(),
            RawValue::Text(s) => is_null_marker(s),
            RawValue::Bool(_) | RawValue::Int(_) => false,
        }
    }

    /// Textual form of the value, or `None` for nulls.
    pub fn to_text(&self) -> Option<String> {
        if self.is_null() {
            return None;
        }
        match self {
            RawValue::Null => None,
            RawValue::Bool(b) => Some(b.to_string()),
            RawValue::Int(v) => Some(v.to_string()),
            RawValue::Float(v) => Some(v.to_string()),
            RawValue::Text(s) => Some(s.clone()),
        }
    }
}

impl fmt::Display for RawValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_text() {
            Some(text) => f.write_str(&text),
            None => f.write_str("null"),
        }
    }
}

fn is_null_marker(value: &str) -> bool {
    let trimmed = value.trim();
    trimmed.is_empty()
        || trimmed.eq_ignore_ascii_case("nan")
        || trimmed.eq_ignore_ascii_case("none")
        || trimmed.eq_ignore_ascii_case("null")
}

/// One row of a source, keyed by the source's own column names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawRecord {
    pub source: SourceKind,
    /// Zero-based position in read order.
    pub index: usize,
    pub fields: BTreeMap<String, RawValue>,
}

impl RawRecord {
    pub fn new(source: SourceKind, index: usize) -> Self {
        Self {
            source,
            index,
            fields: BTreeMap::new(),
        }
    }

    pub fn with_field(mut self, name: impl Into<String>, value: RawValue) -> Self {
        self.fields.insert(name.into(), value);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: RawValue) {
        self.fields.insert(name.into(), value);
    }

    pub fn get(&self, name: &str) -> Option<&RawValue> {
        self.fields.get(name)
    }
}

/// A cleaned value that has not yet been coerced to its schema type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum NormalizedValue {
    Text(String),
    List(Vec<String>),
    Missing,
}

impl NormalizedValue {
    pub fn is_missing(&self) -> bool {
        match self {
            NormalizedValue::Missing => true,
            NormalizedValue::Text(s) => s.is_empty(),
            NormalizedValue::List(items) => items.is_empty(),
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            NormalizedValue::Text(s) if !s.is_empty() => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            NormalizedValue::List(items) if !items.is_empty() => Some(items),
            _ => None,
        }
    }
}

/// A row whose recognized fields have each been through their normalizer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedRecord {
    pub source: SourceKind,
    pub index: usize,
    pub values: BTreeMap<Field, NormalizedValue>,
}

impl NormalizedRecord {
    pub fn new(source: SourceKind, index: usize) -> Self {
        Self {
            source,
            index,
            values: BTreeMap::new(),
        }
    }

    pub fn set(&mut self, field: Field, value: NormalizedValue) {
        self.values.insert(field, value);
    }

    pub fn get(&self, field: Field) -> Option<&NormalizedValue> {
        self.values.get(&field)
    }

    pub fn text(&self, field: Field) -> Option<&str> {
        self.get(field).and_then(NormalizedValue::as_text)
    }

    pub fn list(&self, field: Field) -> Option<&[String]> {
        self.get(field).and_then(NormalizedValue::as_list)
    }

    pub fn is_present(&self, field: Field) -> bool {
        self.get(field).is_some_and(|value| !value.is_missing())
    }

    /// Identity key values in schema order; missing parts render empty.
    pub fn identity_key(&self) -> Vec<String> {
        self.source
            .identity()
            .iter()
            .map(|field| self.text(*field).unwrap_or_default().to_string())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_markers_are_null() {
        assert!(RawValue::Text("  ".into()).is_null());
        assert!(RawValue::Text("NaN".into()).is_null());
        assert!(RawValue::Float(f64::NAN).is_null());
        assert!(!RawValue::Int(0).is_null());
        assert_eq!(RawValue::Text("null".into()).to_text(), None);
    }

    #[test]
    fn float_text_drops_trailing_zero() {
        assert_eq!(RawValue::Float(3.0).to_text().as_deref(), Some("3"));
        assert_eq!(RawValue::Float(12.5).to_text().as_deref(), Some("12.5"));
    }

    #[test]
    fn identity_key_follows_schema_order() {
        let mut record = NormalizedRecord::new(SourceKind::Orders, 0);
        record.set(Field::OrderId, NormalizedValue::Text("O1".into()));
        record.set(Field::UserId, NormalizedValue::Text("U1".into()));
        record.set(Field::BookId, NormalizedValue::Text("B1".into()));
        assert_eq!(record.identity_key(), vec!["B1", "U1", "O1"]);
    }
}
