//! YAML reader: a top-level sequence of mappings, one mapping per record.
//!
//! Nested mappings are flattened into dotted column names (`publisher.name`),
//! and scalar sequences are joined with `"; "` so list-valued fields such as
//! authors survive as a single delimited cell.

use std::path::Path;

use serde_yaml::{Mapping, Value};

use bks_model::{RawRecord, RawValue, SourceKind};

use crate::error::{IngestError, Result, RowParseError, RowResult};

/// Lazily converts the items of a parsed YAML sequence into records.
#[derive(Debug)]
pub struct YamlRecords {
    kind: SourceKind,
    items: std::vec::IntoIter<Value>,
    index: usize,
}

impl YamlRecords {
    pub fn open(kind: SourceKind, path: &Path) -> Result<Self> {
        let content =
            std::fs::read_to_string(path).map_err(|err| IngestError::open(kind, path, err))?;
        Self::from_str(kind, &content)
    }

    /// Parse the document envelope. A document that is not a sequence is fatal.
    pub fn from_str(kind: SourceKind, content: &str) -> Result<Self> {
        let document: Value = serde_yaml::from_str(content)
            .map_err(|err| IngestError::envelope(kind, format!("invalid YAML: {err}")))?;
        let items = match document {
            Value::Sequence(items) => items,
            Value::Null => Vec::new(),
            other => {
                return Err(IngestError::envelope(
                    kind,
                    format!("expected a sequence of records, found {}", type_name(&other)),
                ));
            }
        };
        tracing::debug!(source = %kind, items = items.len(), "parsed YAML envelope");
        Ok(Self {
            kind,
            items: items.into_iter(),
            index: 0,
        })
    }
}

impl Iterator for YamlRecords {
    type Item = RowResult;

    fn next(&mut self) -> Option<Self::Item> {
        let item = self.items.next()?;
        let index = self.index;
        self.index += 1;
        Some(record_from_value(self.kind, index, item))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.items.size_hint()
    }
}

fn record_from_value(kind: SourceKind, index: usize, value: Value) -> RowResult {
    let Value::Mapping(mapping) = untag(value) else {
        return Err(RowParseError::new(kind, index, "expected a mapping"));
    };
    let mut record = RawRecord::new(kind, index);
    flatten(kind, index, "", mapping, &mut record)?;
    Ok(record)
}

fn flatten(
    kind: SourceKind,
    index: usize,
    prefix: &str,
    mapping: Mapping,
    record: &mut RawRecord,
) -> std::result::Result<(), RowParseError> {
    for (key, value) in mapping {
        let key = scalar_text(&untag(key))
            .ok_or_else(|| RowParseError::new(kind, index, "mapping key is not a scalar"))?;
        let name = if prefix.is_empty() {
            key
        } else {
            format!("{prefix}.{key}")
        };
        match untag(value) {
            Value::Mapping(nested) => flatten(kind, index, &name, nested, record)?,
            Value::Sequence(items) => {
                let mut parts = Vec::with_capacity(items.len());
                for item in items {
                    let item = untag(item);
                    if item.is_null() {
                        continue;
                    }
                    let text = scalar_text(&item).ok_or_else(|| {
                        RowParseError::new(kind, index, format!("{name}: nested list item"))
                    })?;
                    parts.push(text);
                }
                record.insert(name, RawValue::Text(parts.join("; ")));
            }
            scalar => record.insert(name, scalar_value(scalar)),
        }
    }
    Ok(())
}

fn untag(value: Value) -> Value {
    match value {
        Value::Tagged(tagged) => untag(tagged.value),
        other => other,
    }
}

fn scalar_value(value: Value) -> RawValue {
    match value {
        Value::Null => RawValue::Null,
        Value::Bool(b) => RawValue::Bool(b),
        Value::Number(n) => match n.as_i64() {
            Some(v) => RawValue::Int(v),
            None => n.as_f64().map_or(RawValue::Null, RawValue::Float),
        },
        Value::String(s) => RawValue::Text(s),
        // Collections are handled by the caller.
        Value::Sequence(_) | Value::Mapping(_) | Value::Tagged(_) => RawValue::Null,
    }
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::String(s) => Some(s.clone()),
        _ => None,
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Sequence(_) => "a sequence",
        Value::Mapping(_) => "a mapping",
        Value::Tagged(_) => "a tagged value",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flattens_nested_mappings() {
        let yaml = "- id: 1\n  meta:\n    genre: Fiction\n";
        let mut records = YamlRecords::from_str(SourceKind::Books, yaml).unwrap();
        let record = records.next().unwrap().unwrap();
        assert_eq!(record.get("id"), Some(&RawValue::Int(1)));
        assert_eq!(
            record.get("meta.genre"),
            Some(&RawValue::Text("Fiction".into()))
        );
        assert!(records.next().is_none());
    }

    #[test]
    fn joins_scalar_lists() {
        let yaml = "- author: [Jane Doe, John Roe]\n";
        let record = YamlRecords::from_str(SourceKind::Books, yaml)
            .unwrap()
            .next()
            .unwrap()
            .unwrap();
        assert_eq!(
            record.get("author"),
            Some(&RawValue::Text("Jane Doe; John Roe".into()))
        );
    }

    #[test]
    fn non_mapping_item_is_row_scoped() {
        let yaml = "- id: 1\n- just text\n- id: 3\n";
        let results: Vec<_> = YamlRecords::from_str(SourceKind::Books, yaml)
            .unwrap()
            .collect();
        assert_eq!(results.len(), 3);
        assert!(results[0].is_ok());
        assert_eq!(results[1].as_ref().unwrap_err().index, 1);
        assert_eq!(results[2].as_ref().unwrap().index, 2);
    }

    #[test]
    fn scalar_document_is_fatal() {
        let err = YamlRecords::from_str(SourceKind::Books, "42").unwrap_err();
        assert!(matches!(err, IngestError::Envelope { .. }));
    }

    #[test]
    fn broken_markup_is_fatal() {
        let err = YamlRecords::from_str(SourceKind::Books, "- id: [1, 2\n").unwrap_err();
        assert!(matches!(err, IngestError::Envelope { .. }));
    }
}
