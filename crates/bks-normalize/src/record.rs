//! Whole-record normalization.

use std::collections::BTreeMap;

use bks_model::{Field, FieldKind, NormalizedRecord, NormalizedValue, RawRecord, RawValue};

use crate::author::split_authors;
use crate::columns::{is_canonical_name, resolve_field};
use crate::date::normalize_date;
use crate::error::{FieldError, Result};
use crate::numeric::{normalize_integer, normalize_money};
use crate::options::NormalizeOptions;
use crate::text::{normalize_email, normalize_identifier, normalize_person_name, normalize_text};

/// Apply the rule for `field` to one textual value.
pub fn normalize_value(
    field: Field,
    value: &str,
    options: &NormalizeOptions,
) -> Result<NormalizedValue> {
    let normalized = match field.kind() {
        FieldKind::Identifier => NormalizedValue::Text(normalize_identifier(value)),
        FieldKind::Text => NormalizedValue::Text(normalize_text(value)),
        FieldKind::PersonName => NormalizedValue::Text(normalize_person_name(value)),
        FieldKind::Email => NormalizedValue::Text(normalize_email(value)),
        FieldKind::AuthorList => NormalizedValue::List(split_authors(value)),
        FieldKind::Integer => NormalizedValue::Text(normalize_integer(value)?),
        FieldKind::Money => NormalizedValue::Text(normalize_money(value, options.eur_to_usd)?),
        FieldKind::Date => NormalizedValue::Text(normalize_date(value, options.day_first)?),
    };
    Ok(if normalized.is_missing() {
        NormalizedValue::Missing
    } else {
        normalized
    })
}

/// Normalize every recognized field of a raw record.
///
/// Columns are matched to fields by name; unrecognized columns are dropped.
/// When several columns feed the same field, a column spelled exactly as the
/// field wins, then the first non-null one. Recognized fields with no value
/// are recorded as [`NormalizedValue::Missing`]. Fields are processed in
/// schema order and the first failure is returned.
pub fn normalize_record(
    raw: &RawRecord,
    options: &NormalizeOptions,
) -> std::result::Result<NormalizedRecord, FieldError> {
    let mut chosen: BTreeMap<Field, (bool, &RawValue)> = BTreeMap::new();
    for (column, value) in &raw.fields {
        let Some(field) = resolve_field(raw.source, column) else {
            tracing::trace!(source = %raw.source, column = %column, "dropping column");
            continue;
        };
        if value.is_null() {
            continue;
        }
        let exact = is_canonical_name(column, field);
        let replace = match chosen.get(&field) {
            None => true,
            Some((held_exact, _)) => exact && !held_exact,
        };
        if replace {
            chosen.insert(field, (exact, value));
        }
    }

    let mut record = NormalizedRecord::new(raw.source, raw.index);
    for spec in raw.source.fields() {
        let value = match chosen.get(&spec.field).and_then(|(_, value)| value.to_text()) {
            Some(text) => normalize_value(spec.field, &text, options)
                .map_err(|error| FieldError::new(spec.field, error))?,
            None => NormalizedValue::Missing,
        };
        record.set(spec.field, value);
    }
    Ok(record)
}

/// Run the rules again over an already-normalized record.
pub fn renormalize(
    record: &NormalizedRecord,
    options: &NormalizeOptions,
) -> std::result::Result<NormalizedRecord, FieldError> {
    let mut out = NormalizedRecord::new(record.source, record.index);
    for (field, value) in &record.values {
        let text = match value {
            NormalizedValue::Text(text) => Some(text.clone()),
            NormalizedValue::List(items) => Some(items.join("; ")),
            NormalizedValue::Missing => None,
        };
        let value = match text {
            Some(text) => normalize_value(*field, &text, options)
                .map_err(|error| FieldError::new(*field, error))?,
            None => NormalizedValue::Missing,
        };
        out.set(*field, value);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use bks_model::{RejectReason, SourceKind};

    fn order(price: &str, date: &str) -> RawRecord {
        RawRecord::new(SourceKind::Orders, 0)
            .with_field("id", RawValue::Text("O1".into()))
            .with_field("user_id", RawValue::Text("U1".into()))
            .with_field("book_id", RawValue::Text("B1".into()))
            .with_field("quantity", RawValue::Float(2.0))
            .with_field("unit_price", RawValue::Text(price.into()))
            .with_field("timestamp", RawValue::Text(date.into()))
            .with_field("source_file", RawValue::Text("orders.parquet".into()))
    }

    #[test]
    fn normalizes_an_order_row() {
        let record =
            normalize_record(&order("$1,234.5", "2024-12-03"), &NormalizeOptions::default())
                .unwrap();
        assert_eq!(record.text(Field::OrderId), Some("O1"));
        assert_eq!(record.text(Field::Quantity), Some("2"));
        assert_eq!(record.text(Field::UnitPrice), Some("1234.5"));
        assert_eq!(record.text(Field::OrderDate), Some("2024-12-03"));
        assert_eq!(record.get(Field::Shipping), Some(&NormalizedValue::Missing));
        assert_eq!(record.values.len(), SourceKind::Orders.fields().len());
    }

    #[test]
    fn bad_date_reports_field_and_reason() {
        let err = normalize_record(&order("$5", "13/45/2020"), &NormalizeOptions::default())
            .unwrap_err();
        assert_eq!(err.field, Field::OrderDate);
        assert_eq!(err.reason(), RejectReason::DateFormatError);
    }

    #[test]
    fn exact_column_name_wins_over_alias() {
        let raw = RawRecord::new(SourceKind::Orders, 0)
            .with_field("order_date", RawValue::Text("2024-01-02".into()))
            .with_field("timestamp", RawValue::Text("2030-01-01".into()));
        let record = normalize_record(&raw, &NormalizeOptions::default()).unwrap();
        assert_eq!(record.text(Field::OrderDate), Some("2024-01-02"));
    }

    #[test]
    fn renormalizing_is_a_no_op() {
        let options = NormalizeOptions::default();
        let raw = RawRecord::new(SourceKind::Books, 3)
            .with_field("id", RawValue::Int(7))
            .with_field("title", RawValue::Text("  The   Hobbit ".into()))
            .with_field("author", RawValue::Text("Tolkien, John".into()));
        let once = normalize_record(&raw, &options).unwrap();
        assert_eq!(once.list(Field::Author), Some(&["John Tolkien".to_string()][..]));
        assert_eq!(renormalize(&once, &options).unwrap(), once);
    }
}
