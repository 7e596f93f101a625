//! Per-field type and range checks on normalized values.

use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;

use bks_model::{Field, FieldKind, NormalizedRecord, RejectReason};

use crate::rules::{MIN_QUANTITY, YEAR_RANGE};
use crate::violation::Violation;

/// Checks every present field in schema order.
pub fn check(record: &NormalizedRecord) -> Result<(), Violation> {
    for spec in record.source.fields() {
        let Some(text) = record.text(spec.field) else {
            continue;
        };
        check_value(spec.field, text)?;
    }
    Ok(())
}

fn check_value(field: Field, text: &str) -> Result<(), Violation> {
    match field.kind() {
        FieldKind::Integer => {
            let value: i64 = text.parse().map_err(|_| {
                Violation::new(
                    RejectReason::ValueFormatError,
                    field,
                    format!("{field} is not an integer: {text:?}"),
                )
            })?;
            check_range(field, value)
        }
        FieldKind::Money => {
            let value = Decimal::from_str(text).map_err(|_| {
                Violation::new(
                    RejectReason::ValueFormatError,
                    field,
                    format!("{field} is not a decimal: {text:?}"),
                )
            })?;
            if value.is_sign_negative() && !value.is_zero() {
                return Err(Violation::new(
                    RejectReason::ValueFormatError,
                    field,
                    format!("{field} is negative: {text}"),
                ));
            }
            Ok(())
        }
        FieldKind::Date => NaiveDate::parse_from_str(text, "%Y-%m-%d")
            .map(|_| ())
            .map_err(|_| {
                Violation::new(
                    RejectReason::DateFormatError,
                    field,
                    format!("{field} is not an ISO date: {text:?}"),
                )
            }),
        _ => Ok(()),
    }
}

fn check_range(field: Field, value: i64) -> Result<(), Violation> {
    let in_range = match field {
        Field::Quantity => value >= MIN_QUANTITY,
        Field::Year => YEAR_RANGE.contains(&value),
        _ => true,
    };
    if in_range {
        Ok(())
    } else {
        Err(Violation::new(
            RejectReason::OutOfRange,
            field,
            format!("{field} out of range: {value}"),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quantity_must_be_positive() {
        let err = check_value(Field::Quantity, "0").unwrap_err();
        assert_eq!(err.reason, RejectReason::OutOfRange);
        assert!(check_value(Field::Quantity, "1").is_ok());
    }

    #[test]
    fn year_must_have_four_digits() {
        assert!(check_value(Field::Year, "1999").is_ok());
        assert_eq!(
            check_value(Field::Year, "99").unwrap_err().reason,
            RejectReason::OutOfRange
        );
    }

    #[test]
    fn malformed_values() {
        assert_eq!(
            check_value(Field::UnitPrice, "abc").unwrap_err().reason,
            RejectReason::ValueFormatError
        );
        assert_eq!(
            check_value(Field::OrderDate, "2024-13-01").unwrap_err().reason,
            RejectReason::DateFormatError
        );
    }
}
