//! Scalar coercions from normalized text to schema types.

use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::{Decimal, RoundingStrategy};

use bks_model::Field;

use crate::error::{CoercionError, Result};
use crate::rules::CoercionRules;

/// Round half away from zero to `scale` places and pin the scale, so that
/// `1234.5` becomes `1234.50`.
pub fn round_currency(value: Decimal, scale: u32) -> Decimal {
    let mut rounded = value.round_dp_with_strategy(scale, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(scale);
    rounded
}

pub fn coerce_identifier(field: Field, value: &str, rules: &CoercionRules) -> Result<String> {
    let malformed = value.is_empty() || value.chars().any(char::is_whitespace);
    if malformed || !rules.identifier.is_match(value) {
        return Err(CoercionError::Identity {
            field,
            value: value.to_string(),
        });
    }
    Ok(value.to_string())
}

pub fn coerce_decimal(field: Field, value: &str, scale: u32) -> Result<Decimal> {
    let parsed = Decimal::from_str(value).map_err(|err| CoercionError::Value {
        field,
        value: value.to_string(),
        message: err.to_string(),
    })?;
    if parsed.is_sign_negative() && !parsed.is_zero() {
        return Err(CoercionError::Value {
            field,
            value: value.to_string(),
            message: "negative amount".to_string(),
        });
    }
    Ok(round_currency(parsed, scale))
}

pub fn coerce_date(field: Field, value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| CoercionError::Date {
        field,
        value: value.to_string(),
    })
}

pub fn coerce_integer<T: TryFrom<i64>>(field: Field, value: &str) -> Result<T> {
    value
        .parse::<i64>()
        .ok()
        .and_then(|n| T::try_from(n).ok())
        .ok_or_else(|| CoercionError::Value {
            field,
            value: value.to_string(),
            message: "integer out of bounds".to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn currency_rounds_half_up_to_scale() {
        let value = coerce_decimal(Field::UnitPrice, "1234.5", 2).unwrap();
        assert_eq!(value.to_string(), "1234.50");
        assert_eq!(
            coerce_decimal(Field::UnitPrice, "2.345", 2).unwrap().to_string(),
            "2.35"
        );
        assert_eq!(
            coerce_decimal(Field::UnitPrice, "2.344", 2).unwrap().to_string(),
            "2.34"
        );
    }

    #[test]
    fn identifiers_reject_whitespace() {
        let rules = CoercionRules::default();
        assert!(coerce_identifier(Field::BookId, "B1", &rules).is_ok());
        let err = coerce_identifier(Field::BookId, "B 1", &rules).unwrap_err();
        assert_eq!(err.reason(), bks_model::RejectReason::IdentityFormatError);
    }

    #[test]
    fn custom_identifier_pattern() {
        let rules = CoercionRules::new(2, r"^B\d+$").unwrap();
        assert!(coerce_identifier(Field::BookId, "B12", &rules).is_ok());
        assert!(coerce_identifier(Field::BookId, "X12", &rules).is_err());
    }

    #[test]
    fn permissive_pattern_still_rejects_whitespace() {
        let rules = CoercionRules::new(2, r"^.+$").unwrap();
        assert!(coerce_identifier(Field::BookId, "B-1", &rules).is_ok());
        let err = coerce_identifier(Field::BookId, "B 1", &rules).unwrap_err();
        assert_eq!(err.reason(), bks_model::RejectReason::IdentityFormatError);
        assert!(coerce_identifier(Field::BookId, "B1\t", &rules).is_err());
    }

    #[test]
    fn integer_bounds() {
        assert_eq!(coerce_integer::<u32>(Field::Quantity, "3").unwrap(), 3);
        assert!(coerce_integer::<u32>(Field::Quantity, "-1").is_err());
    }
}
