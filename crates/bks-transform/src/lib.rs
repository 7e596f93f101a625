//! Type coercion from normalized records to the canonical schema.
//!
//! Identifiers are checked against the configured pattern, currency is
//! rounded half away from zero to the configured scale, dates are parsed
//! from ISO form, and order revenue is derived from quantity and unit price.

pub mod coerce;
pub mod error;
pub mod records;
pub mod rules;

pub use coerce::{coerce_date, coerce_decimal, coerce_identifier, coerce_integer, round_currency};
pub use error::{CoercionError, Result};
pub use records::{coerce_book, coerce_order, coerce_record, coerce_user};
pub use rules::{CoercionRules, DEFAULT_CURRENCY_SCALE, DEFAULT_IDENTIFIER_PATTERN};
