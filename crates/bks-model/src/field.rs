//! Canonical field names and their declared kinds.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ModelError;

/// A field of the canonical schema.
///
/// The set is closed: source columns that do not map to one of these are
/// dropped during normalization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    BookId,
    Title,
    Author,
    Genre,
    Publisher,
    Year,
    UserId,
    Name,
    Email,
    Phone,
    Address,
    OrderId,
    Quantity,
    UnitPrice,
    OrderDate,
    Shipping,
}

/// Declared kind of a field. Drives both the normalization rule and the
/// coercion target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    /// Relational identifier: non-empty, no embedded whitespace.
    Identifier,
    /// Free text, case preserved.
    Text,
    /// Person name, title-cased.
    PersonName,
    /// Ordered list of author names.
    AuthorList,
    /// Lowercased e-mail address.
    Email,
    /// Whole number.
    Integer,
    /// Non-negative currency amount.
    Money,
    /// Calendar date.
    Date,
}

impl Field {
    pub const ALL: [Field; 16] = [
        Field::BookId,
        Field::Title,
        Field::Author,
        Field::Genre,
        Field::Publisher,
        Field::Year,
        Field::UserId,
        Field::Name,
        Field::Email,
        Field::Phone,
        Field::Address,
        Field::OrderId,
        Field::Quantity,
        Field::UnitPrice,
        Field::OrderDate,
        Field::Shipping,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Field::BookId => "book_id",
            Field::Title => "title",
            Field::Author => "author",
            Field::Genre => "genre",
            Field::Publisher => "publisher",
            Field::Year => "year",
            Field::UserId => "user_id",
            Field::Name => "name",
            Field::Email => "email",
            Field::Phone => "phone",
            Field::Address => "address",
            Field::OrderId => "order_id",
            Field::Quantity => "quantity",
            Field::UnitPrice => "unit_price",
            Field::OrderDate => "order_date",
            Field::Shipping => "shipping",
        }
    }

    pub fn kind(self) -> FieldKind {
        match self {
            Field::BookId | Field::UserId | Field::OrderId => FieldKind::Identifier,
            Field::Title
            | Field::Genre
            | Field::Publisher
            | Field::Phone
            | Field::Address
            | Field::Shipping => FieldKind::Text,
            Field::Name => FieldKind::PersonName,
            Field::Author => FieldKind::AuthorList,
            Field::Email => FieldKind::Email,
            Field::Year | Field::Quantity => FieldKind::Integer,
            Field::UnitPrice => FieldKind::Money,
            Field::OrderDate => FieldKind::Date,
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Field {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Field::ALL
            .iter()
            .copied()
            .find(|field| field.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| ModelError::UnknownField(s.to_string()))
    }
}
