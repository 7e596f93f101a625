//! Source kinds and the fixed per-source schema.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ModelError;
use crate::field::Field;

/// One of the three input artifacts of a dataset folder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    Books,
    Users,
    Orders,
}

/// Native encoding of a source artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceFormat {
    /// Hierarchical text (sequence of mappings).
    Yaml,
    /// Delimited table with a header row.
    Csv,
    /// Binary columnar file.
    Parquet,
}

/// A field of a source schema and whether the row is rejected without it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub field: Field,
    pub required: bool,
}

const fn req(field: Field) -> FieldSpec {
    FieldSpec {
        field,
        required: true,
    }
}

const fn opt(field: Field) -> FieldSpec {
    FieldSpec {
        field,
        required: false,
    }
}

const BOOK_FIELDS: &[FieldSpec] = &[
    req(Field::BookId),
    req(Field::Title),
    req(Field::Author),
    opt(Field::Genre),
    opt(Field::Publisher),
    opt(Field::Year),
];

const USER_FIELDS: &[FieldSpec] = &[
    req(Field::UserId),
    req(Field::Name),
    opt(Field::Email),
    opt(Field::Phone),
    opt(Field::Address),
];

const ORDER_FIELDS: &[FieldSpec] = &[
    req(Field::OrderId),
    req(Field::UserId),
    req(Field::BookId),
    req(Field::Quantity),
    req(Field::UnitPrice),
    req(Field::OrderDate),
    opt(Field::Shipping),
];

impl SourceKind {
    pub const ALL: [SourceKind; 3] = [SourceKind::Books, SourceKind::Users, SourceKind::Orders];

    pub fn as_str(self) -> &'static str {
        match self {
            SourceKind::Books => "books",
            SourceKind::Users => "users",
            SourceKind::Orders => "orders",
        }
    }

    pub fn format(self) -> SourceFormat {
        match self {
            SourceKind::Books => SourceFormat::Yaml,
            SourceKind::Users => SourceFormat::Csv,
            SourceKind::Orders => SourceFormat::Parquet,
        }
    }

    /// File name of this source inside a dataset folder.
    pub fn file_name(self) -> &'static str {
        match self {
            SourceKind::Books => "books.yaml",
            SourceKind::Users => "users.csv",
            SourceKind::Orders => "orders.parquet",
        }
    }

    /// Recognized fields, in canonical order.
    pub fn fields(self) -> &'static [FieldSpec] {
        match self {
            SourceKind::Books => BOOK_FIELDS,
            SourceKind::Users => USER_FIELDS,
            SourceKind::Orders => ORDER_FIELDS,
        }
    }

    pub fn recognizes(self, field: Field) -> bool {
        self.fields().iter().any(|spec| spec.field == field)
    }

    /// Fields forming the identity key used for deduplication.
    pub fn identity(self) -> &'static [Field] {
        match self {
            SourceKind::Books => &[Field::BookId],
            SourceKind::Users => &[Field::UserId],
            SourceKind::Orders => &[Field::BookId, Field::UserId, Field::OrderId],
        }
    }

    /// The field an unqualified `id` column refers to in this source.
    pub fn own_id(self) -> Field {
        match self {
            SourceKind::Books => Field::BookId,
            SourceKind::Users => Field::UserId,
            SourceKind::Orders => Field::OrderId,
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SourceKind {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "books" | "book" => Ok(SourceKind::Books),
            "users" | "user" => Ok(SourceKind::Users),
            "orders" | "order" => Ok(SourceKind::Orders),
            _ => Err(ModelError::UnknownSource(s.to_string())),
        }
    }
}
