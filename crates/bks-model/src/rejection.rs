//! Reject reasons and rejected rows.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ModelError;
use crate::field::Field;
use crate::source::SourceKind;

/// Why a row was kept out of the canonical dataset.
///
/// All reasons are row-scoped: a rejection never stops the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectReason {
    /// The source row violated its format's grammar.
    ParseError,
    /// A required field was absent or blank.
    MissingField,
    /// No known date encoding matched.
    DateFormatError,
    /// A numeric field was negative, fractional where whole, or not a number.
    ValueFormatError,
    /// A value parsed but fell outside its permitted range.
    OutOfRange,
    /// Fields disagree with each other or with configured bounds.
    ConsistencyError,
    /// An identifier did not match the configured pattern.
    IdentityFormatError,
    /// Superseded by a later row with the same identity key.
    DuplicateKey,
    /// An order references a book or user that does not exist.
    ReferentialIntegrityError,
}

impl RejectReason {
    pub const ALL: [RejectReason; 9] = [
        RejectReason::ParseError,
        RejectReason::MissingField,
        RejectReason::DateFormatError,
        RejectReason::ValueFormatError,
        RejectReason::OutOfRange,
        RejectReason::ConsistencyError,
        RejectReason::IdentityFormatError,
        RejectReason::DuplicateKey,
        RejectReason::ReferentialIntegrityError,
    ];

    pub fn code(self) -> &'static str {
        match self {
            RejectReason::ParseError => "parse_error",
            RejectReason::MissingField => "missing_field",
            RejectReason::DateFormatError => "date_format_error",
            RejectReason::ValueFormatError => "value_format_error",
            RejectReason::OutOfRange => "out_of_range",
            RejectReason::ConsistencyError => "consistency_error",
            RejectReason::IdentityFormatError => "identity_format_error",
            RejectReason::DuplicateKey => "duplicate_key",
            RejectReason::ReferentialIntegrityError => "referential_integrity_error",
        }
    }
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for RejectReason {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RejectReason::ALL
            .iter()
            .copied()
            .find(|reason| reason.code() == s.trim())
            .ok_or_else(|| ModelError::UnknownReason(s.to_string()))
    }
}

/// A row that failed a stage, kept for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RejectedRow {
    pub source: SourceKind,
    pub index: usize,
    pub reason: RejectReason,
    pub field: Option<Field>,
    pub detail: String,
}

impl RejectedRow {
    pub fn new(
        source: SourceKind,
        index: usize,
        reason: RejectReason,
        detail: impl Into<String>,
    ) -> Self {
        Self {
            source,
            index,
            reason,
            field: None,
            detail: detail.into(),
        }
    }

    pub fn with_field(mut self, field: Field) -> Self {
        self.field = Some(field);
        self
    }
}

impl fmt::Display for RejectedRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{} {}", self.source, self.index, self.reason)?;
        if let Some(field) = self.field {
            write!(f, " [{field}]")?;
        }
        write!(f, ": {}", self.detail)
    }
}
