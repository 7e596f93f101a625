//! Coercion error types.

use bks_model::{Field, RejectReason, RejectedRow, SourceKind};
use thiserror::Error;

/// A normalized value that does not fit its declared type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoercionError {
    #[error("{field} is missing")]
    Missing { field: Field },

    #[error("{field} {value:?} is not a valid identifier")]
    Identity { field: Field, value: String },

    #[error("{field} {value:?}: {message}")]
    Value {
        field: Field,
        value: String,
        message: String,
    },

    #[error("{field} {value:?} is not an ISO date")]
    Date { field: Field, value: String },
}

impl CoercionError {
    pub fn field(&self) -> Field {
        match self {
            CoercionError::Missing { field }
            | CoercionError::Identity { field, .. }
            | CoercionError::Value { field, .. }
            | CoercionError::Date { field, .. } => *field,
        }
    }

    pub fn reason(&self) -> RejectReason {
        match self {
            CoercionError::Missing { .. } => RejectReason::MissingField,
            CoercionError::Identity { .. } => RejectReason::IdentityFormatError,
            CoercionError::Value { .. } => RejectReason::ValueFormatError,
            CoercionError::Date { .. } => RejectReason::DateFormatError,
        }
    }

    pub fn into_rejected(self, source: SourceKind, index: usize) -> RejectedRow {
        RejectedRow::new(source, index, self.reason(), self.to_string()).with_field(self.field())
    }
}

pub type Result<T> = std::result::Result<T, CoercionError>;
