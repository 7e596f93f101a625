//! Normalization error types.

use bks_model::{Field, RejectReason};
use thiserror::Error;

/// A value that no normalization rule accepts.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueError {
    #[error("unrecognized date: {0:?}")]
    Date(String),

    #[error("not a number: {0:?}")]
    Number(String),

    #[error("negative amount: {0:?}")]
    Negative(String),

    #[error("not an integer: {0:?}")]
    Integer(String),
}

impl ValueError {
    /// Rejection reason for rows failing with this error.
    pub fn reason(&self) -> RejectReason {
        match self {
            ValueError::Date(_) => RejectReason::DateFormatError,
            ValueError::Number(_) | ValueError::Negative(_) | ValueError::Integer(_) => {
                RejectReason::ValueFormatError
            }
        }
    }
}

/// A field of a record whose value failed normalization.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {error}")]
pub struct FieldError {
    pub field: Field,
    #[source]
    pub error: ValueError,
}

impl FieldError {
    pub fn new(field: Field, error: ValueError) -> Self {
        Self { field, error }
    }

    pub fn reason(&self) -> RejectReason {
        self.error.reason()
    }
}

pub type Result<T> = std::result::Result<T, ValueError>;
