//! Validation failures.

use bks_model::{Field, RejectReason, RejectedRow, SourceKind};
use thiserror::Error;

/// The first check a row failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{reason}: {detail}")]
pub struct Violation {
    pub reason: RejectReason,
    pub field: Option<Field>,
    pub detail: String,
}

impl Violation {
    pub fn new(reason: RejectReason, field: Field, detail: impl Into<String>) -> Self {
        Self {
            reason,
            field: Some(field),
            detail: detail.into(),
        }
    }

    pub fn into_rejected(self, source: SourceKind, index: usize) -> RejectedRow {
        let row = RejectedRow::new(source, index, self.reason, self.detail);
        match self.field {
            Some(field) => row.with_field(field),
            None => row,
        }
    }
}
