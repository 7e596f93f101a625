//! Required-field presence.

use bks_model::{NormalizedRecord, RejectReason};

use crate::violation::Violation;

/// Fails on the first required field, in schema order, with no value.
pub fn check(record: &NormalizedRecord) -> Result<(), Violation> {
    for spec in record.source.fields() {
        if spec.required && !record.is_present(spec.field) {
            return Err(Violation::new(
                RejectReason::MissingField,
                spec.field,
                format!("required field {} is missing", spec.field),
            ));
        }
    }
    Ok(())
}
