//! Row validation entry point.

use bks_model::{NormalizedRecord, RejectedRow};

use crate::checks::{consistency, presence, values};
use crate::rules::ValidationRules;
use crate::violation::Violation;

/// Runs the checks in order and stops at the first failure.
pub fn validate_record(
    record: &NormalizedRecord,
    rules: &ValidationRules,
) -> Result<(), Violation> {
    presence::check(record)?;
    values::check(record)?;
    consistency::check(record, rules)
}

/// Outcome of validating a batch of records from one source.
#[derive(Debug, Clone, Default)]
pub struct ValidationOutcome {
    pub valid: Vec<NormalizedRecord>,
    pub rejected: Vec<RejectedRow>,
}

/// Validate records in order, splitting them into valid rows and rejections.
pub fn validate_all(records: Vec<NormalizedRecord>, rules: &ValidationRules) -> ValidationOutcome {
    let mut outcome = ValidationOutcome::default();
    for record in records {
        match validate_record(&record, rules) {
            Ok(()) => outcome.valid.push(record),
            Err(violation) => {
                tracing::trace!(
                    source = %record.source,
                    index = record.index,
                    reason = %violation.reason,
                    "row failed validation"
                );
                outcome
                    .rejected
                    .push(violation.into_rejected(record.source, record.index));
            }
        }
    }
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use bks_model::{Field, NormalizedValue, RejectReason, SourceKind};
    use chrono::NaiveDate;

    fn order(quantity: &str, date: &str) -> NormalizedRecord {
        let mut record = NormalizedRecord::new(SourceKind::Orders, 0);
        for (field, value) in [
            (Field::OrderId, "O1"),
            (Field::UserId, "U1"),
            (Field::BookId, "B1"),
            (Field::Quantity, quantity),
            (Field::UnitPrice, "10.5"),
            (Field::OrderDate, date),
        ] {
            record.set(field, NormalizedValue::Text(value.to_string()));
        }
        record
    }

    #[test]
    fn presence_runs_before_range() {
        let mut record = order("0", "2024-01-01");
        record.set(Field::UserId, NormalizedValue::Missing);
        let err = validate_record(&record, &ValidationRules::default()).unwrap_err();
        assert_eq!(err.reason, RejectReason::MissingField);
        assert_eq!(err.field, Some(Field::UserId));
    }

    #[test]
    fn range_runs_before_consistency() {
        let rules = ValidationRules::default()
            .with_min_order_date(NaiveDate::from_ymd_opt(2024, 6, 1).unwrap());
        let err = validate_record(&order("0", "2020-01-01"), &rules).unwrap_err();
        assert_eq!(err.reason, RejectReason::OutOfRange);
    }

    #[test]
    fn order_date_window() {
        let rules = ValidationRules::default()
            .with_min_order_date(NaiveDate::from_ymd_opt(2024, 6, 1).unwrap())
            .with_max_order_date(NaiveDate::from_ymd_opt(2024, 12, 31).unwrap());
        assert!(validate_record(&order("1", "2024-07-01"), &rules).is_ok());
        let err = validate_record(&order("1", "2025-01-01"), &rules).unwrap_err();
        assert_eq!(err.reason, RejectReason::ConsistencyError);
    }

    #[test]
    fn validate_all_keeps_order() {
        let mut bad = order("1", "2024-01-01");
        bad.index = 1;
        bad.set(Field::OrderId, NormalizedValue::Missing);
        let mut good = order("2", "2024-01-02");
        good.index = 2;
        let outcome = validate_all(
            vec![order("1", "2024-01-01"), bad, good],
            &ValidationRules::default(),
        );
        assert_eq!(outcome.valid.len(), 2);
        assert_eq!(outcome.valid[1].index, 2);
        assert_eq!(outcome.rejected.len(), 1);
        assert_eq!(outcome.rejected[0].index, 1);
    }
}
