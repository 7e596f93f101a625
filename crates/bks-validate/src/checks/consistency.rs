//! Cross-field consistency.

use chrono::NaiveDate;

use bks_model::{Field, NormalizedRecord, RejectReason};

use crate::rules::ValidationRules;
use crate::violation::Violation;

/// Order dates must fall inside the configured window.
pub fn check(record: &NormalizedRecord, rules: &ValidationRules) -> Result<(), Violation> {
    let Some(date) = record
        .text(Field::OrderDate)
        .and_then(|text| NaiveDate::parse_from_str(text, "%Y-%m-%d").ok())
    else {
        return Ok(());
    };
    if let Some(min) = rules.min_order_date
        && date < min
    {
        return Err(Violation::new(
            RejectReason::ConsistencyError,
            Field::OrderDate,
            format!("order_date {date} is before {min}"),
        ));
    }
    if let Some(max) = rules.max_order_date
        && date > max
    {
        return Err(Violation::new(
            RejectReason::ConsistencyError,
            Field::OrderDate,
            format!("order_date {date} is after {max}"),
        ));
    }
    Ok(())
}
