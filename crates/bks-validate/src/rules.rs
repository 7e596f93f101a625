//! Run-level validation settings.

use chrono::NaiveDate;

/// Bounds applied by the cross-field checks.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ValidationRules {
    /// Orders dated before this are inconsistent.
    pub min_order_date: Option<NaiveDate>,
    /// Orders dated after this are inconsistent.
    pub max_order_date: Option<NaiveDate>,
}

impl ValidationRules {
    pub fn with_min_order_date(mut self, date: NaiveDate) -> Self {
        self.min_order_date = Some(date);
        self
    }

    pub fn with_max_order_date(mut self, date: NaiveDate) -> Self {
        self.max_order_date = Some(date);
        self
    }
}

/// Inclusive range for publication years.
pub const YEAR_RANGE: std::ops::RangeInclusive<i64> = 1000..=9999;

/// Smallest accepted order quantity.
pub const MIN_QUANTITY: i64 = 1;
