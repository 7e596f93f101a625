//! Revenue per calendar day.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use bks_model::Dataset;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyRevenue {
    pub date: NaiveDate,
    pub revenue: Decimal,
}

/// A day among the highest-revenue days, with its revenue formatted for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankedDay {
    pub rank: usize,
    pub date: NaiveDate,
    pub revenue: String,
}

/// Revenue summed per order date, ascending by date.
pub fn daily_revenue(dataset: &Dataset) -> Vec<DailyRevenue> {
    let mut days: BTreeMap<NaiveDate, Decimal> = BTreeMap::new();
    for row in dataset {
        add_revenue(days.entry(row.order_date).or_default(), row.revenue);
    }
    days.into_iter()
        .map(|(date, revenue)| DailyRevenue { date, revenue })
        .collect()
}

/// Adds to a running total, saturating at `Decimal::MAX` instead of panicking.
pub(crate) fn add_revenue(total: &mut Decimal, revenue: Decimal) {
    *total = total.checked_add(revenue).unwrap_or_else(|| {
        tracing::warn!(%revenue, "revenue total overflowed; saturating");
        total.saturating_add(revenue)
    });
}

/// The `n` highest-revenue days. Ties go to the earlier date.
pub fn top_days(daily: &[DailyRevenue], n: usize) -> Vec<RankedDay> {
    let mut sorted: Vec<&DailyRevenue> = daily.iter().collect();
    sorted.sort_by(|a, b| b.revenue.cmp(&a.revenue).then(a.date.cmp(&b.date)));
    sorted
        .into_iter()
        .take(n)
        .enumerate()
        .map(|(i, day)| RankedDay {
            rank: i + 1,
            date: day.date,
            revenue: format_revenue(day.revenue),
        })
        .collect()
}

/// Two decimals with `,` thousands separators: `1234.5` becomes `1,234.50`.
pub fn format_revenue(value: Decimal) -> String {
    let rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let text = format!("{:.2}", rounded.abs());
    let (whole, fraction) = text.split_once('.').unwrap_or((text.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    format!("{sign}{grouped}.{fraction}")
}
