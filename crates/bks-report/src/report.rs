//! The combined sales report.

use serde::{Deserialize, Serialize};

use bks_model::Dataset;

use crate::authors::{AuthorSetSales, count_author_sets, most_popular_author_set};
use crate::revenue::{DailyRevenue, RankedDay, daily_revenue, top_days};
use crate::users::{BestBuyer, best_buyer, count_real_users};

/// Number of top revenue days reported by default.
pub const DEFAULT_TOP_DAYS: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalesReport {
    pub daily_revenue: Vec<DailyRevenue>,
    pub top_days: Vec<RankedDay>,
    pub real_users: usize,
    pub author_sets: usize,
    pub most_popular_author_set: Option<AuthorSetSales>,
    pub best_buyer: Option<BestBuyer>,
}

/// Compute every metric over `dataset`.
pub fn analyze(dataset: &Dataset, top_n: usize) -> SalesReport {
    let daily = daily_revenue(dataset);
    let top = top_days(&daily, top_n);
    let report = SalesReport {
        top_days: top,
        real_users: count_real_users(dataset),
        author_sets: count_author_sets(dataset),
        most_popular_author_set: most_popular_author_set(dataset),
        best_buyer: best_buyer(dataset),
        daily_revenue: daily,
    };
    tracing::debug!(
        days = report.daily_revenue.len(),
        real_users = report.real_users,
        author_sets = report.author_sets,
        "computed sales report"
    );
    report
}
