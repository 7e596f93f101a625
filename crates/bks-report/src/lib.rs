//! Sales analytics over a cleaned book sales [`Dataset`](bks_model::Dataset).
//!
//! Everything here is read-only over the dataset:
//!
//! - revenue per day and the top revenue days
//! - distinct real buyers, merging near-identical profiles
//! - distinct author sets and the best-selling one
//! - the best buyer and every user id linked to them

mod authors;
mod error;
mod output;
mod report;
mod revenue;
mod users;

#[cfg(test)]
mod test_support;

pub use authors::{AuthorSet, AuthorSetSales, author_set, count_author_sets, most_popular_author_set};
pub use error::{ReportError, Result};
pub use output::{
    DAILY_REVENUE_FILE, REPORT_FILE, TOP_DAYS_FILE, write_daily_revenue_csv, write_report,
    write_top_days_csv,
};
pub use report::{DEFAULT_TOP_DAYS, SalesReport, analyze};
pub use revenue::{DailyRevenue, RankedDay, daily_revenue, format_revenue, top_days};
pub use users::{
    BestBuyer, MAX_PROFILE_DIFFERENCES, UserProfile, best_buyer, count_real_users,
};
