//! The store contract the dataset is loaded into, and an in-memory store.

use std::sync::Arc;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use thiserror::Error;

use bks_model::{Dataset, SalesRow};

#[derive(Debug, Error)]
pub enum SinkError {
    #[error("failed to load dataset: {0}")]
    Load(String),

    #[error("no dataset has been loaded")]
    Empty,

    #[error("query failed: {0}")]
    Query(String),
}

/// A store that accepts a finished dataset and answers queries over it.
pub trait Sink {
    /// Replace the stored dataset.
    fn load(&mut self, dataset: Arc<Dataset>) -> Result<(), SinkError>;

    /// Rows matching `criteria`, in dataset order.
    fn query(&self, criteria: &QueryCriteria) -> Result<Vec<SalesRow>, SinkError>;
}

/// Filter for [`Sink::query`]. Empty criteria match every row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryCriteria {
    pub book_id: Option<String>,
    pub user_id: Option<String>,
    /// Matches any author of the book, case-insensitively.
    pub author: Option<String>,
    /// Inclusive lower bound on the order date.
    pub from: Option<NaiveDate>,
    /// Inclusive upper bound on the order date.
    pub to: Option<NaiveDate>,
    pub min_revenue: Option<Decimal>,
    pub limit: Option<usize>,
}

impl QueryCriteria {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn book(mut self, book_id: impl Into<String>) -> Self {
        self.book_id = Some(book_id.into());
        self
    }

    pub fn user(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    pub fn author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    pub fn between(mut self, from: NaiveDate, to: NaiveDate) -> Self {
        self.from = Some(from);
        self.to = Some(to);
        self
    }

    pub fn min_revenue(mut self, revenue: Decimal) -> Self {
        self.min_revenue = Some(revenue);
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn matches(&self, row: &SalesRow) -> bool {
        if let Some(book_id) = &self.book_id
            && row.book_id != *book_id
        {
            return false;
        }
        if let Some(user_id) = &self.user_id
            && row.user_id != *user_id
        {
            return false;
        }
        if let Some(author) = &self.author {
            let wanted = author.trim().to_lowercase();
            if !row.authors.iter().any(|a| a.to_lowercase() == wanted) {
                return false;
            }
        }
        if self.from.is_some_and(|from| row.order_date < from) {
            return false;
        }
        if self.to.is_some_and(|to| row.order_date > to) {
            return false;
        }
        if self.min_revenue.is_some_and(|min| row.revenue < min) {
            return false;
        }
        true
    }
}

/// Holds the last loaded dataset in memory.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    dataset: Option<Arc<Dataset>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn dataset(&self) -> Option<&Arc<Dataset>> {
        self.dataset.as_ref()
    }
}

impl Sink for MemorySink {
    fn load(&mut self, dataset: Arc<Dataset>) -> Result<(), SinkError> {
        tracing::debug!(rows = dataset.len(), "loading dataset into memory sink");
        self.dataset = Some(dataset);
        Ok(())
    }

    fn query(&self, criteria: &QueryCriteria) -> Result<Vec<SalesRow>, SinkError> {
        if criteria.from.zip(criteria.to).is_some_and(|(from, to)| from > to) {
            return Err(SinkError::Query("date range is reversed".to_string()));
        }
        let dataset = self.dataset.as_ref().ok_or(SinkError::Empty)?;
        let matching = dataset.iter().filter(|row| criteria.matches(row)).cloned();
        Ok(match criteria.limit {
            Some(limit) => matching.take(limit).collect(),
            None => matching.collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(order_id: &str, author: &str, day: u32, revenue: i64) -> SalesRow {
        SalesRow {
            order_id: order_id.to_string(),
            user_id: "U1".to_string(),
            book_id: "B1".to_string(),
            title: "Atlas".to_string(),
            authors: vec![author.to_string()],
            quantity: 1,
            unit_price: Decimal::new(revenue, 2),
            revenue: Decimal::new(revenue, 2),
            order_date: NaiveDate::from_ymd_opt(2024, 5, day).unwrap(),
            user_name: "Ann".to_string(),
            user_email: None,
            user_phone: None,
            user_address: None,
            genre: None,
            publisher: None,
        }
    }

    fn loaded() -> MemorySink {
        let dataset = Dataset::new(vec![
            row("O1", "Jane Doe", 1, 1000),
            row("O2", "John Roe", 2, 500),
            row("O3", "Jane Doe", 3, 2500),
        ])
        .unwrap();
        let mut sink = MemorySink::new();
        sink.load(dataset.into_shared()).unwrap();
        sink
    }

    fn ids(rows: &[SalesRow]) -> Vec<&str> {
        rows.iter().map(|row| row.order_id.as_str()).collect()
    }

    #[test]
    fn empty_sink_refuses_queries() {
        let err = MemorySink::new().query(&QueryCriteria::new()).unwrap_err();
        assert!(matches!(err, SinkError::Empty));
    }

    #[test]
    fn filters_combine() {
        let sink = loaded();
        let rows = sink
            .query(&QueryCriteria::new().author("jane doe").min_revenue(Decimal::new(2000, 2)))
            .unwrap();
        assert_eq!(ids(&rows), vec!["O3"]);

        let may = |d| NaiveDate::from_ymd_opt(2024, 5, d).unwrap();
        let rows = sink
            .query(&QueryCriteria::new().between(may(2), may(3)).limit(1))
            .unwrap();
        assert_eq!(ids(&rows), vec!["O2"]);
    }

    #[test]
    fn reversed_range_is_an_error() {
        let may = |d| NaiveDate::from_ymd_opt(2024, 5, d).unwrap();
        let err = loaded()
            .query(&QueryCriteria::new().between(may(3), may(1)))
            .unwrap_err();
        assert!(matches!(err, SinkError::Query(_)));
    }
}
