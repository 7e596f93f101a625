//! Fully typed records conforming to the target schema.

use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};
use crate::source::SourceKind;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    pub book_id: String,
    pub title: String,
    /// Normalized author names in first-seen order; never empty.
    pub authors: Vec<String>,
    pub genre: Option<String>,
    pub publisher: Option<String>,
    pub year: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub user_id: String,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub order_id: String,
    pub user_id: String,
    pub book_id: String,
    pub quantity: u32,
    /// USD, rounded to the currency scale.
    pub unit_price: Decimal,
    /// `quantity * unit_price`, rounded to the currency scale.
    pub revenue: Decimal,
    pub order_date: NaiveDate,
    pub shipping: Option<String>,
}

/// The typed output of coercion for one source row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CanonicalRecord {
    Book(Book),
    User(User),
    Order(Order),
}

impl CanonicalRecord {
    pub fn source(&self) -> SourceKind {
        match self {
            CanonicalRecord::Book(_) => SourceKind::Books,
            CanonicalRecord::User(_) => SourceKind::Users,
            CanonicalRecord::Order(_) => SourceKind::Orders,
        }
    }
}

/// A unified order line joined with its book and buyer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalesRow {
    pub order_id: String,
    pub user_id: String,
    pub book_id: String,
    pub title: String,
    pub authors: Vec<String>,
    pub quantity: u32,
    pub unit_price: Decimal,
    pub revenue: Decimal,
    pub order_date: NaiveDate,
    pub user_name: String,
    pub user_email: Option<String>,
    pub user_phone: Option<String>,
    pub user_address: Option<String>,
    pub genre: Option<String>,
    pub publisher: Option<String>,
}

impl SalesRow {
    pub fn join(order: &Order, book: &Book, user: &User) -> Self {
        Self {
            order_id: order.order_id.clone(),
            user_id: order.user_id.clone(),
            book_id: order.book_id.clone(),
            title: book.title.clone(),
            authors: book.authors.clone(),
            quantity: order.quantity,
            unit_price: order.unit_price,
            revenue: order.revenue,
            order_date: order.order_date,
            user_name: user.name.clone(),
            user_email: user.email.clone(),
            user_phone: user.phone.clone(),
            user_address: user.address.clone(),
            genre: book.genre.clone(),
            publisher: book.publisher.clone(),
        }
    }

    /// Composite identity `(book_id, user_id, order_id)`.
    pub fn key(&self) -> (&str, &str, &str) {
        (&self.book_id, &self.user_id, &self.order_id)
    }
}

/// The deduplicated, joined result of one pipeline run.
///
/// Rows keep order-input order. There is no mutable access once built.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dataset {
    rows: Vec<SalesRow>,
}

impl Dataset {
    /// Build a dataset, rejecting any repeated identity key.
    pub fn new(rows: Vec<SalesRow>) -> Result<Self> {
        let mut seen = BTreeSet::new();
        for row in &rows {
            let (book, user, order) = row.key();
            if !seen.insert((book, user, order)) {
                return Err(ModelError::DuplicateIdentity(format!("{book}|{user}|{order}")));
            }
        }
        Ok(Self { rows })
    }

    pub fn rows(&self) -> &[SalesRow] {
        &self.rows
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SalesRow> {
        self.rows.iter()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn into_shared(self) -> Arc<Self> {
        Arc::new(self)
    }
}

impl<'a> IntoIterator for &'a Dataset {
    type Item = &'a SalesRow;
    type IntoIter = std::slice::Iter<'a, SalesRow>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}
