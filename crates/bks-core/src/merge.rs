//! Inner join of orders to their book and buyer.

use std::collections::HashMap;

use bks_model::{Book, Field, Order, RejectReason, RejectedRow, SalesRow, SourceKind, User};

/// Joined rows in order input order, plus orders whose references are dangling.
#[derive(Debug, Clone, Default)]
pub struct MergeOutcome {
    pub rows: Vec<SalesRow>,
    pub rejected: Vec<RejectedRow>,
}

/// Join each `(read index, order)` with the book and user it references.
///
/// A missing book is reported before a missing user.
pub fn merge(orders: &[(usize, Order)], books: &[Book], users: &[User]) -> MergeOutcome {
    let books: HashMap<&str, &Book> = books.iter().map(|b| (b.book_id.as_str(), b)).collect();
    let users: HashMap<&str, &User> = users.iter().map(|u| (u.user_id.as_str(), u)).collect();

    let mut outcome = MergeOutcome::default();
    for (index, order) in orders {
        let Some(book) = books.get(order.book_id.as_str()) else {
            outcome.rejected.push(dangling(*index, Field::BookId, &order.book_id));
            continue;
        };
        let Some(user) = users.get(order.user_id.as_str()) else {
            outcome.rejected.push(dangling(*index, Field::UserId, &order.user_id));
            continue;
        };
        outcome.rows.push(SalesRow::join(order, book, user));
    }
    outcome
}

fn dangling(index: usize, field: Field, id: &str) -> RejectedRow {
    RejectedRow::new(
        SourceKind::Orders,
        index,
        RejectReason::ReferentialIntegrityError,
        format!("{field} {id} not found"),
    )
    .with_field(field)
}
