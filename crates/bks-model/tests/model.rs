//! Tests for bks-model types.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use bks_model::{
    Book, Dataset, Diagnostics, ModelError, Order, RejectReason, RejectedRow, SalesRow,
    SourceKind, User,
};

fn book(id: &str) -> Book {
    Book {
        book_id: id.to_string(),
        title: "The Long Shelf".to_string(),
        authors: vec!["Jane Doe".to_string()],
        genre: None,
        publisher: None,
        year: Some(1999),
    }
}

fn user(id: &str) -> User {
    User {
        user_id: id.to_string(),
        name: "Ann Reader".to_string(),
        email: Some("ann@example.com".to_string()),
        phone: None,
        address: None,
    }
}

fn order(id: &str, book_id: &str, user_id: &str) -> Order {
    Order {
        order_id: id.to_string(),
        user_id: user_id.to_string(),
        book_id: book_id.to_string(),
        quantity: 2,
        unit_price: Decimal::new(1050, 2),
        revenue: Decimal::new(2100, 2),
        order_date: NaiveDate::from_ymd_opt(2024, 12, 3).unwrap(),
        shipping: None,
    }
}

#[test]
fn sales_row_joins_order_book_and_user() {
    let row = SalesRow::join(&order("O1", "B1", "U1"), &book("B1"), &user("U1"));
    assert_eq!(row.key(), ("B1", "U1", "O1"));
    assert_eq!(row.title, "The Long Shelf");
    assert_eq!(row.user_name, "Ann Reader");
    assert_eq!(row.revenue.to_string(), "21.00");
}

#[test]
fn dataset_rejects_repeated_identity() {
    let first = SalesRow::join(&order("O1", "B1", "U1"), &book("B1"), &user("U1"));
    let err = Dataset::new(vec![first.clone(), first]).unwrap_err();
    assert!(matches!(err, ModelError::DuplicateIdentity(_)));
}

#[test]
fn dataset_keeps_row_order() {
    let rows = vec![
        SalesRow::join(&order("O2", "B1", "U1"), &book("B1"), &user("U1")),
        SalesRow::join(&order("O1", "B1", "U1"), &book("B1"), &user("U1")),
    ];
    let dataset = Dataset::new(rows).unwrap();
    let ids: Vec<&str> = dataset.iter().map(|row| row.order_id.as_str()).collect();
    assert_eq!(ids, vec!["O2", "O1"]);
}

#[test]
fn diagnostics_serialize_with_reason_codes() {
    let mut diagnostics = Diagnostics::default();
    diagnostics.record_rejection(
        RejectedRow::new(SourceKind::Orders, 4, RejectReason::DateFormatError, "13/45/2020")
            .with_field(bks_model::Field::OrderDate),
    );
    let json = serde_json::to_string(&diagnostics).expect("serialize diagnostics");
    assert!(json.contains("\"date_format_error\":1"));
    assert!(json.contains("\"field\":\"order_date\""));
    let round: Diagnostics = serde_json::from_str(&json).expect("deserialize diagnostics");
    assert_eq!(round, diagnostics);
}

#[test]
fn reject_reason_codes_round_trip() {
    for reason in RejectReason::ALL {
        assert_eq!(reason.code().parse::<RejectReason>().unwrap(), reason);
    }
}
