use chrono::NaiveDate;
use rust_decimal::Decimal;

use bks_model::SalesRow;

pub fn sale(
    order_id: &str,
    user_id: &str,
    name: &str,
    email: Option<&str>,
    phone: Option<&str>,
    cents: i64,
) -> SalesRow {
    SalesRow {
        order_id: order_id.to_string(),
        user_id: user_id.to_string(),
        book_id: "B1".to_string(),
        title: "Atlas".to_string(),
        authors: vec!["Jane Doe".to_string()],
        quantity: 1,
        unit_price: Decimal::new(cents, 2),
        revenue: Decimal::new(cents, 2),
        order_date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
        user_name: name.to_string(),
        user_email: email.map(str::to_string),
        user_phone: phone.map(str::to_string),
        user_address: None,
        genre: None,
        publisher: None,
    }
}

pub fn sale_of(order_id: &str, authors: &[&str], quantity: u32) -> SalesRow {
    SalesRow {
        authors: authors.iter().map(|a| (*a).to_string()).collect(),
        quantity,
        ..sale(order_id, "U1", "Ann Reader", None, None, 100)
    }
}
