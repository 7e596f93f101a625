//! Per-source coercion of normalized records into canonical rows.

use rust_decimal::Decimal;

use bks_model::{Book, CanonicalRecord, Field, NormalizedRecord, Order, SourceKind, User};

use crate::coerce::{coerce_date, coerce_decimal, coerce_identifier, coerce_integer, round_currency};
use crate::error::{CoercionError, Result};
use crate::rules::CoercionRules;

fn required(record: &NormalizedRecord, field: Field) -> Result<&str> {
    record.text(field).ok_or(CoercionError::Missing { field })
}

fn optional(record: &NormalizedRecord, field: Field) -> Option<String> {
    record.text(field).map(str::to_string)
}

fn identifier(record: &NormalizedRecord, field: Field, rules: &CoercionRules) -> Result<String> {
    coerce_identifier(field, required(record, field)?, rules)
}

pub fn coerce_book(record: &NormalizedRecord, rules: &CoercionRules) -> Result<Book> {
    let book_id = identifier(record, Field::BookId, rules)?;
    let authors = record
        .list(Field::Author)
        .map(<[String]>::to_vec)
        .ok_or(CoercionError::Missing {
            field: Field::Author,
        })?;
    let year = match record.text(Field::Year) {
        Some(text) => Some(coerce_integer::<i32>(Field::Year, text)?),
        None => None,
    };
    Ok(Book {
        book_id,
        title: required(record, Field::Title)?.to_string(),
        authors,
        genre: optional(record, Field::Genre),
        publisher: optional(record, Field::Publisher),
        year,
    })
}

pub fn coerce_user(record: &NormalizedRecord, rules: &CoercionRules) -> Result<User> {
    Ok(User {
        user_id: identifier(record, Field::UserId, rules)?,
        name: required(record, Field::Name)?.to_string(),
        email: optional(record, Field::Email),
        phone: optional(record, Field::Phone),
        address: optional(record, Field::Address),
    })
}

/// Coerces an order and derives `revenue = quantity * unit_price`.
pub fn coerce_order(record: &NormalizedRecord, rules: &CoercionRules) -> Result<Order> {
    let order_id = identifier(record, Field::OrderId, rules)?;
    let user_id = identifier(record, Field::UserId, rules)?;
    let book_id = identifier(record, Field::BookId, rules)?;
    let quantity: u32 = coerce_integer(Field::Quantity, required(record, Field::Quantity)?)?;
    let unit_price = coerce_decimal(
        Field::UnitPrice,
        required(record, Field::UnitPrice)?,
        rules.currency_scale,
    )?;
    let order_date = coerce_date(Field::OrderDate, required(record, Field::OrderDate)?)?;
    let revenue = unit_price
        .checked_mul(Decimal::from(quantity))
        .ok_or_else(|| CoercionError::Value {
            field: Field::UnitPrice,
            value: unit_price.to_string(),
            message: format!("revenue overflows for quantity {quantity}"),
        })?;
    let revenue = round_currency(revenue, rules.currency_scale);
    Ok(Order {
        order_id,
        user_id,
        book_id,
        quantity,
        unit_price,
        revenue,
        order_date,
        shipping: optional(record, Field::Shipping),
    })
}

/// Coerce a record according to its source.
pub fn coerce_record(record: &NormalizedRecord, rules: &CoercionRules) -> Result<CanonicalRecord> {
    Ok(match record.source {
        SourceKind::Books => CanonicalRecord::Book(coerce_book(record, rules)?),
        SourceKind::Users => CanonicalRecord::User(coerce_user(record, rules)?),
        SourceKind::Orders => CanonicalRecord::Order(coerce_order(record, rules)?),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use bks_model::NormalizedValue;

    fn text(record: &mut NormalizedRecord, field: Field, value: &str) {
        record.set(field, NormalizedValue::Text(value.to_string()));
    }

    #[test]
    fn order_revenue_is_rounded_product() {
        let mut record = NormalizedRecord::new(SourceKind::Orders, 0);
        text(&mut record, Field::OrderId, "O1");
        text(&mut record, Field::UserId, "U1");
        text(&mut record, Field::BookId, "B1");
        text(&mut record, Field::Quantity, "3");
        text(&mut record, Field::UnitPrice, "14.4");
        text(&mut record, Field::OrderDate, "2024-12-12");

        let order = coerce_order(&record, &CoercionRules::default()).unwrap();
        assert_eq!(order.unit_price.to_string(), "14.40");
        assert_eq!(order.revenue.to_string(), "43.20");
        assert_eq!(order.order_date.to_string(), "2024-12-12");
        assert_eq!(order.shipping, None);
    }

    #[test]
    fn revenue_overflow_rejects_the_order() {
        let mut record = NormalizedRecord::new(SourceKind::Orders, 4);
        text(&mut record, Field::OrderId, "O1");
        text(&mut record, Field::UserId, "U1");
        text(&mut record, Field::BookId, "B1");
        text(&mut record, Field::Quantity, "1000");
        text(&mut record, Field::UnitPrice, "100000000000000000000000000");
        text(&mut record, Field::OrderDate, "2024-12-12");

        let err = coerce_order(&record, &CoercionRules::default()).unwrap_err();
        assert_eq!(err.reason(), bks_model::RejectReason::ValueFormatError);
        assert_eq!(err.field(), Field::UnitPrice);
    }

    #[test]
    fn book_needs_authors() {
        let mut record = NormalizedRecord::new(SourceKind::Books, 0);
        text(&mut record, Field::BookId, "B1");
        text(&mut record, Field::Title, "Salt Roads");
        record.set(Field::Author, NormalizedValue::List(Vec::new()));
        let err = coerce_book(&record, &CoercionRules::default()).unwrap_err();
        assert_eq!(err, CoercionError::Missing { field: Field::Author });
    }

    #[test]
    fn identity_checked_before_values() {
        let mut record = NormalizedRecord::new(SourceKind::Users, 2);
        text(&mut record, Field::UserId, "U 7");
        let err = coerce_user(&record, &CoercionRules::default()).unwrap_err();
        let rejected = err.into_rejected(SourceKind::Users, 2);
        assert_eq!(rejected.reason, bks_model::RejectReason::IdentityFormatError);
        assert_eq!(rejected.field, Some(Field::UserId));
    }
}
