//! Source column names to canonical fields.

use bks_model::{Field, SourceKind};

/// Trim, lower-case, map spaces and hyphens to `_`, drop `:`.
pub fn clean_column_name(name: &str) -> String {
    name.trim()
        .to_lowercase()
        .chars()
        .filter(|c| *c != ':')
        .map(|c| if c == ' ' || c == '-' { '_' } else { c })
        .collect()
}

/// The canonical field a column feeds in `source`, if any.
///
/// Nested YAML keys (`meta.genre`) fall back to their last segment.
pub fn resolve_field(source: SourceKind, column: &str) -> Option<Field> {
    let cleaned = clean_column_name(column);
    alias(source, &cleaned).or_else(|| {
        let (_, last) = cleaned.rsplit_once('.')?;
        alias(source, last)
    })
}

/// True when the column is spelled exactly as the canonical field name.
pub fn is_canonical_name(column: &str, field: Field) -> bool {
    clean_column_name(column) == field.as_str()
}

fn alias(source: SourceKind, name: &str) -> Option<Field> {
    let field = match name {
        "id" => source.own_id(),
        "book_id" | "bookid" | "id_book" => Field::BookId,
        "user_id" | "userid" | "id_user" | "customer_id" => Field::UserId,
        "order_id" | "orderid" | "id_order" => Field::OrderId,
        "title" | "book_title" => Field::Title,
        "author" | "authors" | "writer" | "writers" => Field::Author,
        "genre" | "category" => Field::Genre,
        "publisher" => Field::Publisher,
        "year" | "publication_year" | "published_year" | "pub_year" => Field::Year,
        "name" | "full_name" | "user_name" | "username" => Field::Name,
        "email" | "e_mail" | "mail" => Field::Email,
        "phone" | "phone_number" | "telephone" => Field::Phone,
        "address" | "street_address" => Field::Address,
        "quantity" | "qty" => Field::Quantity,
        "unit_price" | "price" | "unitprice" => Field::UnitPrice,
        "order_date" | "date" | "timestamp" | "ordered_at" => Field::OrderDate,
        "shipping" | "shipping_address" | "ship_to" => Field::Shipping,
        _ => return None,
    };
    source.recognizes(field).then_some(field)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cleans_column_names() {
        assert_eq!(clean_column_name(" Unit Price: "), "unit_price");
        assert_eq!(clean_column_name("Order-Date"), "order_date");
    }

    #[test]
    fn id_depends_on_source() {
        assert_eq!(resolve_field(SourceKind::Books, "id"), Some(Field::BookId));
        assert_eq!(resolve_field(SourceKind::Users, "ID"), Some(Field::UserId));
        assert_eq!(resolve_field(SourceKind::Orders, "id"), Some(Field::OrderId));
    }

    #[test]
    fn aliases_and_nested_keys() {
        assert_eq!(
            resolve_field(SourceKind::Orders, "timestamp"),
            Some(Field::OrderDate)
        );
        assert_eq!(
            resolve_field(SourceKind::Books, "meta.genre"),
            Some(Field::Genre)
        );
    }

    #[test]
    fn fields_outside_the_source_are_dropped() {
        assert_eq!(resolve_field(SourceKind::Books, "price"), None);
        assert_eq!(resolve_field(SourceKind::Books, "name"), None);
        assert_eq!(resolve_field(SourceKind::Users, "favorite_color"), None);
    }
}
