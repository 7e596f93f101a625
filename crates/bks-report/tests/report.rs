//! Report computed over a small joined dataset.

use chrono::NaiveDate;
use insta::assert_snapshot;
use proptest::prelude::*;
use rust_decimal::Decimal;

use bks_model::{Dataset, SalesRow};
use bks_report::{DEFAULT_TOP_DAYS, analyze, count_real_users, write_report, write_top_days_csv};

fn row(order_id: &str, user_id: &str, day: u32, quantity: u32, price_cents: i64) -> SalesRow {
    let unit_price = Decimal::new(price_cents, 2);
    SalesRow {
        order_id: order_id.to_string(),
        user_id: user_id.to_string(),
        book_id: "B1".to_string(),
        title: "Salt Roads".to_string(),
        authors: vec!["Bo Chen".to_string(), "Ann Lee".to_string()],
        quantity,
        unit_price,
        revenue: unit_price * Decimal::from(quantity),
        order_date: NaiveDate::from_ymd_opt(2024, 6, day).unwrap(),
        user_name: format!("Reader {user_id}"),
        user_email: Some(format!("{}@example.com", user_id.to_lowercase())),
        user_phone: None,
        user_address: None,
        genre: None,
        publisher: None,
    }
}

fn dataset() -> Dataset {
    Dataset::new(vec![
        row("O1", "U1", 1, 2, 61_725),
        row("O2", "U2", 2, 1, 1_050),
        row("O3", "U1", 3, 1, 99),
        row("O4", "U3", 4, 3, 2_000),
        row("O5", "U2", 5, 1, 500),
        row("O6", "U3", 6, 1, 400),
        row("O7", "U1", 2, 1, 1_050),
    ])
    .unwrap()
}

#[test]
fn top_days_csv() {
    let report = analyze(&dataset(), DEFAULT_TOP_DAYS);
    let mut buffer = Vec::new();
    write_top_days_csv(&report.top_days, &mut buffer).unwrap();
    assert_snapshot!(String::from_utf8(buffer).unwrap().trim_end(), @r#"
    rank,date,revenue
    1,2024-06-01,"1,234.50"
    2,2024-06-04,60.00
    3,2024-06-02,21.00
    4,2024-06-05,5.00
    5,2024-06-06,4.00
    "#);
}

#[test]
fn summary_metrics() {
    let report = analyze(&dataset(), DEFAULT_TOP_DAYS);
    assert_eq!(report.daily_revenue.len(), 6);
    assert_eq!(report.real_users, 3);
    assert_eq!(report.author_sets, 1);

    let popular = report.most_popular_author_set.unwrap();
    assert_eq!(popular.label(), "Ann Lee, Bo Chen");
    assert_eq!(popular.quantity, 10);

    let best = report.best_buyer.unwrap();
    assert_eq!(best.user_id, "U1");
    assert_eq!(best.revenue.to_string(), "1245.99");
    assert_eq!(best.linked_user_ids, vec!["U1"]);
}

#[test]
fn writes_report_files() {
    let dir = tempfile::tempdir().unwrap();
    let report = analyze(&dataset(), 3);
    let paths = write_report(&report, dir.path()).unwrap();
    assert_eq!(paths.len(), 3);
    for path in &paths {
        assert!(path.is_file(), "{} missing", path.display());
    }
    let json = std::fs::read_to_string(dir.path().join("report.json")).unwrap();
    assert!(json.contains("\"real_users\": 3"));
}

proptest! {
    #[test]
    fn real_users_never_exceed_user_ids(
        users in prop::collection::vec((0usize..4, 0usize..3, 0usize..3), 1..12)
    ) {
        let rows: Vec<SalesRow> = users
            .iter()
            .enumerate()
            .map(|(i, (id, name, email))| SalesRow {
                user_name: format!("Name {name}"),
                user_email: Some(format!("mail{email}@example.com")),
                ..row(&format!("O{i}"), &format!("U{id}"), 1, 1, 100)
            })
            .collect();
        let dataset = Dataset::new(rows).unwrap();
        let ids: std::collections::BTreeSet<_> =
            dataset.iter().map(|r| r.user_id.clone()).collect();
        let real = count_real_users(&dataset);
        prop_assert!(real >= 1);
        prop_assert!(real <= ids.len());
    }
}
