//! Output artifacts: the cleaned sales table, per-source dumps, diagnostics.
//!
//! `sales_cleaned.csv` has a fixed column order and one record per dataset
//! row. Author lists are joined with `"; "`, absent optional values are
//! written as empty cells, money keeps its currency scale and dates are ISO.

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use thiserror::Error;

use bks_model::{Book, Dataset, Diagnostics, ModelError, Order, SalesRow, User};

pub const SALES_FILE: &str = "sales_cleaned.csv";
pub const BOOKS_FILE: &str = "books_cleaned.csv";
pub const USERS_FILE: &str = "users_cleaned.csv";
pub const ORDERS_FILE: &str = "orders_cleaned.csv";
pub const DIAGNOSTICS_FILE: &str = "diagnostics.json";

/// Column order of the sales artifact.
pub const SALES_COLUMNS: [&str; 15] = [
    "order_id",
    "user_id",
    "book_id",
    "title",
    "authors",
    "quantity",
    "unit_price",
    "revenue",
    "order_date",
    "user_name",
    "user_email",
    "user_phone",
    "user_address",
    "genre",
    "publisher",
];

const BOOK_COLUMNS: [&str; 6] = ["book_id", "title", "authors", "genre", "publisher", "year"];
const USER_COLUMNS: [&str; 5] = ["user_id", "name", "email", "phone", "address"];
const ORDER_COLUMNS: [&str; 8] = [
    "order_id",
    "user_id",
    "book_id",
    "quantity",
    "unit_price",
    "revenue",
    "order_date",
    "shipping",
];

const AUTHOR_SEPARATOR: &str = "; ";

#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unexpected header: expected {expected:?}, found {found:?}")]
    Header {
        expected: Vec<String>,
        found: Vec<String>,
    },

    #[error("line {line}: {message}")]
    Row { line: u64, message: String },

    #[error(transparent)]
    Model(#[from] ModelError),
}

pub type Result<T> = std::result::Result<T, ArtifactError>;

/// Paths of the artifacts written for one run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArtifactPaths {
    pub sales: Option<PathBuf>,
    pub books: Option<PathBuf>,
    pub users: Option<PathBuf>,
    pub orders: Option<PathBuf>,
    pub diagnostics: Option<PathBuf>,
}

impl ArtifactPaths {
    pub fn iter(&self) -> impl Iterator<Item = &PathBuf> {
        [
            &self.sales,
            &self.books,
            &self.users,
            &self.orders,
            &self.diagnostics,
        ]
        .into_iter()
        .flatten()
    }
}

fn opt(value: Option<&String>) -> &str {
    value.map_or("", String::as_str)
}

fn sales_record(row: &SalesRow) -> [String; 15] {
    [
        row.order_id.clone(),
        row.user_id.clone(),
        row.book_id.clone(),
        row.title.clone(),
        row.authors.join(AUTHOR_SEPARATOR),
        row.quantity.to_string(),
        row.unit_price.to_string(),
        row.revenue.to_string(),
        row.order_date.format("%Y-%m-%d").to_string(),
        row.user_name.clone(),
        opt(row.user_email.as_ref()).to_string(),
        opt(row.user_phone.as_ref()).to_string(),
        opt(row.user_address.as_ref()).to_string(),
        opt(row.genre.as_ref()).to_string(),
        opt(row.publisher.as_ref()).to_string(),
    ]
}

/// Write the sales table as CSV.
pub fn write_dataset_csv<W: Write>(dataset: &Dataset, writer: W) -> Result<()> {
    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record(SALES_COLUMNS)?;
    for row in dataset {
        csv.write_record(sales_record(row))?;
    }
    csv.flush().map_err(csv::Error::from)?;
    Ok(())
}

fn create(dir: &Path, name: &str) -> Result<(PathBuf, File)> {
    std::fs::create_dir_all(dir).map_err(|source| ArtifactError::Io {
        path: dir.to_path_buf(),
        source,
    })?;
    let path = dir.join(name);
    let file = File::create(&path).map_err(|source| ArtifactError::Io {
        path: path.clone(),
        source,
    })?;
    Ok((path, file))
}

/// Write `sales_cleaned.csv` into `dir`.
pub fn write_dataset_artifact(dataset: &Dataset, dir: &Path) -> Result<PathBuf> {
    let (path, file) = create(dir, SALES_FILE)?;
    write_dataset_csv(dataset, file)?;
    tracing::info!(path = %path.display(), rows = dataset.len(), "wrote sales artifact");
    Ok(path)
}

/// Read a sales artifact back into a dataset.
pub fn read_dataset_artifact(path: &Path) -> Result<Dataset> {
    let file = File::open(path).map_err(|source| ArtifactError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    read_dataset_csv(file)
}

pub fn read_dataset_csv<R: std::io::Read>(reader: R) -> Result<Dataset> {
    let mut csv = csv::Reader::from_reader(reader);
    let found: Vec<String> = csv.headers()?.iter().map(str::to_string).collect();
    if found != SALES_COLUMNS {
        return Err(ArtifactError::Header {
            expected: SALES_COLUMNS.iter().map(|c| (*c).to_string()).collect(),
            found,
        });
    }

    let mut rows = Vec::new();
    for record in csv.records() {
        let record = record?;
        let line = record.position().map_or(0, csv::Position::line);
        rows.push(parse_sales_row(&record, line)?);
    }
    Ok(Dataset::new(rows)?)
}

fn parse_sales_row(record: &csv::StringRecord, line: u64) -> Result<SalesRow> {
    let cell = |i: usize| record.get(i).unwrap_or_default();
    let optional = |i: usize| {
        let value = cell(i);
        (!value.is_empty()).then(|| value.to_string())
    };
    let bad = |column: &str, value: &str| ArtifactError::Row {
        line,
        message: format!("invalid {column}: {value:?}"),
    };
    let decimal = |i: usize| Decimal::from_str(cell(i)).map_err(|_| bad(SALES_COLUMNS[i], cell(i)));

    let authors = cell(4);
    Ok(SalesRow {
        order_id: cell(0).to_string(),
        user_id: cell(1).to_string(),
        book_id: cell(2).to_string(),
        title: cell(3).to_string(),
        authors: if authors.is_empty() {
            Vec::new()
        } else {
            authors.split(AUTHOR_SEPARATOR).map(str::to_string).collect()
        },
        quantity: cell(5).parse().map_err(|_| bad("quantity", cell(5)))?,
        unit_price: decimal(6)?,
        revenue: decimal(7)?,
        order_date: NaiveDate::parse_from_str(cell(8), "%Y-%m-%d")
            .map_err(|_| bad("order_date", cell(8)))?,
        user_name: cell(9).to_string(),
        user_email: optional(10),
        user_phone: optional(11),
        user_address: optional(12),
        genre: optional(13),
        publisher: optional(14),
    })
}

/// Write the deduplicated, coerced books.
pub fn write_books_csv<W: Write>(books: &[Book], writer: W) -> Result<()> {
    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record(BOOK_COLUMNS)?;
    for book in books {
        csv.write_record([
            book.book_id.as_str(),
            book.title.as_str(),
            book.authors.join(AUTHOR_SEPARATOR).as_str(),
            opt(book.genre.as_ref()),
            opt(book.publisher.as_ref()),
            book.year.map(|y| y.to_string()).unwrap_or_default().as_str(),
        ])?;
    }
    csv.flush().map_err(csv::Error::from)?;
    Ok(())
}

pub fn write_users_csv<W: Write>(users: &[User], writer: W) -> Result<()> {
    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record(USER_COLUMNS)?;
    for user in users {
        csv.write_record([
            user.user_id.as_str(),
            user.name.as_str(),
            opt(user.email.as_ref()),
            opt(user.phone.as_ref()),
            opt(user.address.as_ref()),
        ])?;
    }
    csv.flush().map_err(csv::Error::from)?;
    Ok(())
}

pub fn write_orders_csv<W: Write>(orders: &[Order], writer: W) -> Result<()> {
    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record(ORDER_COLUMNS)?;
    for order in orders {
        csv.write_record([
            order.order_id.clone(),
            order.user_id.clone(),
            order.book_id.clone(),
            order.quantity.to_string(),
            order.unit_price.to_string(),
            order.revenue.to_string(),
            order.order_date.format("%Y-%m-%d").to_string(),
            opt(order.shipping.as_ref()).to_string(),
        ])?;
    }
    csv.flush().map_err(csv::Error::from)?;
    Ok(())
}

pub fn write_diagnostics_json(diagnostics: &Diagnostics, dir: &Path) -> Result<PathBuf> {
    let (path, mut file) = create(dir, DIAGNOSTICS_FILE)?;
    let json = serde_json::to_string_pretty(diagnostics)?;
    file.write_all(json.as_bytes())
        .map_err(|source| ArtifactError::Io {
            path: path.clone(),
            source,
        })?;
    Ok(path)
}

/// Everything a completed run writes.
#[derive(Debug, Clone, Copy)]
pub struct RunArtifacts<'a> {
    pub dataset: &'a Dataset,
    pub books: &'a [Book],
    pub users: &'a [User],
    pub orders: &'a [Order],
    pub diagnostics: &'a Diagnostics,
}

/// Write the sales table, per-source dumps and diagnostics into `dir`.
pub fn write_run_artifacts(artifacts: RunArtifacts<'_>, dir: &Path) -> Result<ArtifactPaths> {
    let sales = write_dataset_artifact(artifacts.dataset, dir)?;

    let (books, file) = create(dir, BOOKS_FILE)?;
    write_books_csv(artifacts.books, file)?;
    let (users, file) = create(dir, USERS_FILE)?;
    write_users_csv(artifacts.users, file)?;
    let (orders, file) = create(dir, ORDERS_FILE)?;
    write_orders_csv(artifacts.orders, file)?;

    let diagnostics = write_diagnostics_json(artifacts.diagnostics, dir)?;
    tracing::debug!(dir = %dir.display(), "wrote per-source artifacts");

    Ok(ArtifactPaths {
        sales: Some(sales),
        books: Some(books),
        users: Some(users),
        orders: Some(orders),
        diagnostics: Some(diagnostics),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use insta::assert_snapshot;

    fn sample() -> Dataset {
        Dataset::new(vec![
            SalesRow {
                order_id: "O1".to_string(),
                user_id: "U1".to_string(),
                book_id: "B1".to_string(),
                title: "Atlas, Vol. 2".to_string(),
                authors: vec!["Jane Doe".to_string(), "John Roe".to_string()],
                quantity: 2,
                unit_price: Decimal::new(1050, 2),
                revenue: Decimal::new(2100, 2),
                order_date: NaiveDate::from_ymd_opt(2024, 12, 3).unwrap(),
                user_name: "Ann Reader".to_string(),
                user_email: Some("ann@example.com".to_string()),
                user_phone: None,
                user_address: None,
                genre: Some("Fiction".to_string()),
                publisher: None,
            },
            SalesRow {
                order_id: "O2".to_string(),
                user_id: "U2".to_string(),
                book_id: "B1".to_string(),
                title: "Atlas, Vol. 2".to_string(),
                authors: vec!["Jane Doe".to_string(), "John Roe".to_string()],
                quantity: 1,
                unit_price: Decimal::new(123450, 2),
                revenue: Decimal::new(123450, 2),
                order_date: NaiveDate::from_ymd_opt(2025, 1, 15).unwrap(),
                user_name: "Bo Lee".to_string(),
                user_email: None,
                user_phone: Some("555-0101".to_string()),
                user_address: Some("1 Main St".to_string()),
                genre: None,
                publisher: Some("Harbor".to_string()),
            },
        ])
        .unwrap()
    }

    #[test]
    fn renders_sales_csv() {
        let mut buffer = Vec::new();
        write_dataset_csv(&sample(), &mut buffer).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        assert_snapshot!(text.trim_end(), @r#"
        order_id,user_id,book_id,title,authors,quantity,unit_price,revenue,order_date,user_name,user_email,user_phone,user_address,genre,publisher
        O1,U1,B1,"Atlas, Vol. 2",Jane Doe; John Roe,2,10.50,21.00,2024-12-03,Ann Reader,ann@example.com,,,Fiction,
        O2,U2,B1,"Atlas, Vol. 2",Jane Doe; John Roe,1,1234.50,1234.50,2025-01-15,Bo Lee,,555-0101,1 Main St,,Harbor
        "#);
    }

    #[test]
    fn artifact_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let dataset = sample();
        let path = write_dataset_artifact(&dataset, dir.path()).unwrap();
        assert_eq!(read_dataset_artifact(&path).unwrap(), dataset);
    }

    #[test]
    fn foreign_header_is_rejected() {
        let err = read_dataset_csv("id,title\n1,x\n".as_bytes()).unwrap_err();
        assert!(matches!(err, ArtifactError::Header { .. }));
    }

    #[test]
    fn bad_cell_names_its_line() {
        let mut buffer = Vec::new();
        write_dataset_csv(&sample(), &mut buffer).unwrap();
        let text = String::from_utf8(buffer)
            .unwrap()
            .replace("2024-12-03", "someday");
        let err = read_dataset_csv(text.as_bytes()).unwrap_err();
        assert_eq!(err.to_string(), "line 2: invalid order_date: \"someday\"");
    }
}
