//! Source readers for book sales datasets.
//!
//! Each dataset folder holds three artifacts:
//!
//! - `books.yaml`: a sequence of mappings
//! - `users.csv`: a delimited table with a header row
//! - `orders.parquet`: a columnar binary table
//!
//! Readers yield [`RawRecord`](bks_model::RawRecord)s lazily. Malformed rows
//! are reported as [`RowParseError`]s without stopping the read; a missing or
//! unreadable artifact is an [`IngestError`].

pub mod csv;
pub mod discovery;
pub mod error;
pub mod parquet;
pub mod reader;
pub mod yaml;

pub use crate::csv::{CsvRecords, normalize_header};
pub use discovery::{SourcePaths, discover_dataset, list_dataset_folders};
pub use error::{IngestError, Result, RowParseError, RowResult};
pub use parquet::{ParquetRecords, any_to_raw};
pub use reader::RecordReader;
pub use yaml::YamlRecords;
