//! Format dispatch over the three source readers.

use std::path::Path;

use bks_model::{SourceFormat, SourceKind};

use crate::csv::CsvRecords;
use crate::error::{IngestError, Result, RowResult};
use crate::parquet::ParquetRecords;
use crate::yaml::YamlRecords;

/// A lazy, finite stream of raw records for one source.
///
/// Each item is either a record or a row-scoped parse error; run-scoped
/// failures surface from [`RecordReader::open`] instead.
#[derive(Debug)]
pub enum RecordReader {
    Yaml(YamlRecords),
    Csv(CsvRecords),
    Parquet(ParquetRecords),
}

impl RecordReader {
    /// Open the artifact for `kind` using its native format.
    pub fn open(kind: SourceKind, path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(IngestError::SourceUnavailable {
                kind,
                path: path.to_path_buf(),
            });
        }
        tracing::debug!(source = %kind, path = %path.display(), "opening source");
        Ok(match kind.format() {
            SourceFormat::Yaml => Self::Yaml(YamlRecords::open(kind, path)?),
            SourceFormat::Csv => Self::Csv(CsvRecords::open(kind, path)?),
            SourceFormat::Parquet => Self::Parquet(ParquetRecords::open(kind, path)?),
        })
    }

    /// Decode an in-memory artifact.
    pub fn from_bytes(kind: SourceKind, bytes: Vec<u8>) -> Result<Self> {
        Ok(match kind.format() {
            SourceFormat::Yaml => {
                let text = String::from_utf8(bytes)
                    .map_err(|_| IngestError::envelope(kind, "document is not valid UTF-8"))?;
                Self::Yaml(YamlRecords::from_str(kind, &text)?)
            }
            SourceFormat::Csv => Self::Csv(CsvRecords::from_reader(
                kind,
                std::io::Cursor::new(bytes),
            )?),
            SourceFormat::Parquet => Self::Parquet(ParquetRecords::from_bytes(kind, bytes)?),
        })
    }
}

impl Iterator for RecordReader {
    type Item = RowResult;

    fn next(&mut self) -> Option<Self::Item> {
        match self {
            Self::Yaml(records) => records.next(),
            Self::Csv(records) => records.next(),
            Self::Parquet(records) => records.next(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_path_is_source_unavailable() {
        let err = RecordReader::open(SourceKind::Books, Path::new("/nonexistent/books.yaml"))
            .unwrap_err();
        assert!(matches!(
            err,
            IngestError::SourceUnavailable {
                kind: SourceKind::Books,
                ..
            }
        ));
    }

    #[test]
    fn dispatches_on_source_format() {
        let reader =
            RecordReader::from_bytes(SourceKind::Users, b"id,name\n1,Ann\n".to_vec()).unwrap();
        assert!(matches!(reader, RecordReader::Csv(_)));
        assert_eq!(reader.count(), 1);
    }
}
