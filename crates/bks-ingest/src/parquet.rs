//! Columnar binary reader backed by polars.
//!
//! The file is decoded into a `DataFrame` once; rows are then materialized
//! lazily as [`RawRecord`]s. Numeric cells keep their native type.

use std::fs::File;
use std::io::Cursor;
use std::path::Path;

use polars::prelude::*;

use bks_model::{RawRecord, RawValue, SourceKind};

use crate::error::{IngestError, Result, RowParseError, RowResult};

/// Streams records out of a decoded Parquet table.
#[derive(Debug)]
pub struct ParquetRecords {
    kind: SourceKind,
    frame: DataFrame,
    index: usize,
}

impl ParquetRecords {
    pub fn open(kind: SourceKind, path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|err| IngestError::open(kind, path, err))?;
        let frame = ParquetReader::new(file)
            .finish()
            .map_err(|err| IngestError::envelope(kind, format!("invalid Parquet: {err}")))?;
        Ok(Self::from_frame(kind, frame))
    }

    pub fn from_bytes(kind: SourceKind, bytes: Vec<u8>) -> Result<Self> {
        let frame = ParquetReader::new(Cursor::new(bytes))
            .finish()
            .map_err(|err| IngestError::envelope(kind, format!("invalid Parquet: {err}")))?;
        Ok(Self::from_frame(kind, frame))
    }

    pub fn from_frame(kind: SourceKind, frame: DataFrame) -> Self {
        tracing::debug!(
            source = %kind,
            rows = frame.height(),
            columns = frame.width(),
            "decoded Parquet table"
        );
        Self {
            kind,
            frame,
            index: 0,
        }
    }

    fn row(&self, index: usize) -> RowResult {
        let mut record = RawRecord::new(self.kind, index);
        for column in self.frame.get_columns() {
            let value = column
                .get(index)
                .map_err(|err| RowParseError::new(self.kind, index, err.to_string()))?;
            record.insert(column.name().as_str(), any_to_raw(value));
        }
        Ok(record)
    }
}

impl Iterator for ParquetRecords {
    type Item = RowResult;

    fn next(&mut self) -> Option<Self::Item> {
        if self.index >= self.frame.height() {
            return None;
        }
        let index = self.index;
        self.index += 1;
        Some(self.row(index))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.frame.height().saturating_sub(self.index);
        (remaining, Some(remaining))
    }
}

/// Converts a polars cell into a raw value, keeping integers and floats typed.
pub fn any_to_raw(value: AnyValue<'_>) -> RawValue {
    match value {
        AnyValue::Null => RawValue::Null,
        AnyValue::Boolean(b) => RawValue::Bool(b),
        AnyValue::Int8(v) => RawValue::Int(i64::from(v)),
        AnyValue::Int16(v) => RawValue::Int(i64::from(v)),
        AnyValue::Int32(v) => RawValue::Int(i64::from(v)),
        AnyValue::Int64(v) => RawValue::Int(v),
        AnyValue::UInt8(v) => RawValue::Int(i64::from(v)),
        AnyValue::UInt16(v) => RawValue::Int(i64::from(v)),
        AnyValue::UInt32(v) => RawValue::Int(i64::from(v)),
        AnyValue::UInt64(v) => match i64::try_from(v) {
            Ok(v) => RawValue::Int(v),
            Err(_) => RawValue::Text(v.to_string()),
        },
        AnyValue::Float32(v) => RawValue::Float(f64::from(v)),
        AnyValue::Float64(v) => RawValue::Float(v),
        AnyValue::String(s) => RawValue::Text(s.to_string()),
        AnyValue::StringOwned(s) => RawValue::Text(s.to_string()),
        // Dates, datetimes and anything else go through Display.
        other => {
            let s = other.to_string();
            let s = if s.starts_with('"') && s.ends_with('"') && s.len() >= 2 {
                s[1..s.len() - 1].to_string()
            } else {
                s
            };
            RawValue::Text(s)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn any_to_raw_keeps_numbers_typed() {
        assert_eq!(any_to_raw(AnyValue::Null), RawValue::Null);
        assert_eq!(any_to_raw(AnyValue::Int32(3)), RawValue::Int(3));
        assert_eq!(any_to_raw(AnyValue::Float64(2.5)), RawValue::Float(2.5));
        assert_eq!(
            any_to_raw(AnyValue::String("O1")),
            RawValue::Text("O1".into())
        );
    }

    #[test]
    fn garbage_bytes_are_fatal() {
        let err = ParquetRecords::from_bytes(SourceKind::Orders, b"not parquet".to_vec())
            .unwrap_err();
        assert!(matches!(err, IngestError::Envelope { .. }));
    }

    #[test]
    fn frame_rows_become_records() {
        let frame = DataFrame::new(vec![
            Series::new("id".into(), vec!["O1", "O2"]).into(),
            Series::new("quantity".into(), vec![1i64, 2]).into(),
        ])
        .unwrap();
        let records: Vec<_> = ParquetRecords::from_frame(SourceKind::Orders, frame)
            .map(|row| row.unwrap())
            .collect();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].index, 1);
        assert_eq!(records[1].get("quantity"), Some(&RawValue::Int(2)));
    }
}
