//! Delimited-text reader with a header row.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::{ByteRecord, ReaderBuilder};

use bks_model::{RawRecord, RawValue, SourceKind};

use crate::error::{IngestError, Result, RowParseError, RowResult};

/// Trims, strips a byte-order mark, and collapses inner whitespace.
pub fn normalize_header(raw: &str) -> String {
    let trimmed = raw.trim().trim_matches('\u{feff}');
    trimmed.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn normalize_cell(raw: &str) -> RawValue {
    let cell = raw.trim().trim_matches('\u{feff}');
    if cell.is_empty() {
        RawValue::Null
    } else {
        RawValue::Text(cell.to_string())
    }
}

/// Streams records from a CSV source. Cells are kept as text.
pub struct CsvRecords {
    kind: SourceKind,
    reader: csv::Reader<Box<dyn Read>>,
    headers: Vec<String>,
    buffer: ByteRecord,
    index: usize,
    done: bool,
}

impl std::fmt::Debug for CsvRecords {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CsvRecords")
            .field("kind", &self.kind)
            .field("headers", &self.headers)
            .field("index", &self.index)
            .finish_non_exhaustive()
    }
}

impl CsvRecords {
    pub fn open(kind: SourceKind, path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|err| IngestError::open(kind, path, err))?;
        Self::from_reader(kind, file)
    }

    /// Read the header row. A missing or undecodable header is fatal.
    pub fn from_reader(kind: SourceKind, input: impl Read + 'static) -> Result<Self> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(Box::new(input) as Box<dyn Read>);
        let raw_headers = reader
            .byte_headers()
            .map_err(|err| IngestError::envelope(kind, format!("invalid header: {err}")))?
            .clone();
        let mut headers = Vec::with_capacity(raw_headers.len());
        for raw in raw_headers.iter() {
            let text = std::str::from_utf8(raw)
                .map_err(|_| IngestError::envelope(kind, "header is not valid UTF-8"))?;
            headers.push(normalize_header(text));
        }
        if headers.iter().all(String::is_empty) {
            return Err(IngestError::envelope(kind, "missing header row"));
        }
        tracing::debug!(source = %kind, columns = headers.len(), "parsed CSV header");
        Ok(Self {
            kind,
            reader,
            headers,
            buffer: ByteRecord::new(),
            index: 0,
            done: false,
        })
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    fn build(&self, index: usize) -> RowResult {
        if self.buffer.len() != self.headers.len() {
            return Err(RowParseError::new(
                self.kind,
                index,
                format!(
                    "expected {} columns, found {}",
                    self.headers.len(),
                    self.buffer.len()
                ),
            ));
        }
        let mut record = RawRecord::new(self.kind, index);
        for (header, raw) in self.headers.iter().zip(self.buffer.iter()) {
            if header.is_empty() {
                continue;
            }
            let text = std::str::from_utf8(raw).map_err(|_| {
                RowParseError::new(self.kind, index, format!("{header}: invalid UTF-8"))
            })?;
            record.insert(header.clone(), normalize_cell(text));
        }
        Ok(record)
    }
}

fn is_blank(record: &ByteRecord) -> bool {
    record
        .iter()
        .all(|cell| cell.iter().all(u8::is_ascii_whitespace))
}

impl Iterator for CsvRecords {
    type Item = RowResult;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.done {
                return None;
            }
            match self.reader.read_byte_record(&mut self.buffer) {
                Ok(false) => {
                    self.done = true;
                    return None;
                }
                Ok(true) if is_blank(&self.buffer) => continue,
                Ok(true) => {
                    let index = self.index;
                    self.index += 1;
                    return Some(self.build(index));
                }
                Err(err) => {
                    let index = self.index;
                    self.index += 1;
                    if matches!(err.kind(), csv::ErrorKind::Io(_)) {
                        self.done = true;
                    }
                    return Some(Err(RowParseError::new(self.kind, index, err.to_string())));
                }
            }
        }
    }
}
