//! Error types for source reading.

use std::path::PathBuf;

use bks_model::SourceKind;
use thiserror::Error;

/// Run-scoped failures: the source cannot be read at all.
#[derive(Debug, Error)]
pub enum IngestError {
    /// A dataset folder does not exist.
    #[error("directory not found: {path}")]
    DirectoryNotFound { path: PathBuf },

    /// Failed to list a directory.
    #[error("failed to read directory {path}: {source}")]
    DirectoryRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The source artifact is missing.
    #[error("{kind} source not found: {path}")]
    SourceUnavailable { kind: SourceKind, path: PathBuf },

    /// The source artifact exists but could not be read.
    #[error("failed to read {kind} source {path}: {source}")]
    FileRead {
        kind: SourceKind,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The container itself is unreadable (not a YAML sequence, no CSV
    /// header, not a Parquet file).
    #[error("unreadable {kind} source: {message}")]
    Envelope { kind: SourceKind, message: String },
}

impl IngestError {
    pub(crate) fn envelope(kind: SourceKind, message: impl Into<String>) -> Self {
        Self::Envelope {
            kind,
            message: message.into(),
        }
    }

    pub(crate) fn open(kind: SourceKind, path: &std::path::Path, err: std::io::Error) -> Self {
        if err.kind() == std::io::ErrorKind::NotFound {
            Self::SourceUnavailable {
                kind,
                path: path.to_path_buf(),
            }
        } else {
            Self::FileRead {
                kind,
                path: path.to_path_buf(),
                source: err,
            }
        }
    }
}

/// A single row that violated its source format. The read continues.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind} row {index}: {message}")]
pub struct RowParseError {
    pub kind: SourceKind,
    pub index: usize,
    pub message: String,
}

impl RowParseError {
    pub fn new(kind: SourceKind, index: usize, message: impl Into<String>) -> Self {
        Self {
            kind,
            index,
            message: message.into(),
        }
    }
}

/// Result type for opening sources.
pub type Result<T> = std::result::Result<T, IngestError>;

/// Item type yielded by every reader.
pub type RowResult = std::result::Result<bks_model::RawRecord, RowParseError>;
