//! Run-scoped pipeline errors.
//!
//! Anything here stops the orchestrator. Row-scoped problems never surface
//! as errors; they become rejected rows in the diagnostics.

use std::path::PathBuf;

use bks_ingest::IngestError;
use bks_model::{ModelError, SourceKind};
use thiserror::Error;

use crate::config::ConfigError;
use crate::output::ArtifactError;
use crate::sink::SinkError;

#[derive(Debug, Error)]
pub enum PipelineError {
    /// Invalid settings, or an internal invariant the run could not keep.
    #[error("fatal configuration error: {0}")]
    FatalConfiguration(String),

    #[error("{kind} source unavailable: {path}")]
    SourceUnavailable { kind: SourceKind, path: PathBuf },

    /// A source container could not be decoded at all.
    #[error("{0}")]
    Envelope(IngestError),

    #[error("sink error: {0}")]
    Sink(#[from] SinkError),

    #[error("output error: {0}")]
    Output(#[from] ArtifactError),
}

impl PipelineError {
    /// Short machine-readable category.
    pub fn code(&self) -> &'static str {
        match self {
            PipelineError::FatalConfiguration(_) => "fatal_configuration",
            PipelineError::SourceUnavailable { .. } => "source_unavailable",
            PipelineError::Envelope(_) => "envelope",
            PipelineError::Sink(_) => "sink",
            PipelineError::Output(_) => "output",
        }
    }
}

impl From<IngestError> for PipelineError {
    fn from(error: IngestError) -> Self {
        match error {
            IngestError::SourceUnavailable { kind, path } => {
                PipelineError::SourceUnavailable { kind, path }
            }
            IngestError::DirectoryNotFound { path } => PipelineError::FatalConfiguration(format!(
                "dataset folder not found: {}",
                path.display()
            )),
            other => PipelineError::Envelope(other),
        }
    }
}

impl From<ConfigError> for PipelineError {
    fn from(error: ConfigError) -> Self {
        PipelineError::FatalConfiguration(error.to_string())
    }
}

impl From<ModelError> for PipelineError {
    fn from(error: ModelError) -> Self {
        PipelineError::FatalConfiguration(error.to_string())
    }
}

pub type Result<T> = std::result::Result<T, PipelineError>;
