//! Book sales pipeline orchestration.
//!
//! [`run_pipeline`] drives the readers, normalizers, validator, coercion
//! engine and merge stage over one dataset, loads the joined [`Dataset`]
//! into a [`Sink`] and optionally writes the output artifacts.
//!
//! [`Dataset`]: bks_model::Dataset

pub mod config;
pub mod error;
pub mod merge;
pub mod output;
pub mod pipeline;
pub mod sink;

pub use config::{ConfigError, PipelineConfig};
pub use error::{PipelineError, Result};
pub use merge::{MergeOutcome, merge};
pub use output::{
    ArtifactError, ArtifactPaths, SALES_COLUMNS, read_dataset_artifact, write_dataset_artifact,
    write_dataset_csv, write_run_artifacts,
};
pub use pipeline::{DatasetRun, RunReport, run_all_datasets, run_dataset_folder, run_pipeline};
pub use sink::{MemorySink, QueryCriteria, Sink, SinkError};
