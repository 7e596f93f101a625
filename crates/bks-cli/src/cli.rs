//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "bks",
    version,
    about = "Book sales cleaning pipeline",
    long_about = "Clean and join book sales data.\n\n\
                  Reads books.yaml, users.csv and orders.parquet from a dataset folder,\n\
                  normalizes, validates and deduplicates every row, and produces one\n\
                  typed sales table plus a diagnostics report."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for debug, -vv for trace, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Show user personal values (names, emails, phones) in logs and summaries.
    #[arg(long = "log-data", global = true)]
    pub log_data: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the pipeline over one dataset folder.
    Run(RunArgs),

    /// Run the pipeline over every dataset folder below a base directory.
    RunAll(RunAllArgs),
}

/// Settings shared by both commands.
#[derive(Parser)]
pub struct PipelineArgs {
    /// Pipeline settings file (TOML).
    #[arg(long = "config", value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Write artifacts into this directory.
    #[arg(long = "output", value_name = "DIR")]
    pub output: Option<PathBuf>,

    /// Read ambiguous numeric dates as day/month.
    #[arg(long = "day-first")]
    pub day_first: bool,

    /// Number of top revenue days to report.
    #[arg(long = "top-days", value_name = "N", default_value_t = bks_report::DEFAULT_TOP_DAYS)]
    pub top_days: usize,
}

#[derive(Parser)]
pub struct RunArgs {
    /// Dataset folder containing books.yaml, users.csv and orders.parquet.
    #[arg(value_name = "FOLDER")]
    pub folder: PathBuf,

    #[command(flatten)]
    pub pipeline: PipelineArgs,
}

#[derive(Parser)]
pub struct RunAllArgs {
    /// Directory whose sub-folders are datasets.
    #[arg(value_name = "BASE", default_value = "data")]
    pub base: PathBuf,

    #[command(flatten)]
    pub pipeline: PipelineArgs,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
