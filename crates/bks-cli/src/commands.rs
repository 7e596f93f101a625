use std::path::Path;

use anyhow::{Context, Result};
use tracing::{info, info_span};

use bks_core::{MemorySink, PipelineConfig, RunReport, run_all_datasets, run_dataset_folder};
use bks_model::RunStatus;
use bks_report::{SalesReport, analyze, write_report};

use bks_cli::summary::{batch_table, print_run_summary};

use crate::cli::{PipelineArgs, RunAllArgs, RunArgs};

/// Config file first, then command-line overrides.
fn build_config(args: &PipelineArgs) -> Result<PipelineConfig> {
    let mut config = match &args.config {
        Some(path) => PipelineConfig::load(path)
            .with_context(|| format!("load config {}", path.display()))?,
        None => PipelineConfig::default(),
    };
    if let Some(dir) = &args.output {
        config = config.with_output_dir(dir);
    }
    if args.day_first {
        config.day_first = true;
    }
    config.validate().context("validate config")?;
    Ok(config)
}

/// Analytics for a completed run, written next to the other artifacts.
fn sales_report(
    report: &RunReport,
    dir: &Path,
    write: bool,
    top_n: usize,
) -> Result<Option<SalesReport>> {
    let Some(dataset) = &report.dataset else {
        return Ok(None);
    };
    let sales = analyze(dataset, top_n);
    if write {
        write_report(&sales, dir).with_context(|| format!("write report to {}", dir.display()))?;
    }
    Ok(Some(sales))
}

pub fn run_dataset(args: &RunArgs) -> Result<RunStatus> {
    let config = build_config(&args.pipeline)?;
    let name = args
        .folder
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| args.folder.display().to_string());

    let span = info_span!("run", dataset = %name);
    let _guard = span.enter();

    let mut sink = MemorySink::new();
    let report = run_dataset_folder(&args.folder, &mut sink, &config);
    let sales = sales_report(
        &report,
        &config.output_dir,
        config.write_artifacts,
        args.pipeline.top_days,
    )?;
    print_run_summary(&name, &report, sales.as_ref());
    Ok(report.status)
}

pub fn run_all(args: &RunAllArgs) -> Result<RunStatus> {
    let config = build_config(&args.pipeline)?;
    let runs = run_all_datasets(&args.base, &config)
        .with_context(|| format!("list datasets in {}", args.base.display()))?;
    info!(datasets = runs.len(), "finished all datasets");

    let mut statuses = Vec::with_capacity(runs.len());
    for run in &runs {
        let dir = config.output_dir.join(&run.name);
        let sales = sales_report(
            &run.report,
            &dir,
            config.write_artifacts,
            args.pipeline.top_days,
        )?;
        print_run_summary(&run.name, &run.report, sales.as_ref());
        println!();
        statuses.push(run.report.status);
    }

    let rows: Vec<(String, &RunReport)> = runs
        .iter()
        .map(|run| (run.name.clone(), &run.report))
        .collect();
    println!("{}", batch_table(&rows));
    Ok(combined_status(&statuses))
}

/// Worst status across runs: any failure, then any partial success.
pub fn combined_status(statuses: &[RunStatus]) -> RunStatus {
    if statuses.contains(&RunStatus::Failed) {
        RunStatus::Failed
    } else if statuses.contains(&RunStatus::PartialSuccess) {
        RunStatus::PartialSuccess
    } else {
        RunStatus::Success
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn worst_status_wins() {
        assert_eq!(combined_status(&[]), RunStatus::Success);
        assert_eq!(
            combined_status(&[RunStatus::Success, RunStatus::PartialSuccess]),
            RunStatus::PartialSuccess
        );
        assert_eq!(
            combined_status(&[RunStatus::PartialSuccess, RunStatus::Failed]),
            RunStatus::Failed
        );
    }

    #[test]
    fn output_flag_enables_artifacts() {
        let args = PipelineArgs {
            config: None,
            output: Some("out".into()),
            day_first: true,
            top_days: 5,
        };
        let config = build_config(&args).unwrap();
        assert!(config.write_artifacts);
        assert!(config.day_first);
        assert_eq!(config.output_dir, Path::new("out"));
    }
}
