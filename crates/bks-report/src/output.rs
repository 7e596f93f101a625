//! Report files.

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::{ReportError, Result};
use crate::report::SalesReport;
use crate::revenue::{DailyRevenue, RankedDay};

pub const TOP_DAYS_FILE: &str = "top_days.csv";
pub const DAILY_REVENUE_FILE: &str = "daily_revenue.csv";
pub const REPORT_FILE: &str = "report.json";

pub fn write_top_days_csv<W: Write>(days: &[RankedDay], writer: W) -> Result<()> {
    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record(["rank", "date", "revenue"])?;
    for day in days {
        csv.write_record([
            day.rank.to_string(),
            day.date.format("%Y-%m-%d").to_string(),
            day.revenue.clone(),
        ])?;
    }
    csv.flush().map_err(csv::Error::from)?;
    Ok(())
}

pub fn write_daily_revenue_csv<W: Write>(days: &[DailyRevenue], writer: W) -> Result<()> {
    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record(["date", "revenue"])?;
    for day in days {
        csv.write_record([
            day.date.format("%Y-%m-%d").to_string(),
            day.revenue.to_string(),
        ])?;
    }
    csv.flush().map_err(csv::Error::from)?;
    Ok(())
}

fn create(path: PathBuf) -> Result<(PathBuf, File)> {
    match File::create(&path) {
        Ok(file) => Ok((path, file)),
        Err(source) => Err(ReportError::Io { path, source }),
    }
}

/// Write the top days, the daily revenue and the full report as JSON.
pub fn write_report(report: &SalesReport, dir: &Path) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(dir).map_err(|source| ReportError::Io {
        path: dir.to_path_buf(),
        source,
    })?;

    let (top, file) = create(dir.join(TOP_DAYS_FILE))?;
    write_top_days_csv(&report.top_days, file)?;
    let (daily, file) = create(dir.join(DAILY_REVENUE_FILE))?;
    write_daily_revenue_csv(&report.daily_revenue, file)?;

    let (json, mut file) = create(dir.join(REPORT_FILE))?;
    let text = serde_json::to_string_pretty(report)?;
    file.write_all(text.as_bytes())
        .map_err(|source| ReportError::Io {
            path: json.clone(),
            source,
        })?;

    tracing::info!(dir = %dir.display(), "wrote sales report");
    Ok(vec![top, daily, json])
}
