//! Terminal summaries rendered with comfy-table.

use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use bks_core::RunReport;
use bks_model::{Diagnostics, RejectReason, RunStatus, SourceKind};
use bks_report::SalesReport;

use crate::logging::redact_value;

/// Rejected rows listed individually before the table is cut off.
pub const MAX_LISTED_REJECTIONS: usize = 20;

pub fn print_run_summary(name: &str, report: &RunReport, sales: Option<&SalesReport>) {
    println!("Dataset: {name}");
    println!(
        "Status: {} (state {}, {} ms)",
        report.status,
        report.state,
        report.elapsed.as_millis()
    );
    for path in report.artifacts.iter() {
        println!("Wrote: {}", path.display());
    }
    println!("{}", diagnostics_table(&report.diagnostics));
    if let Some(table) = rejection_table(&report.diagnostics) {
        println!();
        println!("Rejections:");
        println!("{table}");
    }
    if let Some(table) = rejected_rows_table(&report.diagnostics, MAX_LISTED_REJECTIONS) {
        println!("{table}");
    }
    if let Some(sales) = sales {
        println!();
        println!("Sales:");
        println!("{}", sales_table(sales));
        if !sales.top_days.is_empty() {
            println!("{}", top_days_table(sales));
        }
    }
    if let Some(error) = &report.error {
        eprintln!("error: {error}");
    }
}

/// One line per dataset of a multi-dataset run.
pub fn batch_table(runs: &[(String, &RunReport)]) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Dataset"),
        header_cell("Status"),
        header_cell("Rows"),
        header_cell("Rejected"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 2, CellAlignment::Right);
    align_column(&mut table, 3, CellAlignment::Right);
    for (name, report) in runs {
        table.add_row(vec![
            Cell::new(name).add_attribute(Attribute::Bold),
            status_cell(report.status),
            Cell::new(report.diagnostics.final_rows),
            count_cell(report.diagnostics.rejected_total(), Color::Yellow),
        ]);
    }
    table
}

pub fn diagnostics_table(diagnostics: &Diagnostics) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Source"),
        header_cell("Read"),
        header_cell("Normalized"),
        header_cell("Validated"),
        header_cell("Unique"),
        header_cell("Coerced"),
        header_cell("Accepted"),
        header_cell("Rejected"),
    ]);
    apply_table_style(&mut table);
    for index in 1..8 {
        align_column(&mut table, index, CellAlignment::Right);
    }
    for source in diagnostics.sources() {
        table.add_row(vec![
            Cell::new(source.source).fg(Color::Blue),
            Cell::new(source.rows_read),
            Cell::new(source.normalized),
            Cell::new(source.validated),
            Cell::new(source.unique),
            Cell::new(source.coerced),
            Cell::new(source.accepted),
            count_cell(source.rejected_total(), Color::Yellow),
        ]);
    }
    table.add_row(vec![
        Cell::new("TOTAL")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        Cell::new(diagnostics.rows_read()).add_attribute(Attribute::Bold),
        dim_cell("-"),
        dim_cell("-"),
        dim_cell("-"),
        dim_cell("-"),
        Cell::new(diagnostics.final_rows).add_attribute(Attribute::Bold),
        count_cell(diagnostics.rejected_total(), Color::Yellow).add_attribute(Attribute::Bold),
    ]);
    table
}

/// Rejection counts by reason and source, or `None` when nothing was rejected.
pub fn rejection_table(diagnostics: &Diagnostics) -> Option<Table> {
    if !diagnostics.has_rejections() {
        return None;
    }
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Reason"),
        header_cell("Books"),
        header_cell("Users"),
        header_cell("Orders"),
        header_cell("Total"),
    ]);
    apply_table_style(&mut table);
    for index in 1..5 {
        align_column(&mut table, index, CellAlignment::Right);
    }
    for (reason, total) in diagnostics.rejected_by_reason() {
        let mut row = vec![reason_cell(reason)];
        for kind in SourceKind::ALL {
            row.push(count_cell(
                diagnostics.source(kind).rejected_for(reason),
                Color::Yellow,
            ));
        }
        row.push(Cell::new(total).add_attribute(Attribute::Bold));
        table.add_row(row);
    }
    Some(table)
}

/// The first `limit` rejected rows. Details of user rows are redacted.
pub fn rejected_rows_table(diagnostics: &Diagnostics, limit: usize) -> Option<Table> {
    if diagnostics.rejected_rows.is_empty() {
        return None;
    }
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Source"),
        header_cell("Row"),
        header_cell("Reason"),
        header_cell("Field"),
        header_cell("Detail"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    for row in diagnostics.rejected_rows.iter().take(limit) {
        let detail = if row.source == SourceKind::Users {
            redact_value(&row.detail)
        } else {
            row.detail.as_str()
        };
        table.add_row(vec![
            Cell::new(row.source),
            Cell::new(row.index),
            reason_cell(row.reason),
            row.field.map_or_else(|| dim_cell("-"), Cell::new),
            Cell::new(detail),
        ]);
    }
    let hidden = diagnostics.rejected_rows.len().saturating_sub(limit);
    if hidden > 0 {
        table.add_row(vec![
            dim_cell("..."),
            dim_cell("-"),
            dim_cell(format!("{hidden} more")),
            dim_cell("-"),
            dim_cell("-"),
        ]);
    }
    Some(table)
}

pub fn sales_table(sales: &SalesReport) -> Table {
    let mut table = Table::new();
    table.set_header(vec![header_cell("Metric"), header_cell("Value")]);
    apply_table_style(&mut table);
    table.add_row(vec![Cell::new("Real users"), Cell::new(sales.real_users)]);
    table.add_row(vec![
        Cell::new("Author sets"),
        Cell::new(sales.author_sets),
    ]);
    table.add_row(vec![
        Cell::new("Most popular author set"),
        match &sales.most_popular_author_set {
            Some(set) => Cell::new(format!("{} ({} sold)", set.label(), set.quantity)),
            None => dim_cell("N/A"),
        },
    ]);
    match &sales.best_buyer {
        Some(buyer) => {
            table.add_row(vec![
                Cell::new("Best buyer"),
                Cell::new(format!(
                    "{} {} ({})",
                    buyer.user_id,
                    redact_value(&buyer.name),
                    bks_report::format_revenue(buyer.revenue)
                )),
            ]);
            table.add_row(vec![
                Cell::new("Linked user ids"),
                Cell::new(buyer.linked_user_ids.join(", ")),
            ]);
        }
        None => {
            table.add_row(vec![Cell::new("Best buyer"), dim_cell("N/A")]);
        }
    }
    table
}

pub fn top_days_table(sales: &SalesReport) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Rank"),
        header_cell("Date"),
        header_cell("Revenue"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Right);
    align_column(&mut table, 2, CellAlignment::Right);
    for day in &sales.top_days {
        table.add_row(vec![
            Cell::new(day.rank),
            Cell::new(day.date),
            Cell::new(&day.revenue),
        ]);
    }
    table
}

fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn status_cell(status: RunStatus) -> Cell {
    match status {
        RunStatus::Success => Cell::new(status).fg(Color::Green),
        RunStatus::PartialSuccess => Cell::new(status).fg(Color::Yellow),
        RunStatus::Failed => Cell::new(status)
            .fg(Color::Red)
            .add_attribute(Attribute::Bold),
    }
}

fn reason_cell(reason: RejectReason) -> Cell {
    match reason {
        RejectReason::DuplicateKey => Cell::new(reason).fg(Color::DarkGrey),
        RejectReason::ReferentialIntegrityError => Cell::new(reason).fg(Color::Magenta),
        _ => Cell::new(reason).fg(Color::Yellow),
    }
}

fn count_cell(count: usize, color: Color) -> Cell {
    if count > 0 {
        Cell::new(count).fg(color).add_attribute(Attribute::Bold)
    } else {
        dim_cell(count)
    }
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
