use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use foodq_model::{Severity, format_number};
use foodq_report::DatasetReport;
use foodq_standards::SchemaRegistry;

use crate::pipeline::CheckRun;

/// Duplicate groups listed before the table is cut short.
const MAX_DUPLICATE_ROWS: usize = 20;

pub fn print_summary(run: &CheckRun) {
    let report = &run.report;
    println!("Input: {}", run.input.display());
    if let Some(file) = &run.normalized {
        println!("Normalized: {} ({} rows)", file.path.display(), file.rows);
    }
    if let Some(file) = &run.violations {
        println!("Violations: {} ({} lines)", file.path.display(), file.rows);
    }
    println!("Schema: {}", report.fingerprint);
    println!("{}", totals_table(report));
    if !report.histogram.is_empty() || !report.failures.is_empty() {
        println!();
        println!("Violations:");
        println!("{}", histogram_table(report));
    }
    if !report.duplicate_groups.is_empty() {
        println!();
        println!("Duplicate product ids:");
        println!("{}", duplicates_table(report));
    }
    if !report.profile.is_empty() {
        println!();
        println!("Numeric profile:");
        println!("{}", profile_table(report));
    }
    println!();
    println!("Verdict: {}", if report.passed() { "PASS" } else { "FAIL" });
}

pub fn totals_table(report: &DatasetReport) -> Table {
    let totals = &report.totals;
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Records"),
        header_cell("Accepted"),
        header_cell("Rejected"),
        header_cell("Failed"),
        header_cell("Unique IDs"),
        header_cell("Missing IDs"),
        header_cell("Errors"),
        header_cell("Advisories"),
    ]);
    apply_summary_table_style(&mut table);
    table.add_row(vec![
        Cell::new(totals.records).add_attribute(Attribute::Bold),
        count_cell(totals.accepted, Color::Green),
        count_cell(totals.rejected, Color::Red),
        count_cell(totals.failed, Color::Red),
        Cell::new(totals.unique_product_ids),
        count_cell(totals.missing_product_ids, Color::Yellow),
        count_cell(totals.errors, Color::Red),
        count_cell(totals.advisories, Color::Yellow),
    ]);
    for index in 0..8 {
        align_column(&mut table, index, CellAlignment::Right);
    }
    table
}

pub fn histogram_table(report: &DatasetReport) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Code"),
        header_cell("Severity"),
        header_cell("Count"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Center);
    align_column(&mut table, 2, CellAlignment::Right);
    for entry in &report.histogram {
        let severity = entry.code.default_severity();
        table.add_row(vec![
            Cell::new(entry.code.as_str()),
            severity_cell(severity),
            Cell::new(entry.count).fg(severity_color(severity)),
        ]);
    }
    for failure in &report.failures {
        table.add_row(vec![
            Cell::new(failure.kind.code()),
            Cell::new("FATAL")
                .fg(Color::Red)
                .add_attribute(Attribute::Bold),
            Cell::new(failure.count).fg(Color::Red),
        ]);
    }
    table
}

pub fn duplicates_table(report: &DatasetReport) -> Table {
    let mut table = Table::new();
    table.set_header(vec![header_cell("Product ID"), header_cell("Rows")]);
    apply_table_style(&mut table);
    for group in report.duplicate_groups.iter().take(MAX_DUPLICATE_ROWS) {
        let rows: Vec<String> = group.rows.iter().map(ToString::to_string).collect();
        table.add_row(vec![Cell::new(&group.product_id), Cell::new(rows.join(", "))]);
    }
    let hidden = report.duplicate_groups.len().saturating_sub(MAX_DUPLICATE_ROWS);
    if hidden > 0 {
        table.add_row(vec![dim_cell(format!("... {hidden} more")), dim_cell("")]);
    }
    table
}

pub fn profile_table(report: &DatasetReport) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Field"),
        header_cell("Values"),
        header_cell("Missing"),
        header_cell("Min"),
        header_cell("Max"),
        header_cell("Mean"),
    ]);
    apply_table_style(&mut table);
    for index in 1..6 {
        align_column(&mut table, index, CellAlignment::Right);
    }
    for profile in report.profile.iter().filter(|profile| profile.count > 0) {
        table.add_row(vec![
            Cell::new(&profile.field),
            Cell::new(profile.count),
            Cell::new(profile.missing),
            number_cell(profile.min),
            number_cell(profile.max),
            number_cell(profile.mean.map(|mean| (mean * 1000.0).round() / 1000.0)),
        ]);
    }
    table
}

/// Table of every declared field, in schema order.
pub fn fields_table(schema: &SchemaRegistry) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Field"),
        header_cell("Group"),
        header_cell("Kind"),
        header_cell("Domain"),
        header_cell("Required"),
        header_cell("Description"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 4, CellAlignment::Center);
    for field in schema.fields() {
        let domain = if let Some(vocabulary) = &field.vocabulary {
            format!("vocabulary: {vocabulary}")
        } else if !field.allowed.is_empty() {
            field.allowed.join(", ")
        } else if !field.range.is_unbounded() {
            field.range.describe()
        } else if let Some(source) = &field.source {
            format!("log of {source}")
        } else {
            "-".to_string()
        };
        let required = if field.is_required() {
            Cell::new("yes").fg(Color::Yellow)
        } else {
            dim_cell("no")
        };
        table.add_row(vec![
            Cell::new(&field.name).fg(Color::Blue),
            Cell::new(&field.group),
            Cell::new(field.kind.as_str()),
            Cell::new(domain),
            required,
            Cell::new(&field.description),
        ]);
    }
    table
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(140);
}

fn apply_summary_table_style(table: &mut Table) {
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

fn severity_cell(severity: Severity) -> Cell {
    match severity {
        Severity::Error => Cell::new("ERROR").fg(Color::Red),
        Severity::Advisory => Cell::new("ADVISORY").fg(Color::Yellow),
    }
}

fn severity_color(severity: Severity) -> Color {
    match severity {
        Severity::Error => Color::Red,
        Severity::Advisory => Color::Yellow,
    }
}

fn count_cell(count: usize, color: Color) -> Cell {
    if count > 0 {
        Cell::new(count).fg(color).add_attribute(Attribute::Bold)
    } else {
        dim_cell(count)
    }
}

fn number_cell(value: Option<f64>) -> Cell {
    match value {
        Some(value) => Cell::new(format_number(value)),
        None => dim_cell("-"),
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
