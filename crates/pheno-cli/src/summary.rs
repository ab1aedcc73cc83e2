use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use pheno_bids::{ConvertSummary, EntryStatus};
use pheno_transform::{CalcSummary, DatasetStatus};

pub fn print_convert_summary(summary: &ConvertSummary) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Entry"),
        header_cell("Status"),
        header_cell("Rows"),
        header_cell("Columns"),
        header_cell("Data"),
        header_cell("Sidecar"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 2, CellAlignment::Right);
    align_column(&mut table, 3, CellAlignment::Right);
    for entry in &summary.entries {
        table.add_row(vec![
            Cell::new(&entry.name),
            entry_status_cell(&entry.status),
            Cell::new(entry.row_count),
            Cell::new(entry.column_count),
            path_cell(entry.data_path.as_deref()),
            path_cell(entry.sidecar_path.as_deref()),
        ]);
    }
    println!("{table}");
}

pub fn print_calc_summary(summary: &CalcSummary) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Dataset"),
        header_cell("Status"),
        header_cell("Applied"),
        header_cell("Skipped"),
        header_cell("Data"),
        header_cell("Sidecar"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 2, CellAlignment::Right);
    align_column(&mut table, 3, CellAlignment::Right);
    for dataset in &summary.datasets {
        table.add_row(vec![
            Cell::new(&dataset.name),
            dataset_status_cell(&dataset.status),
            Cell::new(dataset.steps_applied),
            Cell::new(dataset.steps_skipped),
            path_cell(dataset.data_path.as_deref()),
            path_cell(dataset.sidecar_path.as_deref()),
        ]);
    }
    println!("{table}");
}

fn entry_status_cell(status: &EntryStatus) -> Cell {
    match status {
        EntryStatus::Completed => Cell::new("ok").fg(Color::Green),
        EntryStatus::Skipped(reason) => Cell::new(format!("skipped: {reason}")).fg(Color::Yellow),
        EntryStatus::Failed(reason) => Cell::new(format!("failed: {reason}")).fg(Color::Red),
    }
}

fn dataset_status_cell(status: &DatasetStatus) -> Cell {
    match status {
        DatasetStatus::Completed => Cell::new("ok").fg(Color::Green),
        DatasetStatus::SkippedMissingInput => Cell::new("skipped: missing input").fg(Color::Yellow),
        DatasetStatus::Failed(reason) => Cell::new(format!("failed: {reason}")).fg(Color::Red),
    }
}

fn path_cell(path: Option<&std::path::Path>) -> Cell {
    match path {
        Some(path) => Cell::new(path.display()),
        None => Cell::new("-").add_attribute(Attribute::Dim),
    }
}

fn header_cell(text: &str) -> Cell {
    Cell::new(text).add_attribute(Attribute::Bold)
}

fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}
