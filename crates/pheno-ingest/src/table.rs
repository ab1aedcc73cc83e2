use std::path::Path;

use anyhow::{Context, Result};
use csv::ReaderBuilder;

use pheno_model::{CellValue, Table};

/// Read a comma-delimited survey export.
pub fn read_csv_table(path: &Path) -> Result<Table> {
    read_delimited_table(path, b',')
}

/// Read a tab-delimited phenotype file.
pub fn read_tsv_table(path: &Path) -> Result<Table> {
    read_delimited_table(path, b'\t')
}

fn read_delimited_table(path: &Path, delimiter: u8) -> Result<Table> {
    let mut reader = ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("read table: {}", path.display()))?;
    let headers: Vec<String> = reader
        .headers()
        .with_context(|| format!("read headers: {}", path.display()))?
        .iter()
        .map(normalize_header)
        .collect();
    let mut table = Table::new(headers);
    for record in reader.records() {
        let record = record.with_context(|| format!("read record: {}", path.display()))?;
        let mut row = Vec::with_capacity(table.width());
        for index in 0..table.width() {
            let raw = record.get(index).unwrap_or("");
            row.push(parse_cell(raw));
        }
        table.push_row(row);
    }
    Ok(table)
}

fn normalize_header(raw: &str) -> String {
    raw.trim().trim_matches('\u{feff}').to_string()
}

/// Empty cells and the `"n/a"` output sentinel both read back as missing, so
/// previously extracted phenotype files round-trip through the calculation
/// pipeline.
fn parse_cell(raw: &str) -> CellValue {
    if raw.is_empty() || raw == "n/a" {
        CellValue::Missing
    } else {
        CellValue::Text(raw.to_string())
    }
}
