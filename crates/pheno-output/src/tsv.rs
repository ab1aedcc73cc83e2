use std::path::Path;

use anyhow::{Context, Result};
use csv::WriterBuilder;

use pheno_model::{CellValue, Table};

/// Literal written for missing cells in output tabular files.
pub const MISSING_SENTINEL: &str = "n/a";

/// Write a table as a tab-separated file with a header row.
pub fn write_tsv_table(table: &Table, path: &Path) -> Result<()> {
    let mut writer = WriterBuilder::new()
        .delimiter(b'\t')
        .from_path(path)
        .with_context(|| format!("create table file: {}", path.display()))?;
    writer
        .write_record(&table.columns)
        .with_context(|| format!("write header: {}", path.display()))?;
    for row in &table.rows {
        let record = row.iter().map(|cell| match cell {
            CellValue::Text(value) => value.as_str(),
            CellValue::Missing => MISSING_SENTINEL,
        });
        writer
            .write_record(record)
            .with_context(|| format!("write row: {}", path.display()))?;
    }
    writer
        .flush()
        .with_context(|| format!("flush table file: {}", path.display()))?;
    Ok(())
}
