//! Per-entry BIDS conversion driver.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::{info, info_span, warn};

use pheno_model::{BidsConfig, BidsEntry, DataDictionary, SUBJECT_ID_COLUMN, Table};
use pheno_output::{write_sidecar, write_tsv_table};

use crate::extract::build_entry_table;
use crate::metadata::build_entry_sidecar;
use crate::select::select_form_columns;

/// Subdirectory of the BIDS root holding phenotype files.
pub const PHENOTYPE_DIR: &str = "phenotype";

#[derive(Debug, Clone)]
pub struct ConvertOptions {
    /// Study BIDS directory; outputs land in its `phenotype/` subdirectory.
    pub out_dir: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryStatus {
    Completed,
    Skipped(String),
    Failed(String),
}

#[derive(Debug, Clone)]
pub struct EntryOutcome {
    pub name: String,
    pub status: EntryStatus,
    pub column_count: usize,
    pub row_count: usize,
    pub data_path: Option<PathBuf>,
    pub sidecar_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Default)]
pub struct ConvertSummary {
    pub entries: Vec<EntryOutcome>,
}

impl ConvertSummary {
    pub fn completed_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|entry| entry.status == EntryStatus::Completed)
            .count()
    }
}

/// Convert the raw survey table into one BIDS phenotype file pair per
/// configured entry. Entries are processed in configuration order; a failing
/// entry is reported and skipped, its siblings still run.
pub fn convert_to_bids(
    config: &BidsConfig,
    data: &Table,
    dictionary: &DataDictionary,
    options: &ConvertOptions,
) -> Result<ConvertSummary> {
    let phenotype_dir = options.out_dir.join(PHENOTYPE_DIR);
    fs::create_dir_all(&phenotype_dir)
        .with_context(|| format!("create output directory: {}", phenotype_dir.display()))?;

    info!(out_dir = %options.out_dir.display(), entries = config.entries.len(), "beginning conversion to BIDS");

    let mut summary = ConvertSummary::default();
    for entry in &config.entries {
        let span = info_span!("entry", name = %entry.name);
        let _guard = span.enter();
        summary
            .entries
            .push(process_entry(entry, data, dictionary, &phenotype_dir));
    }

    info!(
        out_dir = %options.out_dir.display(),
        completed = summary.completed_count(),
        "wrote all data"
    );
    Ok(summary)
}

fn process_entry(
    entry: &BidsEntry,
    data: &Table,
    dictionary: &DataDictionary,
    phenotype_dir: &std::path::Path,
) -> EntryOutcome {
    let mut outcome = EntryOutcome {
        name: entry.name.clone(),
        status: EntryStatus::Completed,
        column_count: 0,
        row_count: 0,
        data_path: None,
        sidecar_path: None,
    };

    if !data.has_column(SUBJECT_ID_COLUMN) {
        warn!(column = SUBJECT_ID_COLUMN, "survey data has no subject identifier column, skipping entry");
        outcome.status = EntryStatus::Skipped(format!("no {SUBJECT_ID_COLUMN} column"));
        return outcome;
    }

    let mut columns = select_form_columns(entry.handle.forms(), data, dictionary);
    if columns.is_empty() {
        // Still writes the identifier-only pair; an unmatched form name is
        // worth a warning but not a hard failure.
        warn!(forms = ?entry.handle.forms(), "no matching columns for entry");
    }
    columns.insert(0, SUBJECT_ID_COLUMN.to_string());

    let entry_table = match build_entry_table(data, &columns) {
        Ok(table) => table,
        Err(error) => {
            warn!(%error, "failed to build entry table");
            outcome.status = EntryStatus::Failed(error.to_string());
            return outcome;
        }
    };
    outcome.column_count = entry_table.width();
    outcome.row_count = entry_table.height();

    let data_path = phenotype_dir.join(format!("{}.tsv", entry.name));
    if let Err(error) = write_tsv_table(&entry_table, &data_path) {
        warn!(path = %data_path.display(), %error, "failed to write entry data");
        outcome.status = EntryStatus::Failed(error.to_string());
        return outcome;
    }

    let sidecar = build_entry_sidecar(entry, &columns, dictionary);
    let sidecar_path = phenotype_dir.join(format!("{}.json", entry.name));
    if let Err(error) = write_sidecar(&sidecar, &sidecar_path) {
        warn!(path = %sidecar_path.display(), %error, "failed to write entry metadata");
        outcome.status = EntryStatus::Failed(error.to_string());
        return outcome;
    }

    info!(
        data = %data_path.display(),
        rows = outcome.row_count,
        columns = outcome.column_count,
        "entry complete"
    );
    outcome.data_path = Some(data_path);
    outcome.sidecar_path = Some(sidecar_path);
    outcome
}
