//! Per-dataset calculation pipeline.
//!
//! Each dataset named in the configuration is one unit of work: load its
//! table and sidecar, apply the configured operations in declared order,
//! persist the resulting pair. Failures are confined to their unit; sibling
//! datasets still run and the run as a whole reports outcomes instead of
//! aborting.

use std::path::PathBuf;

use tracing::{info, info_span, warn};

use pheno_ingest::{load_sidecar, read_tsv_table};
use pheno_model::{CalcConfig, DatasetCalcs, PhenoError};
use pheno_output::{write_sidecar, write_tsv_table};

use crate::ops::CalcOp;

/// Suffix appended to output names when not overwriting the originals.
/// No uniqueness check across repeated runs; a second non-overwrite run
/// clobbers the previous `_calc` outputs.
pub const CALC_SUFFIX: &str = "_calc";

#[derive(Debug, Clone)]
pub struct CalcOptions {
    /// Directory holding `<dataset>.tsv` / `<dataset>.json` pairs.
    pub data_root: PathBuf,
    /// Overwrite the original pair instead of writing `_calc` outputs.
    pub overwrite: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatasetStatus {
    Completed,
    SkippedMissingInput,
    Failed(String),
}

#[derive(Debug, Clone)]
pub struct DatasetOutcome {
    pub name: String,
    pub status: DatasetStatus,
    pub steps_applied: usize,
    pub steps_skipped: usize,
    pub data_path: Option<PathBuf>,
    pub sidecar_path: Option<PathBuf>,
}

impl DatasetOutcome {
    fn pending(name: &str) -> Self {
        Self {
            name: name.to_string(),
            status: DatasetStatus::Completed,
            steps_applied: 0,
            steps_skipped: 0,
            data_path: None,
            sidecar_path: None,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct CalcSummary {
    pub datasets: Vec<DatasetOutcome>,
}

impl CalcSummary {
    pub fn completed_count(&self) -> usize {
        self.count(|status| matches!(status, DatasetStatus::Completed))
    }

    pub fn skipped_count(&self) -> usize {
        self.count(|status| matches!(status, DatasetStatus::SkippedMissingInput))
    }

    pub fn failed_count(&self) -> usize {
        self.count(|status| matches!(status, DatasetStatus::Failed(_)))
    }

    fn count(&self, matches: impl Fn(&DatasetStatus) -> bool) -> usize {
        self.datasets
            .iter()
            .filter(|outcome| matches(&outcome.status))
            .count()
    }
}

/// Run the configured calculations over every dataset, sequentially.
pub fn run_calculations(config: &CalcConfig, options: &CalcOptions) -> CalcSummary {
    let mut summary = CalcSummary::default();
    for dataset in &config.datasets {
        let span = info_span!("dataset", name = %dataset.name);
        let _guard = span.enter();
        summary.datasets.push(process_dataset(dataset, options));
    }
    summary
}

fn process_dataset(dataset: &DatasetCalcs, options: &CalcOptions) -> DatasetOutcome {
    let mut outcome = DatasetOutcome::pending(&dataset.name);
    let data_path = options.data_root.join(format!("{}.tsv", dataset.name));
    let sidecar_path = options.data_root.join(format!("{}.json", dataset.name));

    // A unit with a missing input file is skipped entirely, never attempted
    // with partial data.
    if !data_path.is_file() {
        warn!(path = %data_path.display(), "phenotype data not found, skipping dataset");
        outcome.status = DatasetStatus::SkippedMissingInput;
        return outcome;
    }
    if !sidecar_path.is_file() {
        warn!(path = %sidecar_path.display(), "phenotype metadata not found, skipping dataset");
        outcome.status = DatasetStatus::SkippedMissingInput;
        return outcome;
    }

    let mut table = match read_tsv_table(&data_path) {
        Ok(table) => table,
        Err(error) => {
            warn!(path = %data_path.display(), %error, "failed to read phenotype data");
            outcome.status = DatasetStatus::Failed(error.to_string());
            return outcome;
        }
    };
    let mut sidecar = match load_sidecar(&sidecar_path) {
        Ok(sidecar) => sidecar,
        Err(error) => {
            warn!(path = %sidecar_path.display(), %error, "failed to read phenotype metadata");
            outcome.status = DatasetStatus::Failed(error.to_string());
            return outcome;
        }
    };

    info!(path = %data_path.display(), steps = dataset.steps.len(), "beginning calculations");

    for step in &dataset.steps {
        let op = match CalcOp::resolve(&step.name, &step.args) {
            Ok(op) => op,
            Err(PhenoError::UnknownOperation(name)) => {
                warn!(operation = %name, "unknown calculation, skipping step");
                outcome.steps_skipped += 1;
                continue;
            }
            Err(error) => {
                warn!(step = %step.name, %error, "invalid calculation arguments");
                outcome.status = DatasetStatus::Failed(error.to_string());
                return outcome;
            }
        };
        match op.apply(table, sidecar) {
            Ok((next_table, next_sidecar)) => {
                table = next_table;
                sidecar = next_sidecar;
                outcome.steps_applied += 1;
            }
            Err(error) => {
                warn!(step = %step.name, %error, "calculation failed, abandoning dataset");
                outcome.status = DatasetStatus::Failed(error.to_string());
                return outcome;
            }
        }
    }

    let (out_data, out_sidecar) = if options.overwrite {
        (data_path, sidecar_path)
    } else {
        (
            options
                .data_root
                .join(format!("{}{CALC_SUFFIX}.tsv", dataset.name)),
            options
                .data_root
                .join(format!("{}{CALC_SUFFIX}.json", dataset.name)),
        )
    };
    if let Err(error) = write_tsv_table(&table, &out_data) {
        warn!(path = %out_data.display(), %error, "failed to write phenotype data");
        outcome.status = DatasetStatus::Failed(error.to_string());
        return outcome;
    }
    if let Err(error) = write_sidecar(&sidecar, &out_sidecar) {
        warn!(path = %out_sidecar.display(), %error, "failed to write phenotype metadata");
        outcome.status = DatasetStatus::Failed(error.to_string());
        return outcome;
    }

    info!(
        data = %out_data.display(),
        sidecar = %out_sidecar.display(),
        steps_applied = outcome.steps_applied,
        steps_skipped = outcome.steps_skipped,
        "dataset complete"
    );
    outcome.data_path = Some(out_data);
    outcome.sidecar_path = Some(out_sidecar);
    outcome
}
