use anyhow::{Context, Result};
use tracing::warn;

use pheno_bids::{ConvertOptions, ConvertSummary, convert_to_bids};
use pheno_ingest::{load_bids_config, load_calc_config, read_csv_table, read_data_dictionary};
use pheno_transform::{CalcOptions, CalcSummary, run_calculations};

use crate::cli::{CalcArgs, ConvertArgs};

/// Run the BIDS conversion. A missing input file is a warning and an empty
/// run, not a process failure; downstream units report their own outcomes.
pub fn run_convert(args: &ConvertArgs) -> Result<Option<ConvertSummary>> {
    let config = match load_bids_config(&args.bids_config) {
        Ok(config) => config,
        Err(error) => {
            warn!(path = %args.bids_config.display(), %error, "BIDS configuration not loaded");
            return Ok(None);
        }
    };
    let data = match read_csv_table(&args.data_csv) {
        Ok(data) => data,
        Err(error) => {
            warn!(path = %args.data_csv.display(), %error, "survey data not loaded");
            return Ok(None);
        }
    };
    let dictionary = match read_data_dictionary(&args.dict_csv) {
        Ok(dictionary) => dictionary,
        Err(error) => {
            warn!(path = %args.dict_csv.display(), %error, "data dictionary not loaded");
            return Ok(None);
        }
    };

    let options = ConvertOptions {
        out_dir: args.out_dir.clone(),
    };
    let summary = convert_to_bids(&config, &data, &dictionary, &options)
        .context("convert survey data to BIDS")?;
    Ok(Some(summary))
}

/// Run the configured calculations over the phenotype directory.
pub fn run_calc(args: &CalcArgs) -> Result<Option<CalcSummary>> {
    let config = match load_calc_config(&args.calc_config) {
        Ok(config) => config,
        Err(error) => {
            warn!(path = %args.calc_config.display(), %error, "calculation configuration not loaded");
            return Ok(None);
        }
    };

    let options = CalcOptions {
        data_root: args.data_root.clone(),
        overwrite: args.overwrite,
    };
    Ok(Some(run_calculations(&config, &options)))
}
