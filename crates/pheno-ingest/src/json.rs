use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use anyhow::{Context, Result};
use serde_json::from_reader;

use pheno_model::{BidsConfig, CalcConfig, Sidecar};

/// Load the transformation configuration.
pub fn load_calc_config(path: &Path) -> Result<CalcConfig> {
    let file =
        File::open(path).with_context(|| format!("open calc config: {}", path.display()))?;
    from_reader(BufReader::new(file))
        .with_context(|| format!("parse calc config: {}", path.display()))
}

/// Load the BIDS entry configuration.
pub fn load_bids_config(path: &Path) -> Result<BidsConfig> {
    let file =
        File::open(path).with_context(|| format!("open BIDS config: {}", path.display()))?;
    from_reader(BufReader::new(file))
        .with_context(|| format!("parse BIDS config: {}", path.display()))
}

/// Load a phenotype metadata sidecar.
pub fn load_sidecar(path: &Path) -> Result<Sidecar> {
    let file = File::open(path).with_context(|| format!("open sidecar: {}", path.display()))?;
    from_reader(BufReader::new(file)).with_context(|| format!("parse sidecar: {}", path.display()))
}
