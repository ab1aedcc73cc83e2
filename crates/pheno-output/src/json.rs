use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};

use pheno_model::Sidecar;

/// Write a metadata sidecar as pretty-printed JSON.
pub fn write_sidecar(sidecar: &Sidecar, path: &Path) -> Result<()> {
    let file = File::create(path).with_context(|| format!("create sidecar: {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, sidecar)
        .with_context(|| format!("serialize sidecar: {}", path.display()))?;
    writer
        .write_all(b"\n")
        .and_then(|()| writer.flush())
        .with_context(|| format!("flush sidecar: {}", path.display()))?;
    Ok(())
}
