use std::fs;

use tempfile::TempDir;

use pheno_model::{CellValue, Descriptor, Sidecar, Table};
use pheno_output::{write_sidecar, write_tsv_table};

#[test]
fn missing_cells_write_as_sentinel() {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("demographics.tsv");

    let mut table = Table::new(vec!["participant_id".into(), "age".into()]);
    table.push_row(vec![CellValue::text("sub-01"), CellValue::Missing]);
    table.push_row(vec![CellValue::text("sub-02"), CellValue::text("28")]);
    write_tsv_table(&table, &path).expect("write tsv");

    let contents = fs::read_to_string(&path).expect("read back");
    assert_eq!(contents, "participant_id\tage\nsub-01\tn/a\nsub-02\t28\n");
}

#[test]
fn sidecar_writes_pretty_json_with_trailing_newline() {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("demographics.json");

    let mut sidecar = Sidecar::with_tool_metadata(serde_json::json!({"Description": "REDCap"}));
    sidecar.insert("age", Descriptor::new("Age in years"));
    write_sidecar(&sidecar, &path).expect("write sidecar");

    let contents = fs::read_to_string(&path).expect("read back");
    assert!(contents.starts_with("{\n"));
    assert!(contents.ends_with("}\n"));
    let round: Sidecar = serde_json::from_str(&contents).expect("parse back");
    assert_eq!(round, sidecar);
}
