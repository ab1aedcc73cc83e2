use std::fs;
use std::path::Path;

use tempfile::TempDir;

use pheno_transform::{CalcOptions, DatasetStatus, run_calculations};

fn write_dataset(root: &Path, name: &str) {
    fs::write(
        root.join(format!("{name}.tsv")),
        "participant_id\tsleep_precovid\tsleep_current\nsub-01\t2\t4\nsub-02\t5\t3\n",
    )
    .unwrap();
    fs::write(
        root.join(format!("{name}.json")),
        r#"{
  "MeasurementToolMetadata": {"Description": "Sleep survey"},
  "sleep_precovid": {"Description": "Hours of sleep before"},
  "sleep_current": {"Description": "Hours of sleep now"}
}"#,
    )
    .unwrap();
}

fn parse_config(raw: &str) -> pheno_model::CalcConfig {
    serde_json::from_str(raw).expect("parse config")
}

#[test]
fn non_overwrite_run_writes_suffixed_pair() {
    let dir = TempDir::new().expect("temp dir");
    write_dataset(dir.path(), "sleep");

    let config = parse_config(r#"{"sleep": {"DerivativeDifferences": null}}"#);
    let options = CalcOptions {
        data_root: dir.path().to_path_buf(),
        overwrite: false,
    };
    let summary = run_calculations(&config, &options);
    assert_eq!(summary.completed_count(), 1);
    assert_eq!(summary.datasets[0].steps_applied, 1);

    let data = fs::read_to_string(dir.path().join("sleep_calc.tsv")).expect("calc tsv");
    assert!(data.starts_with("participant_id\tsleep_precovid\tsleep_current\tsleep_diff\n"));
    assert!(data.contains("sub-01\t2\t4\t2\n"));
    assert!(data.contains("sub-02\t5\t3\t-2\n"));

    let sidecar = fs::read_to_string(dir.path().join("sleep_calc.json")).expect("calc json");
    assert!(sidecar.contains("sleep_diff"));
    assert!(sidecar.contains("\"Derivative\": true"));

    // Originals are untouched.
    let original = fs::read_to_string(dir.path().join("sleep.tsv")).unwrap();
    assert!(!original.contains("sleep_diff"));
}

#[test]
fn overwrite_run_replaces_the_originals() {
    let dir = TempDir::new().expect("temp dir");
    write_dataset(dir.path(), "sleep");

    let config = parse_config(
        r#"{"sleep": {"RenameVariables": {"sleep_current": "sleep_now"}}}"#,
    );
    let options = CalcOptions {
        data_root: dir.path().to_path_buf(),
        overwrite: true,
    };
    let summary = run_calculations(&config, &options);
    assert_eq!(summary.completed_count(), 1);

    let data = fs::read_to_string(dir.path().join("sleep.tsv")).unwrap();
    assert!(data.starts_with("participant_id\tsleep_precovid\tsleep_now\n"));
    assert!(!dir.path().join("sleep_calc.tsv").exists());
}

#[test]
fn missing_dataset_is_skipped_and_siblings_still_run() {
    let dir = TempDir::new().expect("temp dir");
    write_dataset(dir.path(), "present");

    let config = parse_config(
        r#"{
            "absent": {"DerivativeDifferences": null},
            "present": {"DerivativeDifferences": null}
        }"#,
    );
    let options = CalcOptions {
        data_root: dir.path().to_path_buf(),
        overwrite: false,
    };
    let summary = run_calculations(&config, &options);
    assert_eq!(summary.datasets.len(), 2);
    assert_eq!(summary.datasets[0].status, DatasetStatus::SkippedMissingInput);
    assert_eq!(summary.datasets[1].status, DatasetStatus::Completed);
    assert!(dir.path().join("present_calc.tsv").exists());
}

#[test]
fn unknown_operation_is_skipped_and_later_steps_still_apply() {
    let dir = TempDir::new().expect("temp dir");
    write_dataset(dir.path(), "sleep");

    let config = parse_config(
        r#"{"sleep": {"NormalizeScores": {"x": 1}, "DerivativeDifferences": null}}"#,
    );
    let options = CalcOptions {
        data_root: dir.path().to_path_buf(),
        overwrite: false,
    };
    let summary = run_calculations(&config, &options);
    let outcome = &summary.datasets[0];
    assert_eq!(outcome.status, DatasetStatus::Completed);
    assert_eq!(outcome.steps_skipped, 1);
    assert_eq!(outcome.steps_applied, 1);

    let data = fs::read_to_string(dir.path().join("sleep_calc.tsv")).unwrap();
    assert!(data.contains("sleep_diff"));
}

#[test]
fn ordered_steps_observe_earlier_renames() {
    let dir = TempDir::new().expect("temp dir");
    fs::write(
        dir.path().join("mood.tsv"),
        "participant_id\tmood_before\tmood_current\nsub-01\t1\t4\n",
    )
    .unwrap();
    fs::write(
        dir.path().join("mood.json"),
        r#"{
  "mood_before": {"Description": "Mood before"},
  "mood_current": {"Description": "Mood now"}
}"#,
    )
    .unwrap();

    // The rename must land before discovery can pair the variables.
    let config = parse_config(
        r#"{"mood": {
            "RenameVariables": {"mood_before": "mood_precovid"},
            "DerivativeDifferences": null
        }}"#,
    );
    let options = CalcOptions {
        data_root: dir.path().to_path_buf(),
        overwrite: false,
    };
    let summary = run_calculations(&config, &options);
    assert_eq!(summary.datasets[0].status, DatasetStatus::Completed);

    let data = fs::read_to_string(dir.path().join("mood_calc.tsv")).unwrap();
    assert!(data.contains("mood_diff"));
    assert!(data.contains("sub-01\t1\t4\t3\n"));
}

#[test]
fn failed_operation_abandons_dataset_but_not_the_run() {
    let dir = TempDir::new().expect("temp dir");
    write_dataset(dir.path(), "bad");
    write_dataset(dir.path(), "good");

    let config = parse_config(
        r#"{
            "bad": {"ReplaceLevels": {"1": {"ReplaceWith": "0", "ReplaceInVariables": ["nope"]}}},
            "good": {"DerivativeDifferences": null}
        }"#,
    );
    let options = CalcOptions {
        data_root: dir.path().to_path_buf(),
        overwrite: false,
    };
    let summary = run_calculations(&config, &options);
    assert!(matches!(summary.datasets[0].status, DatasetStatus::Failed(_)));
    assert_eq!(summary.datasets[1].status, DatasetStatus::Completed);
    assert!(!dir.path().join("bad_calc.tsv").exists());
    assert!(dir.path().join("good_calc.tsv").exists());
}
