use tracing::warn;

use pheno_model::{BidsEntry, DataDictionary, SUBJECT_ID_COLUMN, Sidecar};

use crate::describe::build_descriptor;

/// Synthesize the metadata sidecar for one output entry.
///
/// Starts from the entry's configured `MeasurementToolMetadata` block and
/// attaches a normalized descriptor for every selected column except the
/// subject identifier. A column without a dictionary record is warned about
/// and left undescribed (best-effort completeness, per the conversion
/// contract).
pub fn build_entry_sidecar(
    entry: &BidsEntry,
    columns: &[String],
    dictionary: &DataDictionary,
) -> Sidecar {
    let mut sidecar = Sidecar::with_tool_metadata(entry.measurement_tool_metadata.clone());
    for column in columns {
        if column == SUBJECT_ID_COLUMN {
            continue;
        }
        match dictionary.get(column) {
            Some(field) => sidecar.insert(column.clone(), build_descriptor(field)),
            None => {
                warn!(entry = %entry.name, variable = %column, "variable not found in data dictionary");
            }
        }
    }
    sidecar
}

#[cfg(test)]
mod tests {
    use super::*;
    use pheno_model::{FieldDef, FormHandle};
    use serde_json::json;

    #[test]
    fn sidecar_skips_identifier_and_keeps_column_order() {
        let entry = BidsEntry {
            name: "demographics".into(),
            handle: FormHandle::One("demographics".into()),
            measurement_tool_metadata: json!({"Description": "REDCap demographics"}),
        };
        let dictionary = DataDictionary::new(vec![
            FieldDef {
                form_name: "demographics".into(),
                variable_name: "age".into(),
                field_label: Some("Age".into()),
                ..FieldDef::default()
            },
            FieldDef {
                form_name: "demographics".into(),
                variable_name: "sex".into(),
                field_label: Some("Sex".into()),
                choices: Some("1, Male | 2, Female".into()),
                ..FieldDef::default()
            },
        ]);
        let columns = vec![
            SUBJECT_ID_COLUMN.to_string(),
            "sex".to_string(),
            "age".to_string(),
        ];

        let sidecar = build_entry_sidecar(&entry, &columns, &dictionary);
        let keys: Vec<&str> = sidecar.keys().collect();
        assert_eq!(keys, vec!["sex", "age"]);
        assert!(sidecar.get("sex").unwrap().levels.is_some());
        assert_eq!(
            sidecar.measurement_tool_metadata,
            Some(json!({"Description": "REDCap demographics"}))
        );
    }

    #[test]
    fn undescribed_column_is_skipped() {
        let entry = BidsEntry {
            name: "demographics".into(),
            handle: FormHandle::One("demographics".into()),
            measurement_tool_metadata: serde_json::Value::Null,
        };
        let dictionary = DataDictionary::new(vec![]);
        let sidecar = build_entry_sidecar(&entry, &["mystery".to_string()], &dictionary);
        assert!(sidecar.is_empty());
    }
}
