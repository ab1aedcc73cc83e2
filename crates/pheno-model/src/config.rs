//! Configuration objects for the two pipelines.
//!
//! Both configurations are JSON objects whose key order is meaningful: the
//! calculation pipeline applies operations in configuration-declared order,
//! and BIDS entries are converted in the order they are listed. Parsing goes
//! through `serde_json`'s order-preserving map so that order survives.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

/// One configured calculation step: an operation name plus its raw arguments.
/// Resolution against the operation registry happens at execution time so an
/// unknown name can be skipped without failing the whole configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct CalcStep {
    pub name: String,
    pub args: Value,
}

/// Ordered calculation steps for one phenotype dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct DatasetCalcs {
    pub name: String,
    pub steps: Vec<CalcStep>,
}

/// Transformation configuration: dataset name -> ordered operations.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CalcConfig {
    pub datasets: Vec<DatasetCalcs>,
}

impl<'de> Deserialize<'de> for CalcConfig {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Map::<String, Value>::deserialize(deserializer)?;
        let mut datasets = Vec::with_capacity(raw.len());
        for (name, value) in raw {
            let Value::Object(steps) = value else {
                return Err(D::Error::custom(format!(
                    "dataset '{name}' must map operation names to arguments"
                )));
            };
            let steps = steps
                .into_iter()
                .map(|(name, args)| CalcStep { name, args })
                .collect();
            datasets.push(DatasetCalcs { name, steps });
        }
        Ok(CalcConfig { datasets })
    }
}

/// The form handle of a BIDS entry: a single form name, or several forms
/// amalgamated into one output entry.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum FormHandle {
    One(String),
    Many(Vec<String>),
}

impl FormHandle {
    pub fn forms(&self) -> &[String] {
        match self {
            Self::One(form) => std::slice::from_ref(form),
            Self::Many(forms) => forms,
        }
    }
}

/// One configured output entry.
#[derive(Debug, Clone, PartialEq)]
pub struct BidsEntry {
    pub name: String,
    pub handle: FormHandle,
    pub measurement_tool_metadata: Value,
}

/// BIDS entry configuration: entry name -> handle + tool metadata.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BidsConfig {
    pub entries: Vec<BidsEntry>,
}

#[derive(Deserialize)]
struct RawBidsEntry {
    #[serde(rename = "DataDictionary_B")]
    handle: FormHandle,
    #[serde(rename = "MeasurementToolMetadata", default)]
    measurement_tool_metadata: Value,
}

impl<'de> Deserialize<'de> for BidsConfig {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Map::<String, Value>::deserialize(deserializer)?;
        let mut entries = Vec::with_capacity(raw.len());
        for (name, value) in raw {
            let raw_entry: RawBidsEntry = serde_json::from_value(value)
                .map_err(|error| D::Error::custom(format!("entry '{name}': {error}")))?;
            entries.push(BidsEntry {
                name,
                handle: raw_entry.handle,
                measurement_tool_metadata: raw_entry.measurement_tool_metadata,
            });
        }
        Ok(BidsConfig { entries })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn calc_config_preserves_declaration_order() {
        let raw = r#"{
            "survey_b": {"RenameVariables": {"old": "new"}, "DerivativeDifferences": null},
            "survey_a": {"ReplaceLevels": {}}
        }"#;
        let config: CalcConfig = serde_json::from_str(raw).expect("parse");
        let names: Vec<&str> = config.datasets.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["survey_b", "survey_a"]);
        let steps: Vec<&str> = config.datasets[0]
            .steps
            .iter()
            .map(|s| s.name.as_str())
            .collect();
        assert_eq!(steps, vec!["RenameVariables", "DerivativeDifferences"]);
    }

    #[test]
    fn bids_handle_accepts_string_or_list() {
        let raw = json!({
            "demographics": {
                "DataDictionary_B": "demographics_form",
                "MeasurementToolMetadata": {"Description": "REDCap demographics"}
            },
            "mood": {
                "DataDictionary_B": ["phq9", "gad7"]
            }
        });
        let config: BidsConfig = serde_json::from_value(raw).expect("parse");
        assert_eq!(config.entries[0].handle.forms(), ["demographics_form"]);
        assert_eq!(config.entries[1].handle.forms(), ["phq9", "gad7"]);
        assert_eq!(config.entries[1].measurement_tool_metadata, Value::Null);
    }

    #[test]
    fn bids_rejects_malformed_handle() {
        let raw = json!({"bad": {"DataDictionary_B": 7}});
        let error = serde_json::from_value::<BidsConfig>(raw).unwrap_err();
        assert!(error.to_string().contains("bad"));
    }
}
