//! JSON metadata sidecar co-evolving with a phenotype table.
//!
//! Key order is significant: BIDS sidecars list `MeasurementToolMetadata`
//! first and variables in the order they were attached, and calculations
//! observe and extend that order. The structure therefore keeps variables as
//! an ordered sequence rather than a sorted map.

use serde::de::Error as _;
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

/// Fixed sidecar key carrying tool-level metadata rather than a variable.
pub const MEASUREMENT_TOOL_METADATA: &str = "MeasurementToolMetadata";

/// Per-variable metadata record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Descriptor {
    #[serde(default)]
    pub description: String,
    /// Categorical encoding of the variable: code -> label, insertion-ordered.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub levels: Option<Map<String, Value>>,
    /// Set on variables derived by a calculation. Legacy sidecars carry the
    /// string "true" here; this normalizes to a JSON bool on write.
    #[serde(
        default,
        deserialize_with = "derivative_flag",
        skip_serializing_if = "Option::is_none"
    )]
    pub derivative: Option<bool>,
    /// Keys this tool does not interpret (`Units`, `TermURL`, ...) pass
    /// through unchanged, after the interpreted ones.
    #[serde(flatten, skip_serializing_if = "Map::is_empty")]
    pub extras: Map<String, Value>,
}

impl Descriptor {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            levels: None,
            derivative: None,
            extras: Map::new(),
        }
    }

    pub fn with_levels(mut self, levels: Map<String, Value>) -> Self {
        self.levels = Some(levels);
        self
    }

    /// Descriptor for a variable produced by a calculation.
    pub fn derived(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            levels: None,
            derivative: Some(true),
            extras: Map::new(),
        }
    }
}

fn derivative_flag<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Flag(bool),
        Text(String),
    }

    match Option::<Raw>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Raw::Flag(flag)) => Ok(Some(flag)),
        Some(Raw::Text(text)) => Ok(Some(text.eq_ignore_ascii_case("true"))),
    }
}

/// Ordered mapping from variable name to [`Descriptor`], plus the fixed
/// `MeasurementToolMetadata` block.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Sidecar {
    pub measurement_tool_metadata: Option<Value>,
    variables: Vec<(String, Descriptor)>,
}

impl Sidecar {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tool_metadata(metadata: Value) -> Self {
        Self {
            measurement_tool_metadata: Some(metadata),
            variables: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.variables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.variables.iter().any(|(key, _)| key == name)
    }

    pub fn get(&self, name: &str) -> Option<&Descriptor> {
        self.variables
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, descriptor)| descriptor)
    }

    /// Insert or replace a descriptor. A new name is appended at the end,
    /// matching how calculations extend legacy sidecars.
    pub fn insert(&mut self, name: impl Into<String>, descriptor: Descriptor) {
        let name = name.into();
        match self.variables.iter_mut().find(|(key, _)| *key == name) {
            Some(entry) => entry.1 = descriptor,
            None => self.variables.push((name, descriptor)),
        }
    }

    pub fn remove(&mut self, name: &str) -> Option<Descriptor> {
        let index = self.variables.iter().position(|(key, _)| key == name)?;
        Some(self.variables.remove(index).1)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.variables.iter().map(|(key, _)| key.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Descriptor)> {
        self.variables
            .iter()
            .map(|(key, descriptor)| (key.as_str(), descriptor))
    }
}

impl Serialize for Sidecar {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let extra = usize::from(self.measurement_tool_metadata.is_some());
        let mut map = serializer.serialize_map(Some(self.variables.len() + extra))?;
        if let Some(metadata) = &self.measurement_tool_metadata {
            map.serialize_entry(MEASUREMENT_TOOL_METADATA, metadata)?;
        }
        for (name, descriptor) in &self.variables {
            map.serialize_entry(name, descriptor)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Sidecar {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Map::<String, Value>::deserialize(deserializer)?;
        let mut sidecar = Sidecar::new();
        for (key, value) in raw {
            if key == MEASUREMENT_TOOL_METADATA {
                sidecar.measurement_tool_metadata = Some(value);
                continue;
            }
            let descriptor = serde_json::from_value(value)
                .map_err(|error| D::Error::custom(format!("variable '{key}': {error}")))?;
            sidecar.variables.push((key, descriptor));
        }
        Ok(sidecar)
    }
}
