//! The closed set of calculation operations.
//!
//! Operation names from the configuration resolve to one tagged variant each;
//! an unrecognized name is a recoverable configuration error, not a runtime
//! lookup failure. Every operation consumes and returns an owned
//! (table, sidecar) pair so no step can observe a partially mutated sibling.

use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

use pheno_model::{CellValue, Descriptor, PhenoError, Result, Sidecar, Table};

const RENAME_VARIABLES: &str = "RenameVariables";
const REPLACE_LEVELS: &str = "ReplaceLevels";
const DERIVATIVE_DIFFERENCES: &str = "DerivativeDifferences";

const PRECOVID_SUFFIX: &str = "_precovid";
const CURRENT_SUFFIX: &str = "_current";
const DIFF_SUFFIX: &str = "_diff";

/// Replacement of one categorical level across a fixed set of columns.
#[derive(Debug, Clone, PartialEq)]
pub struct LevelReplacement {
    pub level: String,
    pub replace_with: CellValue,
    pub variables: Vec<String>,
}

/// A resolved calculation operation.
#[derive(Debug, Clone, PartialEq)]
pub enum CalcOp {
    RenameVariables { map: Vec<(String, String)> },
    ReplaceLevels { replacements: Vec<LevelReplacement> },
    DerivativeDifferences,
}

impl CalcOp {
    /// Resolve a configured operation name and argument payload.
    ///
    /// # Errors
    ///
    /// `UnknownOperation` for a name outside the registry; `Message` when the
    /// arguments do not have the shape the operation requires.
    pub fn resolve(name: &str, args: &Value) -> Result<Self> {
        match name {
            RENAME_VARIABLES => parse_rename(args),
            REPLACE_LEVELS => parse_replace(args),
            DERIVATIVE_DIFFERENCES => {
                if args.is_null() {
                    Ok(Self::DerivativeDifferences)
                } else {
                    Err(PhenoError::Message(format!(
                        "{DERIVATIVE_DIFFERENCES} takes no arguments, got {args}"
                    )))
                }
            }
            other => Err(PhenoError::UnknownOperation(other.to_string())),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::RenameVariables { .. } => RENAME_VARIABLES,
            Self::ReplaceLevels { .. } => REPLACE_LEVELS,
            Self::DerivativeDifferences => DERIVATIVE_DIFFERENCES,
        }
    }

    /// Apply the operation to an owned (table, sidecar) pair.
    pub fn apply(&self, table: Table, sidecar: Sidecar) -> Result<(Table, Sidecar)> {
        match self {
            Self::RenameVariables { map } => rename_variables(table, sidecar, map),
            Self::ReplaceLevels { replacements } => replace_levels(table, sidecar, replacements),
            Self::DerivativeDifferences => derivative_differences(table, sidecar),
        }
    }
}

fn parse_rename(args: &Value) -> Result<CalcOp> {
    let Value::Object(raw) = args else {
        return Err(PhenoError::Message(format!(
            "{RENAME_VARIABLES} expects a mapping of old to new variable names"
        )));
    };
    let mut map = Vec::with_capacity(raw.len());
    for (old, new) in raw {
        let Value::String(new) = new else {
            return Err(PhenoError::Message(format!(
                "{RENAME_VARIABLES}: new name for '{old}' must be a string"
            )));
        };
        map.push((old.clone(), new.clone()));
    }
    Ok(CalcOp::RenameVariables { map })
}

#[derive(Deserialize)]
struct RawReplacement {
    #[serde(rename = "ReplaceWith")]
    replace_with: Value,
    #[serde(rename = "ReplaceInVariables")]
    variables: Vec<String>,
}

fn parse_replace(args: &Value) -> Result<CalcOp> {
    let Value::Object(raw) = args else {
        return Err(PhenoError::Message(format!(
            "{REPLACE_LEVELS} expects a mapping of level codes to replacements"
        )));
    };
    let mut replacements = Vec::with_capacity(raw.len());
    for (level, value) in raw {
        let raw_replacement: RawReplacement =
            serde_json::from_value(value.clone()).map_err(|error| {
                PhenoError::Message(format!("{REPLACE_LEVELS}: level '{level}': {error}"))
            })?;
        replacements.push(LevelReplacement {
            level: level.clone(),
            replace_with: replacement_value(level, &raw_replacement.replace_with)?,
            variables: raw_replacement.variables,
        });
    }
    Ok(CalcOp::ReplaceLevels { replacements })
}

/// The string "NaN" is the missing-value marker, not a literal.
fn replacement_value(level: &str, raw: &Value) -> Result<CellValue> {
    match raw {
        Value::String(text) if text == "NaN" => Ok(CellValue::Missing),
        Value::String(text) => Ok(CellValue::text(text.clone())),
        Value::Number(number) => Ok(CellValue::text(number.to_string())),
        Value::Null => Ok(CellValue::Missing),
        other => Err(PhenoError::Message(format!(
            "{REPLACE_LEVELS}: level '{level}': ReplaceWith must be a scalar, got {other}"
        ))),
    }
}

/// Move descriptors and rename matching columns, pair by pair. A pair whose
/// old name is not tracked in the sidecar is skipped with a warning; the
/// remaining pairs are still applied. A collision with a different existing
/// name fails the whole operation rather than silently overwriting; an
/// identity rename is a harmless move-to-end of the descriptor.
fn rename_variables(
    mut table: Table,
    mut sidecar: Sidecar,
    map: &[(String, String)],
) -> Result<(Table, Sidecar)> {
    for (old, new) in map {
        if !sidecar.contains(old) {
            warn!(variable = %old, "variable not found and not renamed");
            continue;
        }
        if old != new && (sidecar.contains(new) || table.has_column(new)) {
            return Err(PhenoError::RenameCollision {
                from: old.clone(),
                to: new.clone(),
            });
        }
        if let Some(descriptor) = sidecar.remove(old) {
            sidecar.insert(new.clone(), descriptor);
        }
        table.rename_column(old, new);
    }
    Ok((table, sidecar))
}

/// Replace a literal level value across exactly the listed columns.
///
/// Known limitation carried over from the original tooling: the sidecar's
/// Levels descriptors are not updated to reflect the replacement.
fn replace_levels(
    mut table: Table,
    sidecar: Sidecar,
    replacements: &[LevelReplacement],
) -> Result<(Table, Sidecar)> {
    for replacement in replacements {
        for variable in &replacement.variables {
            let index = table
                .column_index(variable)
                .ok_or_else(|| PhenoError::VariableNotFound(variable.clone()))?;
            for row in &mut table.rows {
                if row[index].as_text() == Some(replacement.level.as_str()) {
                    row[index] = replacement.replace_with.clone();
                }
            }
        }
    }
    Ok((table, sidecar))
}

/// Discover `<root>_precovid` / `<root>_current` pairs among sidecar keys and
/// append a `<root>_diff` column with the numeric difference.
///
/// Discovery looks only at sidecar keys; a discovered pair whose columns are
/// absent from the table is an error.
fn derivative_differences(mut table: Table, mut sidecar: Sidecar) -> Result<(Table, Sidecar)> {
    let roots: Vec<String> = sidecar
        .keys()
        .filter_map(|key| key.strip_suffix(PRECOVID_SUFFIX))
        .filter(|root| sidecar.contains(&format!("{root}{CURRENT_SUFFIX}")))
        .map(str::to_string)
        .collect();

    for root in roots {
        let precovid = format!("{root}{PRECOVID_SUFFIX}");
        let current = format!("{root}{CURRENT_SUFFIX}");
        let diff = format!("{root}{DIFF_SUFFIX}");

        let precovid_index = table
            .column_index(&precovid)
            .ok_or_else(|| PhenoError::VariableNotFound(precovid.clone()))?;
        let current_index = table
            .column_index(&current)
            .ok_or_else(|| PhenoError::VariableNotFound(current.clone()))?;

        let mut cells = Vec::with_capacity(table.height());
        for row in &table.rows {
            let cell = match (&row[current_index], &row[precovid_index]) {
                (CellValue::Text(current_raw), CellValue::Text(precovid_raw)) => {
                    let minuend = parse_numeric(&current, current_raw)?;
                    let subtrahend = parse_numeric(&precovid, precovid_raw)?;
                    CellValue::Text(format_numeric(minuend - subtrahend))
                }
                _ => CellValue::Missing,
            };
            cells.push(cell);
        }
        table.push_column(&diff, cells)?;

        let description =
            format!("Transformation of data using the following formula: {current} - {precovid}");
        sidecar.insert(diff, Descriptor::derived(description));
    }
    Ok((table, sidecar))
}

fn parse_numeric(variable: &str, raw: &str) -> Result<f64> {
    raw.trim()
        .parse::<f64>()
        .map_err(|_| PhenoError::NotNumeric {
            variable: variable.to_string(),
            value: raw.to_string(),
        })
}

/// Integral results print without a decimal point, so differences of integer
/// scores stay integer-looking in the output file.
fn format_numeric(value: f64) -> String {
    format!("{value}")
}
