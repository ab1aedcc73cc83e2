use std::path::Path;

use anyhow::{Context, Result, bail};
use csv::ReaderBuilder;

use pheno_model::{DataDictionary, FieldDef};

const FORM_NAME: &str = "Form Name";
const VARIABLE_NAME: &str = "Variable / Field Name";
const SECTION_HEADER: &str = "Section Header";
const FIELD_LABEL: &str = "Field Label";
const FIELD_NOTE: &str = "Field Note";
const CHOICES: &str = "Choices, Calculations, OR Slider Labels";

/// Read a REDCap data dictionary export.
///
/// The column set is fixed by the export format; only the form and variable
/// columns are required to be present, the free-text columns may be absent in
/// truncated exports.
pub fn read_data_dictionary(path: &Path) -> Result<DataDictionary> {
    let mut reader = ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("read data dictionary: {}", path.display()))?;
    let headers: Vec<String> = reader
        .headers()
        .with_context(|| format!("read dictionary headers: {}", path.display()))?
        .iter()
        .map(|header| header.trim().trim_matches('\u{feff}').to_string())
        .collect();

    let position = |name: &str| headers.iter().position(|header| header == name);
    let Some(form_index) = position(FORM_NAME) else {
        bail!("data dictionary is missing the '{FORM_NAME}' column: {}", path.display());
    };
    let Some(variable_index) = position(VARIABLE_NAME) else {
        bail!(
            "data dictionary is missing the '{VARIABLE_NAME}' column: {}",
            path.display()
        );
    };
    let section_index = position(SECTION_HEADER);
    let label_index = position(FIELD_LABEL);
    let note_index = position(FIELD_NOTE);
    let choices_index = position(CHOICES);

    let mut fields = Vec::new();
    for record in reader.records() {
        let record = record.with_context(|| format!("read dictionary row: {}", path.display()))?;
        let cell = |index: Option<usize>| {
            index
                .and_then(|index| record.get(index))
                .filter(|value| !value.is_empty())
                .map(str::to_string)
        };
        let variable_name = record.get(variable_index).unwrap_or("").trim().to_string();
        if variable_name.is_empty() {
            continue;
        }
        fields.push(FieldDef {
            form_name: record.get(form_index).unwrap_or("").trim().to_string(),
            variable_name,
            section_header: cell(section_index),
            field_label: cell(label_index),
            field_note: cell(note_index),
            choices: cell(choices_index),
        });
    }
    Ok(DataDictionary::new(fields))
}
