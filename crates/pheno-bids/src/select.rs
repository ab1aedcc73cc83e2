use pheno_model::{DataDictionary, Table};

/// Compute the dataset columns belonging to the given forms.
///
/// For each form, in handle order: take the dictionary variables of that form
/// and keep those that actually exist as columns in the data. The combined
/// selection is de-duplicated (first occurrence wins when a variable belongs
/// to several requested forms) and then reordered to match the table's
/// original column order.
pub fn select_form_columns(forms: &[String], table: &Table, dictionary: &DataDictionary) -> Vec<String> {
    let mut selected: Vec<String> = Vec::new();
    for form in forms {
        for variable in dictionary.form_variables(form) {
            if table.has_column(variable) && !selected.iter().any(|name| name == variable) {
                selected.push(variable.to_string());
            }
        }
    }
    selected.sort_by_key(|name| table.column_index(name));
    selected
}
