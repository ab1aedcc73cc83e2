use serde::{Deserialize, Serialize};

/// One field-definition record from the survey data dictionary.
///
/// Free-text fields keep whatever the export carried; absent cells are
/// `None`. Cleanup (tag stripping, `"nan"` tokens) is the descriptor
/// normalizer's job, not the model's.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDef {
    pub form_name: String,
    pub variable_name: String,
    pub section_header: Option<String>,
    pub field_label: Option<String>,
    pub field_note: Option<String>,
    pub choices: Option<String>,
}

/// Ordered sequence of field definitions.
///
/// Invariant: variable names are unique within the dictionary; lookups return
/// the first match to stay well-defined if an export violates that.
#[derive(Debug, Clone, Default)]
pub struct DataDictionary {
    fields: Vec<FieldDef>,
}

impl DataDictionary {
    pub fn new(fields: Vec<FieldDef>) -> Self {
        Self { fields }
    }

    pub fn fields(&self) -> &[FieldDef] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn get(&self, variable: &str) -> Option<&FieldDef> {
        self.fields
            .iter()
            .find(|field| field.variable_name == variable)
    }

    /// Variables belonging to one form, in dictionary order.
    pub fn form_variables(&self, form: &str) -> Vec<&str> {
        self.fields
            .iter()
            .filter(|field| field.form_name == form)
            .map(|field| field.variable_name.as_str())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field(form: &str, variable: &str) -> FieldDef {
        FieldDef {
            form_name: form.to_string(),
            variable_name: variable.to_string(),
            ..FieldDef::default()
        }
    }

    #[test]
    fn form_variables_keep_dictionary_order() {
        let dictionary = DataDictionary::new(vec![
            field("demo", "age"),
            field("mood", "phq_1"),
            field("demo", "sex"),
        ]);
        assert_eq!(dictionary.form_variables("demo"), vec!["age", "sex"]);
        assert!(dictionary.form_variables("absent").is_empty());
    }

    #[test]
    fn lookup_returns_first_match() {
        let dictionary = DataDictionary::new(vec![field("a", "dup"), field("b", "dup")]);
        assert_eq!(dictionary.get("dup").unwrap().form_name, "a");
    }
}
