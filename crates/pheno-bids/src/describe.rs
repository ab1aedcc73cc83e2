//! Free-text normalization of dictionary fields into descriptors.

use serde_json::{Map, Value};
use tracing::warn;

use pheno_model::{Descriptor, FieldDef};

/// Placeholder some exports carry for an absent free-text cell.
const NAN_TOKEN: &str = "nan";

/// Build the metadata descriptor for one dictionary record.
pub fn build_descriptor(field: &FieldDef) -> Descriptor {
    let description = clean_description(&[
        field.section_header.as_deref(),
        field.field_label.as_deref(),
        field.field_note.as_deref(),
    ]);
    let mut descriptor = Descriptor::new(description);
    if let Some(choices) = field.choices.as_deref()
        && let Some(levels) = parse_levels(choices)
    {
        descriptor.levels = Some(levels);
    }
    descriptor
}

/// Space-join the free-text parts, skipping absent cells and the literal
/// `"nan"` placeholder, then strip markup and collapse whitespace artifacts.
fn clean_description(parts: &[Option<&str>]) -> String {
    let joined = parts
        .iter()
        .filter_map(|part| *part)
        .filter(|part| !part.is_empty() && *part != NAN_TOKEN)
        .collect::<Vec<&str>>()
        .join(" ");
    collapse_whitespace(&strip_tags(&joined))
}

/// Remove `<...>` markup tags. An unclosed `<` has no tag to strip and stays
/// literal.
fn strip_tags(text: &str) -> String {
    let mut cleaned = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(open) = rest.find('<') {
        match rest[open..].find('>') {
            Some(close) => {
                cleaned.push_str(&rest[..open]);
                rest = &rest[open + close + 1..];
            }
            None => break,
        }
    }
    cleaned.push_str(rest);
    cleaned
}

/// Newlines and non-breaking spaces each become a single regular space.
fn collapse_whitespace(text: &str) -> String {
    text.chars()
        .map(|character| match character {
            '\n' | '\u{a0}' => ' ',
            other => other,
        })
        .collect()
}

/// Parse a categorical choices string into a Levels mapping.
///
/// A pipe marks a categorical encoding: parts are separated by `|`, each part
/// splits on its first comma into `(code, label)`. Only the code is trimmed;
/// the label keeps its surrounding whitespace as exported. A duplicate code
/// overwrites the earlier label while keeping the first occurrence's
/// position. Returns `None` when the string is not a categorical encoding.
pub fn parse_levels(choices: &str) -> Option<Map<String, Value>> {
    if !choices.contains('|') {
        return None;
    }
    let mut levels = Map::new();
    for part in choices.split('|') {
        let Some((code, label)) = part.split_once(',') else {
            warn!(part = %part, "choices entry has no label, skipping");
            continue;
        };
        levels.insert(code.trim().to_string(), Value::String(label.to_string()));
    }
    Some(levels)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field(section: Option<&str>, label: Option<&str>, note: Option<&str>) -> FieldDef {
        FieldDef {
            form_name: "form".into(),
            variable_name: "var".into(),
            section_header: section.map(str::to_string),
            field_label: label.map(str::to_string),
            field_note: note.map(str::to_string),
            choices: None,
        }
    }

    #[test]
    fn description_joins_parts_and_skips_nan() {
        let descriptor = build_descriptor(&field(Some("nan"), Some("Sex at birth"), Some("tick one")));
        assert_eq!(descriptor.description, "Sex at birth tick one");
    }

    #[test]
    fn markup_and_whitespace_artifacts_are_cleaned() {
        let descriptor = build_descriptor(&field(
            Some("<b>Background</b>"),
            Some("Line one\nline two"),
            Some("hard\u{a0}space"),
        ));
        assert_eq!(
            descriptor.description,
            "Background Line one line two hard space"
        );
    }

    #[test]
    fn unclosed_tag_stays_literal() {
        assert_eq!(strip_tags("a < b"), "a < b");
        assert_eq!(strip_tags("<i>x</i> y"), "x y");
    }

    #[test]
    fn levels_parse_with_untrimmed_labels() {
        let levels = parse_levels("1, Male | 2, Female").expect("levels");
        assert_eq!(levels.get("1"), Some(&Value::String(" Male ".into())));
        assert_eq!(levels.get("2"), Some(&Value::String(" Female".into())));
        let codes: Vec<&String> = levels.keys().collect();
        assert_eq!(codes, vec!["1", "2"]);
    }

    #[test]
    fn label_splits_on_first_comma_only() {
        let levels = parse_levels("1, Yes, definitely | 2, No").expect("levels");
        assert_eq!(levels.get("1"), Some(&Value::String(" Yes, definitely ".into())));
    }

    #[test]
    fn duplicate_codes_last_write_wins_in_place() {
        let levels = parse_levels("1, first | 2, second | 1, third").expect("levels");
        assert_eq!(levels.get("1"), Some(&Value::String(" third".into())));
        let codes: Vec<&String> = levels.keys().collect();
        assert_eq!(codes, vec!["1", "2"]);
    }

    #[test]
    fn comma_less_part_is_skipped_and_the_rest_survive() {
        let levels = parse_levels("1, Male | note | 2, Female").expect("levels");
        assert_eq!(levels.len(), 2);
        assert_eq!(levels.get("1"), Some(&Value::String(" Male ".into())));
        assert_eq!(levels.get("2"), Some(&Value::String(" Female".into())));
        assert!(!levels.contains_key("note"));
    }

    #[test]
    fn free_text_choices_have_no_levels() {
        assert!(parse_levels("calculated field").is_none());
        let descriptor = build_descriptor(&FieldDef {
            choices: Some("slider text".into()),
            ..field(None, Some("Label"), None)
        });
        assert!(descriptor.levels.is_none());
    }
}
