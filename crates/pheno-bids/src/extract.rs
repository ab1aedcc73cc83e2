use pheno_model::{PARTICIPANT_ID_COLUMN, Result, SUBJECT_ID_COLUMN, Table};

/// Build the tabular payload for one output entry.
///
/// `columns` is the selected column set with the raw subject identifier
/// already prepended. The identifier column is renamed to the canonical
/// `participant_id`, rows without a subject id are dropped, the remainder is
/// stable-sorted ascending by subject id. Filtering and sorting key on the
/// canonical name, after the rename.
pub fn build_entry_table(table: &Table, columns: &[String]) -> Result<Table> {
    let mut entry = table.project(columns)?;
    entry.rename_column(SUBJECT_ID_COLUMN, PARTICIPANT_ID_COLUMN);
    let id_index = entry
        .column_index(PARTICIPANT_ID_COLUMN)
        .ok_or_else(|| pheno_model::PhenoError::VariableNotFound(PARTICIPANT_ID_COLUMN.into()))?;
    entry.retain_rows(|row| !row[id_index].is_missing());
    entry.sort_rows_by_column(id_index);
    Ok(entry)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pheno_model::CellValue;

    #[test]
    fn drops_unaffiliated_rows_and_sorts_by_participant() {
        let mut table = Table::new(vec![
            SUBJECT_ID_COLUMN.to_string(),
            "age".to_string(),
            "extra".to_string(),
        ]);
        table.push_row(vec![
            CellValue::text("sub-02"),
            CellValue::text("40"),
            CellValue::text("x"),
        ]);
        table.push_row(vec![
            CellValue::Missing,
            CellValue::text("99"),
            CellValue::text("y"),
        ]);
        table.push_row(vec![
            CellValue::text("sub-01"),
            CellValue::Missing,
            CellValue::text("z"),
        ]);

        let columns = vec![SUBJECT_ID_COLUMN.to_string(), "age".to_string()];
        let entry = build_entry_table(&table, &columns).expect("entry table");
        assert_eq!(entry.columns, vec![PARTICIPANT_ID_COLUMN, "age"]);
        assert_eq!(entry.height(), 2);
        assert_eq!(entry.rows[0][0], CellValue::text("sub-01"));
        assert!(entry.rows[0][1].is_missing());
        assert_eq!(entry.rows[1][0], CellValue::text("sub-02"));
    }
}
