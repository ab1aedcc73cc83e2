use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::error::{PhenoError, Result};

/// Raw subject-identifier column as exported by REDCap.
pub const SUBJECT_ID_COLUMN: &str = "redcap_survey_identifier";

/// Canonical BIDS participant-identifier column.
pub const PARTICIPANT_ID_COLUMN: &str = "participant_id";

/// A single cell of a phenotype table.
///
/// Values are kept as text end to end; the original export is untyped and
/// numeric interpretation happens only where an operation requires it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value")]
pub enum CellValue {
    Text(String),
    Missing,
}

impl CellValue {
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Self::Missing)
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(value) => Some(value),
            Self::Missing => None,
        }
    }
}

/// An ordered set of named columns with row-aligned cells.
///
/// Invariant: column names are unique and every row has exactly one cell per
/// column.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<CellValue>>,
}

impl Table {
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    pub fn width(&self) -> usize {
        self.columns.len()
    }

    pub fn height(&self) -> usize {
        self.rows.len()
    }

    pub fn push_row(&mut self, row: Vec<CellValue>) {
        debug_assert_eq!(row.len(), self.columns.len());
        self.rows.push(row);
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|column| column == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    /// Rename a column in place. Returns false when `old` is absent, which is
    /// not an error: metadata may track variables the table never carried.
    pub fn rename_column(&mut self, old: &str, new: &str) -> bool {
        match self.column_index(old) {
            Some(index) => {
                self.columns[index] = new.to_string();
                true
            }
            None => false,
        }
    }

    /// Append a new column with one cell per existing row.
    pub fn push_column(&mut self, name: &str, cells: Vec<CellValue>) -> Result<()> {
        if self.has_column(name) {
            return Err(PhenoError::DuplicateColumn(name.to_string()));
        }
        debug_assert_eq!(cells.len(), self.rows.len());
        self.columns.push(name.to_string());
        for (row, cell) in self.rows.iter_mut().zip(cells) {
            row.push(cell);
        }
        Ok(())
    }

    /// Project onto the given columns, in the given order.
    pub fn project(&self, columns: &[String]) -> Result<Table> {
        let mut indices = Vec::with_capacity(columns.len());
        for name in columns {
            let index = self
                .column_index(name)
                .ok_or_else(|| PhenoError::VariableNotFound(name.clone()))?;
            indices.push(index);
        }
        let rows = self
            .rows
            .iter()
            .map(|row| indices.iter().map(|&index| row[index].clone()).collect())
            .collect();
        Ok(Table {
            columns: columns.to_vec(),
            rows,
        })
    }

    /// Drop rows for which the predicate returns false.
    pub fn retain_rows(&mut self, mut keep: impl FnMut(&[CellValue]) -> bool) {
        self.rows.retain(|row| keep(row));
    }

    /// Stable sort of rows by the text of one column, ascending.
    /// Missing cells order after any text value.
    pub fn sort_rows_by_column(&mut self, index: usize) {
        self.rows.sort_by(|left, right| cell_order(&left[index], &right[index]));
    }
}

fn cell_order(left: &CellValue, right: &CellValue) -> Ordering {
    match (left, right) {
        (CellValue::Text(a), CellValue::Text(b)) => a.cmp(b),
        (CellValue::Text(_), CellValue::Missing) => Ordering::Less,
        (CellValue::Missing, CellValue::Text(_)) => Ordering::Greater,
        (CellValue::Missing, CellValue::Missing) => Ordering::Equal,
    }
}
