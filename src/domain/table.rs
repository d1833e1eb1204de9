//! Wide summary table with a dynamic column collection
//!
//! Cross-tabulation produces one column per observed category value, so the
//! column set is not known until the data has been seen. The table is an
//! ordered list of column names plus one row of cells per DRG composite key,
//! rather than a fixed struct.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A single cell value in a summary table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Cell {
    Text(String),
    Int(i64),
    Float(f64),
}

impl Cell {
    /// Numeric view of the cell; text cells are not numeric
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Cell::Int(v) => Some(*v as f64),
            Cell::Float(v) => Some(*v),
            Cell::Text(_) => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Cell::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Text(s) => write!(f, "{s}"),
            Cell::Int(v) => write!(f, "{v}"),
            Cell::Float(v) => write!(f, "{v}"),
        }
    }
}

/// An ordered tabular result: column names plus rows of cells
///
/// Invariant: every row has exactly `columns.len()` cells.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SummaryTable {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

impl SummaryTable {
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Index of a column by exact name
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Cell at (row, column name); None when either is absent
    pub fn cell(&self, row: usize, column: &str) -> Option<&Cell> {
        let idx = self.column_index(column)?;
        self.rows.get(row)?.get(idx)
    }

    /// Append a row; panics in debug builds if the width does not match
    pub fn push_row(&mut self, row: Vec<Cell>) {
        debug_assert_eq!(row.len(), self.columns.len());
        self.rows.push(row);
    }

    /// Append a column with one value per existing row
    pub fn push_column(&mut self, name: impl Into<String>, values: Vec<Cell>) {
        debug_assert_eq!(values.len(), self.rows.len());
        self.columns.push(name.into());
        for (row, value) in self.rows.iter_mut().zip(values) {
            row.push(value);
        }
    }

    /// Remove a column by name; no-op when the column is absent
    pub fn drop_column(&mut self, name: &str) {
        if let Some(idx) = self.column_index(name) {
            self.columns.remove(idx);
            for row in &mut self.rows {
                row.remove(idx);
            }
        }
    }

    /// Rename columns through a mapping function applied once per name
    pub fn rename_columns<F>(&mut self, mut f: F)
    where
        F: FnMut(&str) -> String,
    {
        for column in &mut self.columns {
            *column = f(column);
        }
    }

    /// Stack another table under this one, aligning columns by name
    ///
    /// Columns absent on either side are kept; missing cells become empty
    /// text. Row order is preserved (append semantics).
    pub fn stack(&mut self, other: SummaryTable) {
        for column in &other.columns {
            if self.column_index(column).is_none() {
                let filler = vec![Cell::Text(String::new()); self.rows.len()];
                self.push_column(column.clone(), filler);
            }
        }
        for row in other.rows {
            let mut aligned = vec![Cell::Text(String::new()); self.columns.len()];
            for (idx, cell) in row.into_iter().enumerate() {
                let name = &other.columns[idx];
                if let Some(target) = self.column_index(name) {
                    aligned[target] = cell;
                }
            }
            self.rows.push(aligned);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_column_table() -> SummaryTable {
        let mut table = SummaryTable::new(vec!["key".to_string(), "count".to_string()]);
        table.push_row(vec![Cell::Text("a".to_string()), Cell::Int(3)]);
        table.push_row(vec![Cell::Text("b".to_string()), Cell::Int(5)]);
        table
    }

    #[test]
    fn test_cell_display() {
        assert_eq!(Cell::Text("x".to_string()).to_string(), "x");
        assert_eq!(Cell::Int(7).to_string(), "7");
        assert_eq!(Cell::Float(0.5).to_string(), "0.5");
    }

    #[test]
    fn test_cell_lookup() {
        let table = two_column_table();
        assert_eq!(table.cell(1, "count"), Some(&Cell::Int(5)));
        assert_eq!(table.cell(0, "missing"), None);
        assert_eq!(table.cell(9, "count"), None);
    }

    #[test]
    fn test_push_and_drop_column() {
        let mut table = two_column_table();
        table.push_column("rate", vec![Cell::Float(0.1), Cell::Float(0.2)]);
        assert_eq!(table.columns.len(), 3);
        table.drop_column("count");
        assert_eq!(table.columns, vec!["key", "rate"]);
        assert_eq!(table.rows[0], vec![Cell::Text("a".to_string()), Cell::Float(0.1)]);
    }

    #[test]
    fn test_stack_aligns_columns_by_name() {
        let mut base = two_column_table();

        let mut other = SummaryTable::new(vec!["count".to_string(), "key".to_string(), "extra".to_string()]);
        other.push_row(vec![
            Cell::Int(9),
            Cell::Text("c".to_string()),
            Cell::Float(1.5),
        ]);

        base.stack(other);
        assert_eq!(base.columns, vec!["key", "count", "extra"]);
        assert_eq!(base.row_count(), 3);
        assert_eq!(base.cell(2, "key"), Some(&Cell::Text("c".to_string())));
        assert_eq!(base.cell(2, "count"), Some(&Cell::Int(9)));
        // Rows from before the stack have empty cells in the new column
        assert_eq!(base.cell(0, "extra"), Some(&Cell::Text(String::new())));
    }
}
