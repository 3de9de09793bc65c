//! Tabular result-set model returned by data-source queries.
//!
//! A [`DataFrame`] is an ordered list of named columns over an ordered list
//! of rows of scalar cells. Column order and row order are significant and
//! preserved from the source; formatting operations treat frames as
//! read-only.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A single scalar value in a result set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Cell {
    /// Missing value, rendered as an empty string.
    Null,
    Int(i64),
    Float(f64),
    Text(String),
    /// Calendar date, rendered as `YYYY-MM-DD`.
    Date(NaiveDate),
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Null => Ok(()),
            Cell::Int(v) => write!(f, "{}", v),
            Cell::Float(v) => write!(f, "{}", v),
            Cell::Text(v) => write!(f, "{}", v),
            Cell::Date(v) => write!(f, "{}", v.format("%Y-%m-%d")),
        }
    }
}

impl From<&str> for Cell {
    fn from(s: &str) -> Self {
        Cell::Text(s.to_string())
    }
}

impl From<String> for Cell {
    fn from(s: String) -> Self {
        Cell::Text(s)
    }
}

impl From<i64> for Cell {
    fn from(v: i64) -> Self {
        Cell::Int(v)
    }
}

impl From<f64> for Cell {
    fn from(v: f64) -> Self {
        Cell::Float(v)
    }
}

impl From<NaiveDate> for Cell {
    fn from(d: NaiveDate) -> Self {
        Cell::Date(d)
    }
}

/// Two-dimensional labeled dataset: rows by named columns.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DataFrame {
    columns: Vec<String>,
    rows: Vec<Vec<Cell>>,
}

impl DataFrame {
    /// Create an empty frame with the given column labels.
    pub fn new<S: Into<String>>(columns: Vec<S>) -> Self {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    /// Append a row. Width is not enforced here; the renderer rejects
    /// ragged frames when producing output.
    pub fn push_row(&mut self, row: Vec<Cell>) {
        self.rows.push(row);
    }

    /// Builder-style row append, convenient in tests.
    pub fn with_row(mut self, row: Vec<Cell>) -> Self {
        self.push_row(row);
        self
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn n_cols(&self) -> usize {
        self.columns.len()
    }

    /// A frame with zero rows is empty even if it carries column labels.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of a column by label, if present.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Iterate the cells of one column across all rows. Rows shorter than
    /// the column index yield nothing for that row.
    pub fn column_values(&self, index: usize) -> impl Iterator<Item = &Cell> {
        self.rows.iter().filter_map(move |row| row.get(index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_frame_with_columns_is_empty() {
        let frame = DataFrame::new(vec!["date", "close"]);
        assert!(frame.is_empty());
        assert_eq!(frame.n_cols(), 2);
        assert_eq!(frame.n_rows(), 0);
    }

    #[test]
    fn column_lookup_and_values() {
        let frame = DataFrame::new(vec!["code", "close"])
            .with_row(vec![Cell::from("sh.600000"), Cell::from(10.5)])
            .with_row(vec![Cell::from("sh.600000"), Cell::from(10.8)]);
        assert_eq!(frame.column_index("close"), Some(1));
        assert_eq!(frame.column_index("open"), None);
        let closes: Vec<_> = frame.column_values(1).collect();
        assert_eq!(closes, vec![&Cell::Float(10.5), &Cell::Float(10.8)]);
    }

    #[test]
    fn cell_display() {
        assert_eq!(Cell::Null.to_string(), "");
        assert_eq!(Cell::Int(42).to_string(), "42");
        assert_eq!(Cell::Float(3.5).to_string(), "3.5");
        assert_eq!(
            Cell::Date(NaiveDate::from_ymd_opt(2024, 1, 2).unwrap()).to_string(),
            "2024-01-02"
        );
    }
}
