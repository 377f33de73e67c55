//! Spreadsheet cells as produced by a sheet-to-array conversion.

use serde::{Deserialize, Serialize};

/// A single scalar cell. `null` in JSON maps to `Empty`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(untagged)]
pub enum Cell {
    #[default]
    Empty,
    Bool(bool),
    Number(f64),
    Text(String),
}

/// Rows of cells. Rows may be shorter than the header row.
pub type Grid = Vec<Vec<Cell>>;

impl Cell {
    /// String form of the cell, as a spreadsheet library would stringify it.
    pub fn as_text(&self) -> String {
        match self {
            Cell::Empty => String::new(),
            Cell::Bool(b) => b.to_string(),
            // f64 Display already drops the fractional part of integral values
            Cell::Number(n) => n.to_string(),
            Cell::Text(s) => s.clone(),
        }
    }

    /// Trimmed string form
    pub fn trimmed(&self) -> String {
        self.as_text().trim().to_string()
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
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

impl From<bool> for Cell {
    fn from(b: bool) -> Self {
        Cell::Bool(b)
    }
}

impl From<f64> for Cell {
    fn from(n: f64) -> Self {
        Cell::Number(n)
    }
}

/// Cell at `idx`, treating missing trailing cells as `Empty`.
pub fn cell_at(row: &[Cell], idx: usize) -> &Cell {
    static EMPTY: Cell = Cell::Empty;
    row.get(idx).unwrap_or(&EMPTY)
}
