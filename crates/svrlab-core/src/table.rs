use std::collections::HashSet;
use std::fmt;

use crate::error::{Result, SvrError};

/// A single value of an ingested table.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    /// A value written as a whole number that fits in `i64`.
    Integer(i64),
    Number(f64),
    Text(String),
    Missing,
}

impl Cell {
    pub fn is_missing(&self) -> bool {
        matches!(self, Cell::Missing)
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Cell::Integer(v) => Some(*v as f64),
            Cell::Number(v) => Some(*v),
            _ => None,
        }
    }
}

/// Element kind of a column, inferred once at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    /// Every present value was read as an integer.
    Integer,
    /// Every present value is a number (an all-missing column lands here).
    Float,
    /// At least one present value is text.
    Text,
}

impl ColumnKind {
    pub fn is_numeric(self) -> bool {
        !matches!(self, ColumnKind::Text)
    }
}

impl fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnKind::Integer => f.write_str("integer"),
            ColumnKind::Float => f.write_str("float"),
            ColumnKind::Text => f.write_str("text"),
        }
    }
}

/// A named, typed column.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    name: String,
    cells: Vec<Cell>,
    kind: ColumnKind,
}

impl Column {
    pub fn new(name: impl Into<String>, cells: Vec<Cell>) -> Self {
        let kind = infer_kind(&cells);
        Column {
            name: name.into(),
            cells,
            kind,
        }
    }

    /// Integer column without missing entries.
    pub fn integer(name: impl Into<String>, values: &[i64]) -> Self {
        Column::new(name, values.iter().map(|&v| Cell::Integer(v)).collect())
    }

    /// Float column without missing entries.
    pub fn numeric(name: impl Into<String>, values: &[f64]) -> Self {
        Column::new(name, values.iter().map(|&v| Cell::Number(v)).collect())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn kind(&self) -> ColumnKind {
        self.kind
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn missing_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_missing()).count()
    }

    /// Type label in the vocabulary API clients expect (`int64`, `float64`, `object`).
    ///
    /// Integer columns with gaps are reported as `float64`, matching how
    /// dataframe libraries promote them.
    pub fn dtype_name(&self) -> &'static str {
        match self.kind {
            ColumnKind::Integer if self.missing_count() == 0 => "int64",
            ColumnKind::Integer | ColumnKind::Float => "float64",
            ColumnKind::Text => "object",
        }
    }

    /// Numeric projection with `None` for missing entries, or `None` for text columns.
    pub fn numeric_values(&self) -> Option<Vec<Option<f64>>> {
        if !self.kind.is_numeric() {
            return None;
        }
        Some(self.cells.iter().map(Cell::as_number).collect())
    }
}

fn infer_kind(cells: &[Cell]) -> ColumnKind {
    let mut integral = true;
    let mut present = false;
    for cell in cells {
        match cell {
            Cell::Text(_) => return ColumnKind::Text,
            Cell::Integer(_) => present = true,
            Cell::Number(_) => {
                present = true;
                integral = false;
            }
            Cell::Missing => {}
        }
    }
    if integral && present {
        ColumnKind::Integer
    } else {
        ColumnKind::Float
    }
}

/// Rectangular table of named, typed columns.
///
/// Construction enforces the invariants every later stage relies on: at
/// least one column and one row, equal column lengths, unique names.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    columns: Vec<Column>,
    n_rows: usize,
}

impl Dataset {
    pub fn new(columns: Vec<Column>) -> Result<Self> {
        let first = columns
            .first()
            .ok_or_else(|| SvrError::unreadable("the file contains no columns"))?;
        let n_rows = first.len();

        if let Some(bad) = columns.iter().find(|c| c.len() != n_rows) {
            return Err(SvrError::unreadable(format!(
                "column '{}' has {} values, expected {}",
                bad.name(),
                bad.len(),
                n_rows
            )));
        }
        if n_rows == 0 {
            return Err(SvrError::unreadable("the file contains no data rows"));
        }

        let mut seen = HashSet::new();
        for column in &columns {
            if !seen.insert(column.name()) {
                return Err(SvrError::unreadable(format!(
                    "duplicate column name '{}'",
                    column.name()
                )));
            }
        }

        Ok(Dataset { columns, n_rows })
    }

    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    pub fn n_cols(&self) -> usize {
        self.columns.len()
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name() == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.column(name).is_some()
    }

    pub fn column_names(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name().to_string()).collect()
    }
}
