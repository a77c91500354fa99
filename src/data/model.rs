use std::collections::BTreeMap;
use std::fmt;

use thiserror::Error;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors raised when a dataset is built or queried.
#[derive(Error, Debug, PartialEq)]
pub enum DataError {
    #[error("column '{0}' not found in dataset")]
    MissingColumn(String),

    #[error("column '{0}' is not numeric")]
    NonNumericColumn(String),

    #[error("column '{column}' has {actual} rows, expected {expected}")]
    LengthMismatch {
        column: String,
        expected: usize,
        actual: usize,
    },

    #[error("column '{0}' already exists")]
    DuplicateColumn(String),
}

// ---------------------------------------------------------------------------
// CellValue – a single cell of the table
// ---------------------------------------------------------------------------

/// A dynamically-typed cell value mirroring common dataframe dtypes.
/// Used as a `BTreeMap` / `BTreeSet` key downstream so it must be `Ord`.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    String(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    Null,
}

// -- Manual Eq/Ord so we can put CellValue in BTreeSet --

impl Eq for CellValue {}

impl PartialOrd for CellValue {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for CellValue {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        use CellValue::*;
        fn discriminant(v: &CellValue) -> u8 {
            match v {
                Null => 0,
                Bool(_) => 1,
                Integer(_) => 2,
                Float(_) => 3,
                String(_) => 4,
            }
        }
        let da = discriminant(self);
        let db = discriminant(other);
        if da != db {
            return da.cmp(&db);
        }
        match (self, other) {
            (Null, Null) => std::cmp::Ordering::Equal,
            (Bool(a), Bool(b)) => a.cmp(b),
            (Integer(a), Integer(b)) => a.cmp(b),
            (Float(a), Float(b)) => a.total_cmp(b),
            (String(a), String(b)) => a.cmp(b),
            _ => std::cmp::Ordering::Equal,
        }
    }
}

impl std::hash::Hash for CellValue {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            CellValue::String(s) => s.hash(state),
            CellValue::Integer(i) => i.hash(state),
            CellValue::Float(f) => f.to_bits().hash(state),
            CellValue::Bool(b) => b.hash(state),
            CellValue::Null => {}
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::String(s) => write!(f, "{s}"),
            CellValue::Integer(i) => write!(f, "{i}"),
            CellValue::Float(v) => write!(f, "{v}"),
            CellValue::Bool(b) => write!(f, "{b}"),
            CellValue::Null => write!(f, "<null>"),
        }
    }
}

impl CellValue {
    /// Try to interpret the value as an `f64`.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Float(v) => Some(*v),
            CellValue::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }
}

// ---------------------------------------------------------------------------
// Column
// ---------------------------------------------------------------------------

/// Inferred element type of a column, in the vocabulary of a dataframe dtype.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Integer,
    Float,
    Bool,
    Text,
    Mixed,
    /// Every cell is null.
    Empty,
}

impl ColumnKind {
    pub fn is_numeric(self) -> bool {
        matches!(self, ColumnKind::Integer | ColumnKind::Float)
    }
}

impl fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ColumnKind::Integer => "int64",
            ColumnKind::Float => "float64",
            ColumnKind::Bool => "bool",
            ColumnKind::Text => "object",
            ColumnKind::Mixed => "object",
            ColumnKind::Empty => "empty",
        };
        f.write_str(name)
    }
}

/// One named column of the table.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub values: Vec<CellValue>,
}

impl Column {
    /// Build a column and unify its cells into a single dtype.
    pub fn new(name: impl Into<String>, values: Vec<CellValue>) -> Self {
        let mut column = Column {
            name: name.into(),
            values,
        };
        column.unify();
        column
    }

    #[cfg(test)]
    pub fn from_f64(name: impl Into<String>, values: &[f64]) -> Self {
        Self::new(name, values.iter().map(|&v| CellValue::Float(v)).collect())
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Number of non-null cells.
    pub fn non_null_count(&self) -> usize {
        self.values.iter().filter(|v| !v.is_null()).count()
    }

    /// Element type of the non-null cells.
    pub fn kind(&self) -> ColumnKind {
        let mut kind: Option<ColumnKind> = None;
        for value in &self.values {
            let this = match value {
                CellValue::Null => continue,
                CellValue::Integer(_) => ColumnKind::Integer,
                CellValue::Float(_) => ColumnKind::Float,
                CellValue::Bool(_) => ColumnKind::Bool,
                CellValue::String(_) => ColumnKind::Text,
            };
            kind = match kind {
                None => Some(this),
                Some(k) if k == this => Some(k),
                Some(_) => return ColumnKind::Mixed,
            };
        }
        kind.unwrap_or(ColumnKind::Empty)
    }

    /// Numeric columns and all-null ones, which read as numbers with every
    /// row missing.
    fn holds_numbers(&self) -> bool {
        matches!(
            self.kind(),
            ColumnKind::Integer | ColumnKind::Float | ColumnKind::Empty
        )
    }

    /// Non-null values as `f64`, or `None` when the column is not numeric.
    pub fn numeric_values(&self) -> Option<Vec<f64>> {
        if !self.holds_numbers() {
            return None;
        }
        Some(self.values.iter().filter_map(CellValue::as_f64).collect())
    }

    /// Every row as `Option<f64>`, keeping row alignment for pairwise work.
    pub fn numeric_rows(&self) -> Option<Vec<Option<f64>>> {
        if !self.holds_numbers() {
            return None;
        }
        Some(self.values.iter().map(CellValue::as_f64).collect())
    }

    /// Count occurrences of each non-null value.
    pub fn value_counts(&self) -> BTreeMap<CellValue, usize> {
        let mut counts = BTreeMap::new();
        for value in self.values.iter().filter(|v| !v.is_null()) {
            *counts.entry(value.clone()).or_insert(0) += 1;
        }
        counts
    }

    /// Coerce the cells into one dtype the way a dataframe reader would.
    ///
    /// NaN becomes null and `-0.0` becomes `0.0`. A mix of integers and
    /// floats is promoted to floats; an all-integral float column (spreadsheets
    /// store every number as a float) is demoted to integers.
    fn unify(&mut self) {
        for value in &mut self.values {
            if let CellValue::Float(f) = value {
                if f.is_nan() {
                    *value = CellValue::Null;
                } else if *f == 0.0 {
                    *f = 0.0;
                }
            }
        }

        let mut has_int = false;
        let mut has_float = false;
        let mut all_integral = true;
        for value in &self.values {
            match value {
                CellValue::Null => {}
                CellValue::Integer(_) => has_int = true,
                CellValue::Float(f) => {
                    has_float = true;
                    if f.fract() != 0.0 || f.abs() >= i64::MAX as f64 {
                        all_integral = false;
                    }
                }
                _ => return,
            }
        }

        if has_float && all_integral {
            for value in &mut self.values {
                if let CellValue::Float(f) = value {
                    *value = CellValue::Integer(*f as i64);
                }
            }
        } else if has_float && has_int {
            for value in &mut self.values {
                if let CellValue::Integer(i) = value {
                    *value = CellValue::Float(*i as f64);
                }
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Dataset – the complete loaded table
// ---------------------------------------------------------------------------

/// The full parsed table: equal-length columns in file order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    columns: Vec<Column>,
    n_rows: usize,
}

impl Dataset {
    /// Build a dataset, checking that every column has the same length.
    pub fn from_columns(columns: Vec<Column>) -> Result<Self, DataError> {
        let n_rows = columns.first().map(Column::len).unwrap_or(0);
        for (i, column) in columns.iter().enumerate() {
            if column.len() != n_rows {
                return Err(DataError::LengthMismatch {
                    column: column.name.clone(),
                    expected: n_rows,
                    actual: column.len(),
                });
            }
            if columns[..i].iter().any(|c| c.name == column.name) {
                return Err(DataError::DuplicateColumn(column.name.clone()));
            }
        }
        Ok(Dataset { columns, n_rows })
    }

    /// Return a copy of this dataset with `column` appended.
    pub fn with_column(&self, column: Column) -> Result<Self, DataError> {
        let mut columns = self.columns.clone();
        columns.push(column);
        Dataset::from_columns(columns)
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.n_rows
    }

    /// Whether the dataset has no rows.
    pub fn is_empty(&self) -> bool {
        self.n_rows == 0
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn column(&self, name: &str) -> Result<&Column, DataError> {
        self.columns
            .iter()
            .find(|c| c.name == name)
            .ok_or_else(|| DataError::MissingColumn(name.to_string()))
    }

    /// Row-aligned numeric view of a column.
    pub fn numeric_rows(&self, name: &str) -> Result<Vec<Option<f64>>, DataError> {
        self.column(name)?
            .numeric_rows()
            .ok_or_else(|| DataError::NonNumericColumn(name.to_string()))
    }

    /// Names of the numeric columns, in order.
    pub fn numeric_column_names(&self) -> Vec<&str> {
        self.columns
            .iter()
            .filter(|c| c.kind().is_numeric())
            .map(|c| c.name.as_str())
            .collect()
    }

    /// The first `n` rows.
    pub fn head(&self, n: usize) -> Dataset {
        let take = n.min(self.n_rows);
        Dataset {
            columns: self
                .columns
                .iter()
                .map(|c| Column {
                    name: c.name.clone(),
                    values: c.values[..take].to_vec(),
                })
                .collect(),
            n_rows: take,
        }
    }
}
