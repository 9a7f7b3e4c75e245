use std::collections::HashMap;
use std::fmt;

use crate::error::PipelineError;

// ---------------------------------------------------------------------------
// CellValue – a single cell as read from disk
// ---------------------------------------------------------------------------

/// A dynamically-typed cell, used while a file is being read and before the
/// column type is known.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    String(String),
    Integer(i64),
    Float(f64),
    Null,
}

impl CellValue {
    /// Guess the type of a raw text cell.
    pub fn guess(s: &str) -> Self {
        if s.is_empty() {
            return CellValue::Null;
        }
        if let Ok(i) = s.parse::<i64>() {
            return CellValue::Integer(i);
        }
        if let Ok(f) = s.parse::<f64>() {
            return CellValue::Float(f);
        }
        CellValue::String(s.to_string())
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::String(s) => write!(f, "{s}"),
            CellValue::Integer(i) => write!(f, "{i}"),
            CellValue::Float(v) => write!(f, "{}", format_float(*v)),
            CellValue::Null => Ok(()),
        }
    }
}

/// Shortest round-trip representation, always with a fractional part
/// (`4.0`, not `4`). NaN is rendered as an empty cell.
pub fn format_float(v: f64) -> String {
    if v.is_nan() {
        String::new()
    } else {
        format!("{v:?}")
    }
}

// ---------------------------------------------------------------------------
// Column – one typed column
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub enum Column {
    Text(Vec<String>),
    Int(Vec<i64>),
    Float(Vec<f64>),
}

impl Column {
    /// Infer the narrowest column type able to hold every cell.
    ///
    /// * only integers → `Int`
    /// * integers, floats and nulls → `Float` (nulls become NaN)
    /// * anything else → `Text` (nulls become empty strings)
    pub fn from_cells(cells: Vec<CellValue>) -> Self {
        let all_int = cells.iter().all(|c| matches!(c, CellValue::Integer(_)));
        let all_numeric = cells.iter().all(|c| {
            matches!(
                c,
                CellValue::Integer(_) | CellValue::Float(_) | CellValue::Null
            )
        });
        let any_number = cells
            .iter()
            .any(|c| matches!(c, CellValue::Integer(_) | CellValue::Float(_)));

        if all_int && !cells.is_empty() {
            Column::Int(
                cells
                    .into_iter()
                    .filter_map(|c| match c {
                        CellValue::Integer(i) => Some(i),
                        _ => None,
                    })
                    .collect(),
            )
        } else if all_numeric && any_number {
            Column::Float(
                cells
                    .into_iter()
                    .map(|c| match c {
                        CellValue::Integer(i) => i as f64,
                        CellValue::Float(f) => f,
                        _ => f64::NAN,
                    })
                    .collect(),
            )
        } else {
            Column::Text(cells.into_iter().map(|c| c.to_string()).collect())
        }
    }

    /// Infer the column type from raw text cells. Text columns keep the
    /// cells exactly as read.
    pub fn from_text(raw: Vec<String>) -> Self {
        let cells = raw.iter().map(|s| CellValue::guess(s)).collect();
        match Column::from_cells(cells) {
            Column::Text(_) => Column::Text(raw),
            typed => typed,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Column::Text(v) => v.len(),
            Column::Int(v) => v.len(),
            Column::Float(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Column::Text(_) => "text",
            Column::Int(_) => "integer",
            Column::Float(_) => "float",
        }
    }

    /// Render one cell for output.
    pub fn format_cell(&self, row: usize) -> String {
        match self {
            Column::Text(v) => v[row].clone(),
            Column::Int(v) => v[row].to_string(),
            Column::Float(v) => format_float(v[row]),
        }
    }

    /// The cell as a [`CellValue`], e.g. for JSON output.
    pub fn cell(&self, row: usize) -> CellValue {
        match self {
            Column::Text(v) => CellValue::String(v[row].clone()),
            Column::Int(v) => CellValue::Integer(v[row]),
            Column::Float(v) if v[row].is_nan() => CellValue::Null,
            Column::Float(v) => CellValue::Float(v[row]),
        }
    }
}

// ---------------------------------------------------------------------------
// Dataset – the complete table
// ---------------------------------------------------------------------------

/// A table of equally long, named, typed columns.
///
/// Columns keep the order they were added in so that written files list the
/// original columns first and derived ones after them.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    names: Vec<String>,
    columns: Vec<Column>,
    index: HashMap<String, usize>,
    n_rows: usize,
}

impl Dataset {
    /// Build a dataset from `(name, column)` pairs, checking names and lengths.
    pub fn from_columns<I>(columns: I) -> Result<Self, PipelineError>
    where
        I: IntoIterator<Item = (String, Column)>,
    {
        let mut dataset = Dataset::default();
        for (name, column) in columns {
            if dataset.names.is_empty() {
                dataset.n_rows = column.len();
            }
            dataset.add_column(name, column)?;
        }
        Ok(dataset)
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.n_rows
    }

    /// Whether the dataset has no rows.
    pub fn is_empty(&self) -> bool {
        self.n_rows == 0
    }

    /// Column names in insertion order.
    pub fn column_names(&self) -> &[String] {
        &self.names
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Iterate `(name, column)` in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Column)> {
        self.names.iter().map(String::as_str).zip(self.columns.iter())
    }

    pub fn column(&self, name: &str) -> Result<&Column, PipelineError> {
        self.index
            .get(name)
            .map(|&i| &self.columns[i])
            .ok_or_else(|| PipelineError::MissingColumn(name.to_string()))
    }

    pub fn text_column(&self, name: &str) -> Result<&[String], PipelineError> {
        match self.column(name)? {
            Column::Text(v) => Ok(v),
            other => Err(type_error(name, "text", other)),
        }
    }

    pub fn int_column(&self, name: &str) -> Result<&[i64], PipelineError> {
        match self.column(name)? {
            Column::Int(v) => Ok(v),
            other => Err(type_error(name, "integer", other)),
        }
    }

    /// Copy an integer or float column out as `f64` values.
    pub fn numeric_column(&self, name: &str) -> Result<Vec<f64>, PipelineError> {
        match self.column(name)? {
            Column::Int(v) => Ok(v.iter().map(|&i| i as f64).collect()),
            Column::Float(v) => Ok(v.clone()),
            other => Err(type_error(name, "numeric", other)),
        }
    }

    /// Append a new column. Existing columns are never replaced.
    pub fn add_column(
        &mut self,
        name: impl Into<String>,
        column: Column,
    ) -> Result<(), PipelineError> {
        let name = name.into();
        if self.index.contains_key(&name) {
            return Err(PipelineError::DuplicateColumn(name));
        }
        if column.len() != self.n_rows {
            return Err(PipelineError::LengthMismatch {
                column: name,
                expected: self.n_rows,
                found: column.len(),
            });
        }
        self.index.insert(name.clone(), self.columns.len());
        self.names.push(name);
        self.columns.push(column);
        Ok(())
    }
}

fn type_error(name: &str, expected: &'static str, found: &Column) -> PipelineError {
    PipelineError::ColumnType {
        column: name.to_string(),
        expected,
        found: found.type_name(),
    }
}
