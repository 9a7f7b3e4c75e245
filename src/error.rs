use std::num::ParseIntError;

use thiserror::Error;

// ---------------------------------------------------------------------------
// Pipeline errors
// ---------------------------------------------------------------------------

/// Everything that can abort a preprocessing run.
///
/// All variants are fatal: the pipeline stops at the first one and nothing is
/// written to disk.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("column '{0}' not found")]
    MissingColumn(String),

    #[error("column '{column}' holds {found} values, expected {expected}")]
    ColumnType {
        column: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error("column '{0}' already exists")]
    DuplicateColumn(String),

    #[error("column '{column}' has {found} rows but the dataset has {expected}")]
    LengthMismatch {
        column: String,
        expected: usize,
        found: usize,
    },

    #[error("column '{0}' has no rows")]
    EmptyColumn(String),

    #[error("column '{column}', row {row}: {kind}")]
    Parse {
        column: String,
        row: usize,
        #[source]
        kind: ParseErrorKind,
    },

    #[error("column '{column}', row {row}: {found} values, expected {expected}")]
    ShapeMismatch {
        column: String,
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("column '{0}' encodes no values after its code")]
    EmptyGroup(String),

    #[error("column '{column}': {reason}")]
    DegenerateStatistics {
        column: String,
        reason: &'static str,
    },
}

/// Why a single encoded cell could not be parsed.
#[derive(Debug, Error)]
pub enum ParseErrorKind {
    #[error("empty value")]
    Empty,

    #[error("code '{found}' differs from '{expected}' of the first row")]
    CodeMismatch { expected: String, found: String },

    #[error("'{token}' is not an integer")]
    InvalidInteger {
        token: String,
        #[source]
        source: ParseIntError,
    },
}
