use std::path::PathBuf;

use crate::ast::ComparisonOp;
use crate::data_type::DataType;

/// The query text could not be matched against the grammar.
///
/// `position` is a character offset into the query; `fragment` is the
/// remaining input starting at that offset.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error(
    "syntax error at position {position}: expected {expected}, found {found} (near {fragment:?})"
)]
pub struct SyntaxError {
    pub expected: String,
    pub found: String,
    pub fragment: String,
    pub position: usize,
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Syntax(#[from] SyntaxError),

    #[error("table {name:?} has not been loaded")]
    TableNotFound { name: String },

    #[error("column {name:?} does not exist in table {table:?}")]
    ColumnNotFound { name: String, table: String },

    #[error("column {name:?} appears more than once in the header of table {table:?}")]
    DuplicateColumn { name: String, table: String },

    #[error("data row {row_index} has {actual_fields} fields, expected {expected_fields}")]
    MalformedRow {
        expected_fields: usize,
        actual_fields: usize,
        row_index: usize,
    },

    #[error("type mismatch: cannot evaluate {left} {operator} {right}")]
    TypeMismatch {
        left: DataType,
        right: DataType,
        operator: ComparisonOp,
    },

    #[error("file not found: {}", .path.display())]
    SourceNotFound { path: PathBuf },

    #[error("file {} must be a CSV file", .path.display())]
    UnsupportedSource { path: PathBuf },

    #[error("file {} is empty or has no data rows", .path.display())]
    EmptySource { path: PathBuf },

    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Csv(#[from] csv::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
