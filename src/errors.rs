//! Errors
//!
//! Custom error types used throughout the `driftwatch` crate.
use thiserror::Error;

/// Errors that can occur while loading, validating, splitting, or
/// drift-testing tabular data.
#[derive(Debug, Error)]
pub enum DriftwatchError {
    /// Unable to read a table or report from a file.
    #[error("Unable to read {0}")]
    UnableToRead(String),
    /// Unable to write a table or report to a file.
    #[error("Unable to write {0}")]
    UnableToWrite(String),
    /// No candidate delimiter produced a consistent multi-column table.
    #[error("Could not detect a CSV delimiter for {0}")]
    DelimiterDetection(String),
    /// Columns in a dataset must all have the same number of rows.
    #[error("Column {0} has {1} rows, expected {2}")]
    ColumnLengthMismatch(String, usize, usize),
    /// Column names in a dataset must be unique.
    #[error("Duplicate column name {0}")]
    DuplicateColumn(String),
    /// A column required by an operation is absent from the dataset.
    #[error("Column {0} not found in dataset")]
    ColumnNotFound(String),
    /// Columns the schema expects are absent.
    #[error("Missing columns: {0}")]
    MissingColumns(String),
    /// Columns the schema does not know about are present.
    #[error("Unexpected columns: {0}")]
    UnexpectedColumns(String),
    /// A target value outside the allowed set.
    #[error("Invalid target value {0} in column {1}")]
    InvalidTargetValue(String, String),
    /// An empty cell in the source table.
    #[error("Null value in column {0} at row {1}")]
    NullValue(String, usize),
    /// A cell in a numerical column that does not parse as a number.
    #[error("Invalid numeric value {0} in column {1}")]
    InvalidNumericValue(String, String),
    /// Reference and production datasets do not share a column set.
    #[error("Reference and production schemas do not match: {0}")]
    SchemaMismatch(String),
    /// Zero features remain after excluding the target column.
    #[error("No features left to test after excluding the target column")]
    EmptyFeatureSet,
    /// A per-feature test received input on which its statistic is undefined.
    /// First value is the feature name, second describes the condition.
    #[error("Degenerate input for drift test on feature {0}: {1}")]
    DegenerateTestInput(String, String),
    /// First value is the name of the parameter, second is expected, third is what was passed.
    #[error("Invalid parameter value passed for {0}, expected {1} but {2} provided.")]
    InvalidParameter(String, String, String),
}
