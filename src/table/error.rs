/// Errors that can occur while building or exporting a table
#[derive(Debug, thiserror::Error)]
pub enum TableError {
    /// I/O error writing output
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// CSV serialization error
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    /// JSON serialization/deserialization error
    #[error("JSON serialization error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Arrow error building a record batch
    #[error("Arrow error: {0}")]
    ArrowError(#[from] arrow::error::ArrowError),

    /// Parquet error writing a file
    #[error("Parquet error: {0}")]
    ParquetError(#[from] parquet::errors::ParquetError),

    /// A column does not have the table's row count
    #[error("Column '{column}' has {actual} values, table has {expected} rows")]
    LengthMismatch {
        /// Name of the offending column
        column: String,
        /// Row count of the table
        expected: usize,
        /// Length of the rejected column
        actual: usize,
    },

    /// Legend list is malformed or does not match the plotted columns
    #[error("Invalid legends: {0}")]
    InvalidLegends(String),

    /// Output format could not be determined
    #[error("Unknown output format '{0}'. Valid options: csv, json, parquet")]
    UnknownFormat(String),
}
