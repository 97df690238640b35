/// Errors that can occur while scanning a log or selecting a segment
#[derive(Debug, thiserror::Error)]
pub enum SegmentError {
    /// I/O error reading the log
    #[error("Failed to read log: {0}")]
    IoError(#[from] std::io::Error),

    /// The requested column list is empty or unusable
    #[error("Malformed column request: {0}")]
    MalformedColumnRequest(String),

    /// The scan completed without emitting a single segment
    #[error("No valid data segments found")]
    NoSegmentsFound,

    /// The instance selector is not `first`, `last` or a 1-based number
    #[error("Invalid instance specifier '{0}'. Use 'first', 'last', or an integer")]
    InvalidSelector(String),

    /// The resolved instance index lies outside the stored segments
    #[error("Instance number out of range: resolved index {index}, {available} segment(s) available")]
    SelectorOutOfRange {
        /// Zero-based index the selector resolved to
        index: i64,
        /// Number of segments found in the log
        available: usize,
    },
}
