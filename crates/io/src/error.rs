//! Error types for the notos-io crate.

use notos_series::SeriesError;

/// Error type for all fallible operations in the notos-io crate.
#[derive(Debug, thiserror::Error)]
pub enum IoError {
    /// Propagated filesystem failure.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Propagated CSV framing failure.
    #[error(transparent)]
    Csv(#[from] csv::Error),

    /// Returned when a record cannot be parsed as a dated observation.
    #[error("line {line}: {reason}")]
    Parse {
        /// 1-based record number in the file.
        line: usize,
        /// What failed to parse.
        reason: String,
    },

    /// Propagated series validation failure.
    #[error(transparent)]
    Series(#[from] SeriesError),
}
