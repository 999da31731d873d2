//! Error types for the notos-series crate.

use chrono::NaiveDate;

/// Error type for all fallible operations in the notos-series crate.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SeriesError {
    /// Returned when a series is constructed without observations.
    #[error("series is empty")]
    Empty,

    /// Returned when dates and values differ in length.
    #[error("length mismatch: {dates} dates but {values} values")]
    LengthMismatch {
        /// Number of dates supplied.
        dates: usize,
        /// Number of values supplied.
        values: usize,
    },

    /// Returned when dates are not strictly increasing.
    #[error("dates must be strictly increasing and unique (violated at {date})")]
    NonMonotonicDates {
        /// First date at which the ordering is violated.
        date: NaiveDate,
    },

    /// Returned when no dominant spacing can be found between observations.
    #[error("cannot infer a sampling frequency: {reason}")]
    FrequencyInference {
        /// Description of the problem.
        reason: String,
    },

    /// Returned when a rolling timescale is zero or exceeds the series length.
    #[error("invalid timescale {timescale} for series of length {len}")]
    InvalidTimescale {
        /// The requested timescale in native frequency steps.
        timescale: usize,
        /// Number of observations in the series.
        len: usize,
    },
}
