//! Error types for the notos-index crate.

use notos_series::SeriesError;

/// Error type for the anomaly and climate-extreme indices in this crate.
/// The standardized presets report [`notos_standardize::StandardizeError`]
/// instead, since they delegate to the engine.
#[derive(Debug, thiserror::Error)]
pub enum IndexError {
    /// Returned when a series has too few finite observations for the
    /// index's scaling to be defined.
    #[error("index needs at least {min} finite observations, got {n}")]
    TooShort {
        /// Finite observations available.
        n: usize,
        /// Minimum the index requires.
        min: usize,
    },

    /// Returned when a series has no spread to scale anomalies against.
    #[error("index is undefined for a series without spread")]
    Degenerate,

    /// Returned when an index defined on daily data receives another
    /// sampling frequency.
    #[error("climate extreme indices require daily sampling, got {frequency}")]
    WrongFrequency {
        /// Name of the offending frequency.
        frequency: &'static str,
    },

    /// Propagated series validation or inference failure.
    #[error(transparent)]
    Series(#[from] SeriesError),
}
