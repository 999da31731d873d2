//! Error types for the notos-standardize crate.

use notos_dist::FitError;
use notos_series::SeriesError;

/// Error type for all fallible operations in the notos-standardize crate.
#[derive(Debug, thiserror::Error)]
pub enum StandardizeError {
    /// Returned when the configuration is internally inconsistent.
    #[error("invalid configuration: {reason}")]
    Configuration {
        /// What is wrong with the settings.
        reason: String,
    },

    /// Returned in strict mode when a calendar group is too small to fit.
    #[error("{frequency} group {label} has {n} observations, below the minimum of {min}")]
    InsufficientData {
        /// Ring name of the grouping frequency.
        frequency: &'static str,
        /// 1-based group label (month number or day of year).
        label: u16,
        /// Finite observations available to the group.
        n: usize,
        /// Configured minimum group size.
        min: usize,
    },

    /// Returned when every calendar group failed to fit.
    #[error("no calendar group could be fit ({skipped} groups skipped)")]
    NoFittableGroups {
        /// Number of groups that were skipped or undersampled.
        skipped: usize,
    },

    /// Returned in strict mode when a group's distribution fit fails.
    #[error("fitting {frequency} group {label} failed")]
    Fit {
        /// Ring name of the grouping frequency.
        frequency: &'static str,
        /// 1-based group label (month number or day of year).
        label: u16,
        /// The underlying fit failure.
        #[source]
        source: FitError,
    },

    /// Propagated series validation or aggregation failure.
    #[error(transparent)]
    Series(#[from] SeriesError),
}
