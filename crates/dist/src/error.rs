//! Error types for the notos-dist crate.

use crate::family::Family;

/// Error type for all fallible operations in the notos-dist crate.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FitError {
    /// Returned when the (finite) fit sample is empty.
    #[error("fit sample is empty")]
    EmptySample,

    /// Returned when the sample has no spread to fit a distribution to.
    #[error("degenerate sample: {n} observations with fewer than 2 unique values")]
    Degenerate {
        /// Number of observations in the sample.
        n: usize,
    },

    /// Returned when a sample value lies outside the family's support.
    #[error("{family} is undefined at {value} (support violation; consider the zero-mass correction for zeros)")]
    UnsupportedValue {
        /// Family whose support was violated.
        family: Family,
        /// The offending value.
        value: f64,
    },

    /// Returned when the maximum-likelihood iteration does not converge.
    #[error("{family} MLE did not converge within {iterations} iterations")]
    NonConvergent {
        /// Family being fit.
        family: Family,
        /// Iteration bound that was exhausted.
        iterations: usize,
    },

    /// Returned when the estimated parameters are rejected by the
    /// distribution constructor.
    ///
    /// The `message` is a `String` because statrs errors are not `Clone`.
    #[error("{family} construction failed: {message}")]
    Construction {
        /// Family being constructed.
        family: Family,
        /// Description of the failure.
        message: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_empty() {
        assert_eq!(FitError::EmptySample.to_string(), "fit sample is empty");
    }

    #[test]
    fn error_degenerate() {
        let e = FitError::Degenerate { n: 30 };
        assert_eq!(
            e.to_string(),
            "degenerate sample: 30 observations with fewer than 2 unique values"
        );
    }

    #[test]
    fn error_unsupported_value() {
        let e = FitError::UnsupportedValue {
            family: Family::Gamma,
            value: -1.5,
        };
        assert_eq!(
            e.to_string(),
            "gamma is undefined at -1.5 (support violation; consider the zero-mass correction for zeros)"
        );
    }

    #[test]
    fn error_non_convergent() {
        let e = FitError::NonConvergent {
            family: Family::Gamma,
            iterations: 200,
        };
        assert_eq!(
            e.to_string(),
            "gamma MLE did not converge within 200 iterations"
        );
    }

    #[test]
    fn error_is_send_and_sync() {
        fn assert_impl<T: Send + Sync + std::error::Error>() {}
        assert_impl::<FitError>();
    }
}
