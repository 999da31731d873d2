//! Distribution fitting for standardized indices.
//!
//! Provides maximum-likelihood fits of the gamma, log-normal, and normal
//! families, the probability-of-zero correction for samples with a mass at
//! zero, a rank-based normal-scores estimator, and a one-sample
//! Kolmogorov-Smirnov goodness-of-fit test. The central type is
//! [`FittedDistribution`], which owns its fit sample and exposes `cdf` and
//! `ppf` with any corrections already applied.

mod error;
mod family;
mod fit;
mod fitted;
mod ks;
mod params;

pub use error::FitError;
pub use family::Family;
pub use fitted::{FitMethod, FittedDistribution};
pub use params::DistParams;
