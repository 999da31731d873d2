//! Parametric distribution families available for index fitting.

use std::fmt;
use std::str::FromStr;

/// A parametric family the fitter can estimate by maximum likelihood.
///
/// Gamma is the literature default for precipitation-type indices (SPI),
/// log-normal for water-balance indices, normal for roughly symmetric
/// series. Gamma and log-normal have strictly positive support; zeros in
/// the sample require the zero-mass correction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Family {
    /// Two-parameter gamma (shape, scale), support x > 0.
    Gamma,
    /// Log-normal (log-mean, log-sd), support x > 0.
    LogNormal,
    /// Normal (mean, sd), unbounded support.
    Normal,
}

impl Family {
    /// Lowercase family name for errors and logs.
    pub fn name(self) -> &'static str {
        match self {
            Family::Gamma => "gamma",
            Family::LogNormal => "lognormal",
            Family::Normal => "normal",
        }
    }

    /// Whether the family's support is restricted to strictly positive
    /// values.
    pub fn positive_support(self) -> bool {
        matches!(self, Family::Gamma | Family::LogNormal)
    }
}

impl fmt::Display for Family {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Family {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "gamma" => Ok(Family::Gamma),
            "lognormal" | "log-normal" => Ok(Family::LogNormal),
            "normal" => Ok(Family::Normal),
            other => Err(format!(
                "unknown distribution family '{other}' (expected gamma, lognormal, or normal)"
            )),
        }
    }
}
