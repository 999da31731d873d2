//! Standardized index presets delegating to the engine.

use std::fmt;
use std::str::FromStr;

use notos_dist::Family;
use notos_series::{Aggregation, TimeSeries};
use notos_standardize::{transform, SiConfig, SiMethod, SiResult, StandardizeError};

/// A named standardized index with conventional distribution choices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexKind {
    /// Standardized Precipitation Index.
    Spi,
    /// Standardized Precipitation Evapotranspiration Index.
    Spei,
    /// Standardized Groundwater Index.
    Sgi,
    /// Standardized Streamflow Index.
    Ssfi,
}

impl IndexKind {
    /// Conventional short name, uppercase.
    pub fn name(self) -> &'static str {
        match self {
            IndexKind::Spi => "SPI",
            IndexKind::Spei => "SPEI",
            IndexKind::Sgi => "SGI",
            IndexKind::Ssfi => "SSFI",
        }
    }

    /// Configuration carrying this index's conventional distribution
    /// settings at the given timescale.
    ///
    /// SPI uses a gamma fit with the zero-mass correction (dry periods put
    /// a mass at exactly zero). SPEI fits a normal: its climatic
    /// water-balance input (precipitation minus evapotranspiration) is
    /// regularly negative, which rules out the positive-support families;
    /// pass `Family::LogNormal` through a custom [`SiConfig`] for
    /// strictly positive balances. SGI ranks the sample with normal scores
    /// and aggregates by mean, matching its use on level-type data. SSFI
    /// uses a plain gamma fit.
    pub fn config(self, timescale: usize) -> SiConfig {
        let base = SiConfig::new().with_timescale(timescale);
        match self {
            IndexKind::Spi => base
                .with_method(SiMethod::Parametric(Family::Gamma))
                .with_prob_zero(true),
            IndexKind::Spei => base.with_method(SiMethod::Parametric(Family::Normal)),
            IndexKind::Sgi => base
                .with_method(SiMethod::NormalScores)
                .with_aggregation(Aggregation::Mean),
            IndexKind::Ssfi => base.with_method(SiMethod::Parametric(Family::Gamma)),
        }
    }
}

impl fmt::Display for IndexKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for IndexKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "spi" => Ok(IndexKind::Spi),
            "spei" => Ok(IndexKind::Spei),
            "sgi" => Ok(IndexKind::Sgi),
            "ssfi" => Ok(IndexKind::Ssfi),
            other => Err(format!(
                "unknown index '{other}' (expected spi, spei, sgi, or ssfi)"
            )),
        }
    }
}

/// Standardized Precipitation Index at `timescale` native steps.
///
/// # Errors
///
/// As [`transform`].
pub fn spi(series: &TimeSeries, timescale: usize) -> Result<SiResult, StandardizeError> {
    transform(series, IndexKind::Spi.config(timescale))
}

/// Standardized Precipitation Evapotranspiration Index at `timescale`
/// native steps.
///
/// # Errors
///
/// As [`transform`].
pub fn spei(series: &TimeSeries, timescale: usize) -> Result<SiResult, StandardizeError> {
    transform(series, IndexKind::Spei.config(timescale))
}

/// Standardized Groundwater Index at `timescale` native steps.
///
/// # Errors
///
/// As [`transform`].
pub fn sgi(series: &TimeSeries, timescale: usize) -> Result<SiResult, StandardizeError> {
    transform(series, IndexKind::Sgi.config(timescale))
}

/// Standardized Streamflow Index at `timescale` native steps.
///
/// # Errors
///
/// As [`transform`].
pub fn ssfi(series: &TimeSeries, timescale: usize) -> Result<SiResult, StandardizeError> {
    transform(series, IndexKind::Ssfi.config(timescale))
}
