//! Configuration for the standardized index engine.

use notos_calendar::Frequency;
use notos_dist::Family;
use notos_series::Aggregation;

use crate::error::StandardizeError;

/// How each calendar group's sample is turned into probabilities.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SiMethod {
    /// Maximum-likelihood fit of a parametric family.
    Parametric(Family),
    /// Rank-based normal scores, no distributional assumption.
    NormalScores,
}

impl Default for SiMethod {
    fn default() -> Self {
        SiMethod::Parametric(Family::Gamma)
    }
}

/// Settings controlling aggregation, grouping, fitting, and error
/// escalation for a standardized index run.
///
/// Built with `with_*` methods from [`SiConfig::new`]; every field has a
/// working default, so `SiConfig::new()` alone describes a 1-step gamma
/// index fit per calendar period.
#[derive(Debug, Clone, PartialEq)]
pub struct SiConfig {
    timescale: usize,
    aggregation: Aggregation,
    fit_frequency: Option<Frequency>,
    fit_window: usize,
    prob_zero: bool,
    method: SiMethod,
    min_group_size: usize,
    strict: bool,
    monthly_fallback: bool,
}

impl Default for SiConfig {
    fn default() -> Self {
        Self {
            timescale: 1,
            aggregation: Aggregation::Sum,
            fit_frequency: None,
            fit_window: 0,
            prob_zero: false,
            method: SiMethod::default(),
            min_group_size: 8,
            strict: false,
            monthly_fallback: true,
        }
    }
}

impl SiConfig {
    /// Creates a configuration with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Rolling window length in native frequency steps. Default 1
    /// (no aggregation).
    pub fn with_timescale(mut self, timescale: usize) -> Self {
        self.timescale = timescale;
        self
    }

    /// Rolling reduction applied over the timescale. Default sum.
    pub fn with_aggregation(mut self, aggregation: Aggregation) -> Self {
        self.aggregation = aggregation;
        self
    }

    /// Calendar grouping frequency for fitting. Default: inferred from the
    /// date spacing of the input.
    pub fn with_fit_frequency(mut self, frequency: Frequency) -> Self {
        self.fit_frequency = Some(frequency);
        self
    }

    /// Width of the circular window of neighboring calendar groups pooled
    /// into each fit sample, in ring steps. 0 and 1 mean the group alone;
    /// even widths round up to the next odd. Default 0.
    pub fn with_fit_window(mut self, window: usize) -> Self {
        self.fit_window = window;
        self
    }

    /// Enables the probability-of-zero correction: the zero fraction is
    /// modeled as an explicit mass and the family is fit to the positive
    /// subsample only. Default off.
    pub fn with_prob_zero(mut self, enabled: bool) -> Self {
        self.prob_zero = enabled;
        self
    }

    /// Probability method. Default: parametric gamma.
    pub fn with_method(mut self, method: SiMethod) -> Self {
        self.method = method;
        self
    }

    /// Minimum finite observations a group needs before it is fit.
    /// Default 8.
    pub fn with_min_group_size(mut self, min: usize) -> Self {
        self.min_group_size = min;
        self
    }

    /// In strict mode any unfittable or undersampled group aborts the run
    /// instead of yielding `NaN` scores. Default off.
    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Whether a failed frequency inference may fall back to monthly
    /// grouping with a warning. Default on.
    pub fn with_monthly_fallback(mut self, enabled: bool) -> Self {
        self.monthly_fallback = enabled;
        self
    }

    /// Returns the rolling window length.
    pub fn timescale(&self) -> usize {
        self.timescale
    }

    /// Returns the rolling reduction.
    pub fn aggregation(&self) -> Aggregation {
        self.aggregation
    }

    /// Returns the declared fit frequency, if any.
    pub fn fit_frequency(&self) -> Option<Frequency> {
        self.fit_frequency
    }

    /// Returns the fit window width in ring steps.
    pub fn fit_window(&self) -> usize {
        self.fit_window
    }

    /// Returns whether the probability-of-zero correction is enabled.
    pub fn prob_zero(&self) -> bool {
        self.prob_zero
    }

    /// Returns the probability method.
    pub fn method(&self) -> SiMethod {
        self.method
    }

    /// Returns the minimum group size.
    pub fn min_group_size(&self) -> usize {
        self.min_group_size
    }

    /// Returns whether strict mode is enabled.
    pub fn strict(&self) -> bool {
        self.strict
    }

    /// Returns whether the monthly inference fallback is enabled.
    pub fn monthly_fallback(&self) -> bool {
        self.monthly_fallback
    }

    /// Checks settings for internal consistency.
    ///
    /// # Errors
    ///
    /// Returns [`StandardizeError::Configuration`] for a zero timescale, a
    /// minimum group size below 2 (no distribution fits one point), or the
    /// zero-mass correction combined with normal scores (ranks already
    /// place zeros).
    pub fn validate(&self) -> Result<(), StandardizeError> {
        if self.timescale == 0 {
            return Err(StandardizeError::Configuration {
                reason: "timescale must be at least 1".to_string(),
            });
        }
        if self.min_group_size < 2 {
            return Err(StandardizeError::Configuration {
                reason: format!(
                    "min_group_size must be at least 2, got {}",
                    self.min_group_size
                ),
            });
        }
        if self.prob_zero && self.method == SiMethod::NormalScores {
            return Err(StandardizeError::Configuration {
                reason: "the zero-mass correction does not apply to normal scores".to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = SiConfig::new();
        assert_eq!(config.timescale(), 1);
        assert_eq!(config.aggregation(), Aggregation::Sum);
        assert!(config.fit_frequency().is_none());
        assert_eq!(config.fit_window(), 0);
        assert!(!config.prob_zero());
        assert_eq!(config.method(), SiMethod::Parametric(Family::Gamma));
        assert_eq!(config.min_group_size(), 8);
        assert!(!config.strict());
        assert!(config.monthly_fallback());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn builder_chain() {
        let config = SiConfig::new()
            .with_timescale(3)
            .with_aggregation(Aggregation::Mean)
            .with_fit_frequency(Frequency::Daily)
            .with_fit_window(31)
            .with_prob_zero(true)
            .with_min_group_size(10)
            .with_strict(true)
            .with_monthly_fallback(false);
        assert_eq!(config.timescale(), 3);
        assert_eq!(config.aggregation(), Aggregation::Mean);
        assert_eq!(config.fit_frequency(), Some(Frequency::Daily));
        assert_eq!(config.fit_window(), 31);
        assert!(config.prob_zero());
        assert_eq!(config.min_group_size(), 10);
        assert!(config.strict());
        assert!(!config.monthly_fallback());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn validate_rejects_zero_timescale() {
        let err = SiConfig::new().with_timescale(0).validate().unwrap_err();
        assert!(err.to_string().contains("timescale"));
    }

    #[test]
    fn validate_rejects_tiny_group_size() {
        let err = SiConfig::new()
            .with_min_group_size(1)
            .validate()
            .unwrap_err();
        assert!(err.to_string().contains("min_group_size"));
    }

    #[test]
    fn validate_rejects_prob_zero_with_normal_scores() {
        let err = SiConfig::new()
            .with_method(SiMethod::NormalScores)
            .with_prob_zero(true)
            .validate()
            .unwrap_err();
        assert!(err.to_string().contains("normal scores"));
    }
}
