//! The fit-then-transform engine behind every standardized index.

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use statrs::distribution::{ContinuousCDF, Normal};
use tracing::{debug, warn};

use notos_calendar::{window_members, Frequency, GroupKey};
use notos_dist::FittedDistribution;
use notos_series::TimeSeries;

use crate::config::{SiConfig, SiMethod};
use crate::error::StandardizeError;
use crate::result::{Diagnostics, SiResult};

/// Cumulative probabilities are clipped into `(EPS, 1 - EPS)` before the
/// inverse-normal map, bounding z-scores at roughly +/- 6.
const EPS: f64 = 1e-9;

/// A fitted standardization: per-group distributions over an aggregated
/// series, ready to map values to z-scores.
///
/// Splitting [`SiEngine::fit`] from [`SiEngine::standardize`] keeps the
/// fitted state inspectable: callers can examine parameters or run
/// goodness-of-fit tests before (or instead of) producing scores.
#[derive(Debug, Clone)]
pub struct SiEngine {
    raw_dates: Vec<NaiveDate>,
    raw_frequency: Option<Frequency>,
    aggregated: TimeSeries,
    keys: Vec<GroupKey>,
    fitted: BTreeMap<GroupKey, FittedDistribution>,
    fit_frequency: Frequency,
    timescale: usize,
    diagnostics: Diagnostics,
}

impl SiEngine {
    /// Aggregates `series` over the configured timescale, groups the
    /// aggregates by calendar period, and fits a distribution per group.
    ///
    /// Outside strict mode a group that is undersampled or fails to fit is
    /// recorded in the diagnostics and its positions score `NaN`; strict
    /// mode turns both into errors.
    ///
    /// # Errors
    ///
    /// Returns [`StandardizeError::Configuration`] for inconsistent
    /// settings or an unresolvable fit frequency with the monthly fallback
    /// disabled, [`StandardizeError::Series`] for aggregation failures,
    /// [`StandardizeError::NoFittableGroups`] when not a single group could
    /// be fit, and in strict mode
    /// [`StandardizeError::InsufficientData`] or [`StandardizeError::Fit`].
    pub fn fit(series: &TimeSeries, config: SiConfig) -> Result<Self, StandardizeError> {
        config.validate()?;
        let aggregated = series.rolling(config.timescale(), config.aggregation())?;

        let mut diagnostics = Diagnostics::default();
        let fit_frequency = match config.fit_frequency() {
            Some(frequency) => frequency,
            None => match aggregated.resolve_frequency() {
                Ok(frequency) => frequency,
                Err(e) if config.monthly_fallback() => {
                    warn!("frequency inference failed ({e}), falling back to monthly grouping");
                    diagnostics.frequency_fallback = true;
                    Frequency::Monthly
                }
                // With the fallback disabled an unresolvable frequency is a
                // settings problem, not a series defect.
                Err(e) => {
                    return Err(StandardizeError::Configuration {
                        reason: format!(
                            "cannot resolve a fit frequency ({e}) and the monthly fallback is disabled"
                        ),
                    });
                }
            },
        };
        debug!(
            frequency = fit_frequency.name(),
            timescale = config.timescale(),
            "grouping aggregated series"
        );

        let keys: Vec<GroupKey> = aggregated
            .dates()
            .iter()
            .map(|&d| GroupKey::from_date(d, fit_frequency))
            .collect();
        let distinct: BTreeSet<GroupKey> = keys.iter().copied().collect();

        let mut fitted = BTreeMap::new();
        for key in distinct {
            let members = window_members(&keys, key, config.fit_window());
            let sample: Vec<f64> = members
                .iter()
                .map(|&i| aggregated.values()[i])
                .filter(|v| v.is_finite())
                .collect();

            if sample.len() < config.min_group_size() {
                if config.strict() {
                    return Err(StandardizeError::InsufficientData {
                        frequency: fit_frequency.name(),
                        label: key.label(),
                        n: sample.len(),
                        min: config.min_group_size(),
                    });
                }
                warn!(
                    frequency = fit_frequency.name(),
                    label = key.label(),
                    n = sample.len(),
                    min = config.min_group_size(),
                    "group undersampled, scores will be NaN"
                );
                diagnostics.undersampled.push(key);
                continue;
            }

            let fit = match config.method() {
                SiMethod::Parametric(family) if config.prob_zero() => {
                    FittedDistribution::fit_zero_corrected(&sample, family)
                }
                SiMethod::Parametric(family) => FittedDistribution::fit(&sample, family),
                SiMethod::NormalScores => FittedDistribution::normal_scores(&sample),
            };
            match fit {
                Ok(dist) => {
                    debug!(
                        frequency = fit_frequency.name(),
                        label = key.label(),
                        n = sample.len(),
                        "group fit"
                    );
                    fitted.insert(key, dist);
                }
                Err(e) if config.strict() => {
                    return Err(StandardizeError::Fit {
                        frequency: fit_frequency.name(),
                        label: key.label(),
                        source: e,
                    });
                }
                Err(e) => {
                    warn!(
                        frequency = fit_frequency.name(),
                        label = key.label(),
                        "group fit failed ({e}), scores will be NaN"
                    );
                    diagnostics.skipped.push((key, e.to_string()));
                }
            }
        }

        if fitted.is_empty() {
            return Err(StandardizeError::NoFittableGroups {
                skipped: diagnostics.skipped.len() + diagnostics.undersampled.len(),
            });
        }

        Ok(Self {
            raw_dates: series.dates().to_vec(),
            raw_frequency: series.frequency(),
            aggregated,
            keys,
            fitted,
            fit_frequency,
            timescale: config.timescale(),
            diagnostics,
        })
    }

    /// Maps every aggregate through its group's CDF and the inverse
    /// standard normal, yielding z-scores aligned to the input dates.
    ///
    /// Positions without a complete rolling window, with a `NaN`
    /// aggregate, or in a group that was not fit score `NaN`.
    pub fn standardize(&self) -> SiResult {
        let normal = std_normal();
        let mut scores = vec![f64::NAN; self.raw_dates.len()];
        let mut n_clipped = 0usize;

        let offset = self.timescale - 1;
        for (i, &value) in self.aggregated.values().iter().enumerate() {
            if !value.is_finite() {
                continue;
            }
            let Some(dist) = self.fitted.get(&self.keys[i]) else {
                continue;
            };
            let p = dist.cdf(value);
            let clipped = p.clamp(EPS, 1.0 - EPS);
            if clipped != p {
                n_clipped += 1;
            }
            scores[offset + i] = normal.inverse_cdf(clipped);
        }
        if n_clipped > 0 {
            warn!(n_clipped, "probabilities clipped before the z-score map");
        }

        let scores = match self.raw_frequency {
            Some(frequency) => {
                TimeSeries::with_frequency(self.raw_dates.clone(), scores, frequency)
            }
            None => TimeSeries::new(self.raw_dates.clone(), scores),
        }
        .expect("score dates mirror an already validated series");

        let mut diagnostics = self.diagnostics.clone();
        diagnostics.n_clipped = n_clipped;
        SiResult {
            scores,
            diagnostics,
        }
    }

    /// The fitted distribution of each calendar group, keyed in ring order.
    pub fn fitted(&self) -> &BTreeMap<GroupKey, FittedDistribution> {
        &self.fitted
    }

    /// The aggregated series the distributions were fit on.
    pub fn aggregated(&self) -> &TimeSeries {
        &self.aggregated
    }

    /// The calendar frequency used for grouping.
    pub fn fit_frequency(&self) -> Frequency {
        self.fit_frequency
    }

    /// Fit-stage diagnostics (clip counts are added by
    /// [`SiEngine::standardize`]).
    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    /// Kolmogorov-Smirnov p-value of `key`'s fit sample against its fitted
    /// distribution, `None` if the group was not fit.
    pub fn ks_test(&self, key: GroupKey) -> Option<f64> {
        self.fitted.get(&key).map(FittedDistribution::ks_test)
    }
}

/// Fits and standardizes in one call, for callers that do not need to
/// inspect the fitted state.
///
/// # Errors
///
/// As [`SiEngine::fit`].
pub fn transform(series: &TimeSeries, config: SiConfig) -> Result<SiResult, StandardizeError> {
    Ok(SiEngine::fit(series, config)?.standardize())
}

fn std_normal() -> Normal {
    Normal::new(0.0, 1.0).expect("valid constant parameters")
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    /// Monthly series with a deterministic seasonal cycle plus a slow
    /// drift, spanning `years` years.
    fn seasonal_monthly(years: usize) -> TimeSeries {
        let n = years * 12;
        let dates: Vec<NaiveDate> = (0..n)
            .map(|i| date(1990 + (i / 12) as i32, (i % 12) as u32 + 1, 1))
            .collect();
        let values: Vec<f64> = (0..n)
            .map(|i| {
                let month = (i % 12) as f64;
                let season = 40.0 + 25.0 * (month / 12.0 * std::f64::consts::TAU).sin();
                season + (i % 7) as f64 * 3.0
            })
            .collect();
        TimeSeries::with_frequency(dates, values, Frequency::Monthly).unwrap()
    }

    #[test]
    fn fit_produces_one_distribution_per_month() {
        let engine = SiEngine::fit(&seasonal_monthly(30), SiConfig::new()).unwrap();
        assert_eq!(engine.fitted().len(), 12);
        assert_eq!(engine.fit_frequency(), Frequency::Monthly);
        assert!(engine.diagnostics().skipped().is_empty());
    }

    #[test]
    fn scores_are_aligned_to_input_dates() {
        let series = seasonal_monthly(30);
        let config = SiConfig::new().with_timescale(3);
        let result = transform(&series, config).unwrap();

        let scores = result.scores();
        assert_eq!(scores.dates(), series.dates());
        // The first two positions have no complete 3-month window.
        assert!(scores.values()[0].is_nan());
        assert!(scores.values()[1].is_nan());
        assert!(scores.values()[2].is_finite());
    }

    #[test]
    fn scores_of_a_fitted_group_are_roughly_standard() {
        let result = transform(&seasonal_monthly(40), SiConfig::new()).unwrap();
        let finite: Vec<f64> = result
            .scores()
            .values()
            .iter()
            .copied()
            .filter(|v| v.is_finite())
            .collect();
        let mean = finite.iter().sum::<f64>() / finite.len() as f64;
        assert!(mean.abs() < 0.15, "score mean {mean} far from 0");
        assert!(finite.iter().all(|z| z.abs() < 6.5));
    }

    #[test]
    fn normal_scores_method_ranks_within_month() {
        let series = seasonal_monthly(20);
        let config = SiConfig::new().with_method(SiMethod::NormalScores);
        let engine = SiEngine::fit(&series, config).unwrap();
        let result = engine.standardize();

        // January values repeat a 7-step cycle; the largest January must
        // get the largest January score.
        let jan_scores: Vec<f64> = result.scores().values().iter().copied().step_by(12).collect();
        let jan_values: Vec<f64> = series.values().iter().copied().step_by(12).collect();
        let max_v = jan_values
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.partial_cmp(b.1).unwrap())
            .unwrap()
            .0;
        let max_s = jan_scores
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.partial_cmp(b.1).unwrap())
            .unwrap()
            .0;
        assert_eq!(jan_values[max_v], jan_values[max_s]);
    }

    #[test]
    fn nan_aggregate_scores_nan_without_poisoning_the_fit() {
        let mut values: Vec<f64> = seasonal_monthly(30).values().to_vec();
        values[25] = f64::NAN;
        let dates = seasonal_monthly(30).dates().to_vec();
        let series = TimeSeries::with_frequency(dates, values, Frequency::Monthly).unwrap();

        let result = transform(&series, SiConfig::new()).unwrap();
        assert!(result.scores().values()[25].is_nan());
        // Every other position of the same month still scores.
        assert!(result.scores().values()[13].is_finite());
        assert!(result.scores().values()[37].is_finite());
    }

    #[test]
    fn undersampled_group_skipped_outside_strict_mode() {
        // 5 years of data: 5 observations per month, below the minimum.
        let series = seasonal_monthly(5);
        let config = SiConfig::new().with_min_group_size(8);
        assert!(matches!(
            SiEngine::fit(&series, config),
            Err(StandardizeError::NoFittableGroups { skipped: 12 })
        ));

        // With a window of 3 each group pools 15 observations and fits.
        let config = SiConfig::new().with_min_group_size(8).with_fit_window(3);
        let engine = SiEngine::fit(&series, config).unwrap();
        assert_eq!(engine.fitted().len(), 12);
    }

    #[test]
    fn strict_mode_escalates_undersampling() {
        let series = seasonal_monthly(5);
        let config = SiConfig::new().with_strict(true);
        assert!(matches!(
            SiEngine::fit(&series, config),
            Err(StandardizeError::InsufficientData { n: 5, min: 8, .. })
        ));
    }

    #[test]
    fn zero_heavy_month_works_with_prob_zero() {
        // A dry season: January is zero in half the years.
        let base = seasonal_monthly(30);
        let mut values = base.values().to_vec();
        for year in 0..30 {
            if year % 2 == 0 {
                values[year * 12] = 0.0;
            }
        }
        let series =
            TimeSeries::with_frequency(base.dates().to_vec(), values, Frequency::Monthly).unwrap();

        let gamma_only = SiConfig::new();
        let engine = SiEngine::fit(&series, gamma_only).unwrap();
        // Without the correction January cannot be fit by gamma.
        assert_eq!(engine.diagnostics().skipped().len(), 1);

        let corrected = SiConfig::new().with_prob_zero(true);
        let engine = SiEngine::fit(&series, corrected).unwrap();
        assert_eq!(engine.fitted().len(), 12);
        let jan = GroupKey::from_month(1).unwrap();
        assert_relative_eq!(engine.fitted()[&jan].p0().unwrap(), 0.5);

        // Zero Januaries map to the same below-median score.
        let result = engine.standardize();
        let z0 = result.scores().values()[0];
        let z2 = result.scores().values()[24];
        assert_relative_eq!(z0, z2);
        assert!(z0 < 0.0);
    }

    #[test]
    fn declared_fit_frequency_wins() {
        let series = seasonal_monthly(30);
        let config = SiConfig::new().with_fit_frequency(Frequency::Monthly);
        let engine = SiEngine::fit(&series, config).unwrap();
        assert_eq!(engine.fit_frequency(), Frequency::Monthly);
        assert!(!engine.diagnostics().frequency_fallback());
    }

    #[test]
    fn unrecognizable_spacing_falls_back_to_monthly() {
        // Ten years of quarterly observations: inference fails, fallback
        // groups by month and fits the 4 distinct months.
        let dates: Vec<NaiveDate> = (0..40)
            .map(|i| date(1990 + (i / 4) as i32, (i % 4) as u32 * 3 + 1, 1))
            .collect();
        let values: Vec<f64> = (0..40).map(|i| 10.0 + (i % 9) as f64).collect();
        let series = TimeSeries::new(dates, values).unwrap();

        let engine = SiEngine::fit(&series, SiConfig::new()).unwrap();
        assert!(engine.diagnostics().frequency_fallback());
        assert_eq!(engine.fit_frequency(), Frequency::Monthly);
        assert_eq!(engine.fitted().len(), 4);

        let no_fallback = SiConfig::new().with_monthly_fallback(false);
        match SiEngine::fit(&series, no_fallback) {
            Err(StandardizeError::Configuration { reason }) => {
                assert!(reason.contains("monthly fallback is disabled"), "{reason}");
            }
            other => panic!("expected a configuration error, got {other:?}"),
        }
    }

    #[test]
    fn standardize_is_deterministic() {
        let series = seasonal_monthly(30);
        let a = transform(&series, SiConfig::new().with_timescale(6)).unwrap();
        let b = transform(&series, SiConfig::new().with_timescale(6)).unwrap();
        for (x, y) in a.scores().values().iter().zip(b.scores().values()) {
            assert!(x == y || (x.is_nan() && y.is_nan()));
        }
    }

    #[test]
    fn engine_exposes_ks_per_group() {
        let engine = SiEngine::fit(&seasonal_monthly(30), SiConfig::new()).unwrap();
        let jun = GroupKey::from_month(6).unwrap();
        let p = engine.ks_test(jun).unwrap();
        assert!((0.0..=1.0).contains(&p));
        // Key 13 does not exist on the monthly ring, but an unfit key does.
        let unfit = GroupKey::new(100, Frequency::Daily).unwrap();
        assert!(engine.ks_test(unfit).is_none());
    }

    #[test]
    fn monotone_within_group() {
        // Within one calendar month, a larger aggregate never gets a
        // smaller score.
        let series = seasonal_monthly(30);
        let engine = SiEngine::fit(&series, SiConfig::new()).unwrap();
        let result = engine.standardize();

        for month in 0..12 {
            let mut pairs: Vec<(f64, f64)> = series
                .values()
                .iter()
                .zip(result.scores().values())
                .skip(month)
                .step_by(12)
                .map(|(&v, &z)| (v, z))
                .collect();
            pairs.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap());
            for w in pairs.windows(2) {
                assert!(w[1].1 >= w[0].1 - 1e-12);
            }
        }
    }
}
