//! Fitted distributions: parametric MLE fits and the normal-scores
//! estimator behind non-parametric indices.

use statrs::distribution::{ContinuousCDF, Gamma, LogNormal, Normal};

use crate::error::FitError;
use crate::family::Family;
use crate::fit::{count_unique, mle};
use crate::ks;
use crate::params::DistParams;

/// How a [`FittedDistribution`] maps values to probabilities.
#[derive(Debug, Clone, PartialEq)]
pub enum FitMethod {
    /// Parametric family with MLE parameters and an optional empirical
    /// zero-mass fraction.
    Parametric {
        /// The fitted family.
        family: Family,
        /// Estimated (shape, loc, scale).
        params: DistParams,
        /// Fraction of exactly-zero observations, when the zero-mass
        /// correction is active.
        p0: Option<f64>,
    },
    /// Rank-based normal-scores transform: probabilities come straight
    /// from plotting positions `(rank - 0.5) / n` on the sorted sample.
    NormalScores,
}

/// statrs distribution carried alongside the parameter record so cdf/ppf
/// never have to re-validate parameters.
#[derive(Debug, Clone)]
enum Backing {
    Gamma(Gamma),
    LogNormal(LogNormal),
    Normal(Normal),
    Empirical,
}

/// A probability distribution fit to one calendar group's sample.
///
/// Owns the (sorted, finite) sample it was fit on; parameters are fixed at
/// construction and never mutated; re-fitting means building a new
/// instance.
#[derive(Debug, Clone)]
pub struct FittedDistribution {
    method: FitMethod,
    backing: Backing,
    sample: Vec<f64>,
}

/// Non-finite values never enter a fit sample.
fn clean_sorted(sample: &[f64]) -> Vec<f64> {
    let mut data: Vec<f64> = sample.iter().copied().filter(|v| v.is_finite()).collect();
    data.sort_by(|a, b| a.partial_cmp(b).expect("finite values are ordered"));
    data
}

fn build_backing(family: Family, params: &DistParams) -> Result<Backing, FitError> {
    let construction = |message: String| FitError::Construction { family, message };
    match family {
        Family::Gamma => {
            let shape = params.shape().expect("gamma has a shape parameter");
            // statrs parameterises Gamma by (shape, rate), rate = 1/scale.
            Gamma::new(shape, 1.0 / params.scale())
                .map(Backing::Gamma)
                .map_err(|e| construction(e.to_string()))
        }
        Family::LogNormal => {
            let sigma = params.shape().expect("lognormal has a shape parameter");
            LogNormal::new(params.scale().ln(), sigma)
                .map(Backing::LogNormal)
                .map_err(|e| construction(e.to_string()))
        }
        Family::Normal => Normal::new(params.loc(), params.scale())
            .map(Backing::Normal)
            .map_err(|e| construction(e.to_string())),
    }
}

impl FittedDistribution {
    /// Fits `family` to `sample` by maximum likelihood.
    ///
    /// # Errors
    ///
    /// Returns [`FitError::EmptySample`] when no finite values remain,
    /// [`FitError::Degenerate`] for an all-identical sample,
    /// [`FitError::UnsupportedValue`] when a value lies outside the
    /// family's support (zero or negative for gamma/log-normal), and
    /// [`FitError::NonConvergent`] when the MLE iteration fails.
    pub fn fit(sample: &[f64], family: Family) -> Result<Self, FitError> {
        let data = clean_sorted(sample);
        validate_sample(&data)?;
        if family.positive_support() {
            if let Some(&bad) = data.iter().find(|&&x| x <= 0.0) {
                return Err(FitError::UnsupportedValue { family, value: bad });
            }
        }
        let params = mle(&data, family)?;
        let backing = build_backing(family, &params)?;
        Ok(Self {
            method: FitMethod::Parametric {
                family,
                params,
                p0: None,
            },
            backing,
            sample: data,
        })
    }

    /// Fits `family` with the probability-of-zero correction.
    ///
    /// The zero fraction `p0` is taken empirically from the sample, the
    /// family is fit only to the strictly positive subsample, and the
    /// effective CDF becomes `p0 + (1 - p0) * F(x)` for `x > 0` with
    /// `p0 / 2` at exactly zero (continuity correction at the mass point).
    ///
    /// # Errors
    ///
    /// As [`FittedDistribution::fit`]; the correction assumes non-negative
    /// data, so any negative value is rejected regardless of family, and a
    /// positive subsample without spread is degenerate.
    pub fn fit_zero_corrected(sample: &[f64], family: Family) -> Result<Self, FitError> {
        let data = clean_sorted(sample);
        validate_sample(&data)?;
        if let Some(&bad) = data.iter().find(|&&x| x < 0.0) {
            return Err(FitError::UnsupportedValue { family, value: bad });
        }
        let n_zero = data.iter().filter(|&&x| x == 0.0).count();
        let p0 = n_zero as f64 / data.len() as f64;
        let positive: Vec<f64> = data.iter().copied().filter(|&x| x > 0.0).collect();
        if count_unique(&positive) < 2 {
            return Err(FitError::Degenerate { n: positive.len() });
        }
        let params = mle(&positive, family)?;
        let backing = build_backing(family, &params)?;
        Ok(Self {
            method: FitMethod::Parametric {
                family,
                params,
                p0: Some(p0),
            },
            backing,
            sample: data,
        })
    }

    /// Builds the non-parametric normal-scores estimator over `sample`.
    ///
    /// # Errors
    ///
    /// Returns [`FitError::EmptySample`] or [`FitError::Degenerate`].
    pub fn normal_scores(sample: &[f64]) -> Result<Self, FitError> {
        let data = clean_sorted(sample);
        validate_sample(&data)?;
        Ok(Self {
            method: FitMethod::NormalScores,
            backing: Backing::Empirical,
            sample: data,
        })
    }

    /// Cumulative probability of `x` under the fitted distribution,
    /// including the zero-mass correction when active.
    pub fn cdf(&self, x: f64) -> f64 {
        let base = match &self.backing {
            Backing::Gamma(d) => parametric_cdf(d, x),
            Backing::LogNormal(d) => parametric_cdf(d, x),
            Backing::Normal(d) => d.cdf(x),
            Backing::Empirical => return empirical_cdf(&self.sample, x),
        };
        match self.p0() {
            None => base,
            Some(p0) => {
                if x < 0.0 {
                    0.0
                } else if x == 0.0 {
                    p0 / 2.0
                } else {
                    p0 + (1.0 - p0) * base
                }
            }
        }
    }

    /// Quantile (inverse CDF) for probability `p`, undoing the zero-mass
    /// correction when active. Returns `NaN` for `p` outside `[0, 1]`.
    pub fn ppf(&self, p: f64) -> f64 {
        if !(0.0..=1.0).contains(&p) {
            return f64::NAN;
        }
        let invert = |p: f64| match &self.backing {
            Backing::Gamma(d) => d.inverse_cdf(p),
            Backing::LogNormal(d) => d.inverse_cdf(p),
            Backing::Normal(d) => d.inverse_cdf(p),
            Backing::Empirical => unreachable!("empirical handled separately"),
        };
        match &self.backing {
            Backing::Empirical => empirical_ppf(&self.sample, p),
            _ => match self.p0() {
                None => invert(p),
                // Probabilities inside the zero mass map back to the mass
                // point itself.
                Some(p0) if p <= p0 => 0.0,
                Some(p0) => invert((p - p0) / (1.0 - p0)),
            },
        }
    }

    /// Two-sided Kolmogorov-Smirnov p-value of the fit sample against the
    /// fitted CDF. Null hypothesis: the sample is drawn from the fitted
    /// distribution.
    pub fn ks_test(&self) -> f64 {
        let d = ks::ks_statistic(&self.sample, |x| self.cdf(x));
        ks::ks_pvalue(d, self.sample.len())
    }

    /// How this distribution maps values to probabilities.
    pub fn method(&self) -> &FitMethod {
        &self.method
    }

    /// The fitted family, `None` for the normal-scores estimator.
    pub fn family(&self) -> Option<Family> {
        match self.method {
            FitMethod::Parametric { family, .. } => Some(family),
            FitMethod::NormalScores => None,
        }
    }

    /// The fitted parameters, `None` for the normal-scores estimator.
    pub fn params(&self) -> Option<DistParams> {
        match self.method {
            FitMethod::Parametric { params, .. } => Some(params),
            FitMethod::NormalScores => None,
        }
    }

    /// Empirical zero fraction, when the zero-mass correction is active.
    pub fn p0(&self) -> Option<f64> {
        match self.method {
            FitMethod::Parametric { p0, .. } => p0,
            FitMethod::NormalScores => None,
        }
    }

    /// The sorted finite sample the distribution was fit on.
    pub fn sample(&self) -> &[f64] {
        &self.sample
    }
}

fn validate_sample(data: &[f64]) -> Result<(), FitError> {
    if data.is_empty() {
        return Err(FitError::EmptySample);
    }
    if count_unique(data) < 2 {
        return Err(FitError::Degenerate { n: data.len() });
    }
    Ok(())
}

/// Positive-support CDFs are zero at and below the origin; statrs agrees
/// but this keeps the boundary explicit.
fn parametric_cdf<D: ContinuousCDF<f64, f64>>(d: &D, x: f64) -> f64 {
    if x <= 0.0 {
        0.0
    } else {
        d.cdf(x)
    }
}

/// Plotting-position probability of `x` against a sorted sample:
/// `(rank - 0.5) / n` with midranks for ties.
fn empirical_cdf(sorted: &[f64], x: f64) -> f64 {
    let n = sorted.len() as f64;
    let below = sorted.partition_point(|&v| v < x);
    let ties = sorted[below..].iter().take_while(|&&v| v == x).count();
    if ties > 0 {
        let midrank = below as f64 + (ties as f64 + 1.0) / 2.0;
        (midrank - 0.5) / n
    } else {
        below as f64 / n
    }
}

/// Inverse of the plotting positions: linear interpolation between sorted
/// sample values, clamped to the observed range.
fn empirical_ppf(sorted: &[f64], p: f64) -> f64 {
    let n = sorted.len();
    let h = p * n as f64 - 0.5;
    if h <= 0.0 {
        return sorted[0];
    }
    if h >= (n - 1) as f64 {
        return sorted[n - 1];
    }
    let lo = h.floor() as usize;
    let frac = h - lo as f64;
    sorted[lo] + frac * (sorted[lo + 1] - sorted[lo])
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn spread_sample() -> Vec<f64> {
        vec![0.8, 1.5, 2.2, 3.1, 4.0, 5.5, 7.2, 9.0, 11.5, 15.0]
    }

    #[test]
    fn fit_empty_sample() {
        assert_eq!(
            FittedDistribution::fit(&[], Family::Gamma).unwrap_err(),
            FitError::EmptySample
        );
        // Only NaN values is effectively empty.
        assert_eq!(
            FittedDistribution::fit(&[f64::NAN, f64::NAN], Family::Gamma).unwrap_err(),
            FitError::EmptySample
        );
    }

    #[test]
    fn fit_degenerate_sample() {
        assert_eq!(
            FittedDistribution::fit(&[3.0; 20], Family::Gamma).unwrap_err(),
            FitError::Degenerate { n: 20 }
        );
        assert_eq!(
            FittedDistribution::normal_scores(&[3.0; 20]).unwrap_err(),
            FitError::Degenerate { n: 20 }
        );
    }

    #[test]
    fn fit_rejects_zero_without_correction() {
        let sample = [0.0, 1.0, 2.0, 3.0];
        assert!(matches!(
            FittedDistribution::fit(&sample, Family::Gamma),
            Err(FitError::UnsupportedValue { value, .. }) if value == 0.0
        ));
        // Normal has unbounded support, so zeros are fine.
        assert!(FittedDistribution::fit(&sample, Family::Normal).is_ok());
    }

    #[test]
    fn fit_rejects_negative_even_with_correction() {
        let sample = [-1.0, 0.0, 2.0, 3.0, 4.0];
        assert!(matches!(
            FittedDistribution::fit_zero_corrected(&sample, Family::Gamma),
            Err(FitError::UnsupportedValue { value, .. }) if value == -1.0
        ));
    }

    #[test]
    fn refit_same_sample_identical() {
        let sample = spread_sample();
        let a = FittedDistribution::fit(&sample, Family::Gamma).unwrap();
        let b = FittedDistribution::fit(&sample, Family::Gamma).unwrap();
        assert_eq!(a.params(), b.params());
    }

    #[test]
    fn round_trip_ppf_cdf() {
        let sample = spread_sample();
        for family in [Family::Gamma, Family::LogNormal, Family::Normal] {
            let fitted = FittedDistribution::fit(&sample, family).unwrap();
            for &x in &sample {
                let p = fitted.cdf(x);
                assert_relative_eq!(fitted.ppf(p), x, epsilon = 1e-7, max_relative = 1e-7);
            }
        }
    }

    #[test]
    fn zero_correction_arithmetic() {
        // p0 = 2/5; cdf(0) = p0/2 = 0.2; cdf(x>0) = 0.4 + 0.6 * F(x).
        let sample = [0.0, 0.0, 5.0, 10.0, 15.0];
        let fitted = FittedDistribution::fit_zero_corrected(&sample, Family::Gamma).unwrap();

        assert_relative_eq!(fitted.p0().unwrap(), 0.4, epsilon = 1e-12);
        assert_relative_eq!(fitted.cdf(0.0), 0.2, epsilon = 1e-12);

        let plain = FittedDistribution::fit(&[5.0, 10.0, 15.0], Family::Gamma).unwrap();
        for x in [1.0, 5.0, 10.0, 20.0] {
            assert_relative_eq!(
                fitted.cdf(x),
                0.4 + 0.6 * plain.cdf(x),
                epsilon = 1e-9
            );
        }
        assert_eq!(fitted.cdf(-1.0), 0.0);
    }

    #[test]
    fn zero_correction_round_trip() {
        let sample = [0.0, 0.0, 5.0, 10.0, 15.0];
        let fitted = FittedDistribution::fit_zero_corrected(&sample, Family::Gamma).unwrap();
        assert_relative_eq!(fitted.ppf(fitted.cdf(0.0)), 0.0);
        assert_relative_eq!(fitted.ppf(fitted.cdf(10.0)), 10.0, epsilon = 1e-7);
        // Any probability inside the zero mass maps to the mass point.
        assert_eq!(fitted.ppf(0.1), 0.0);
        assert_eq!(fitted.ppf(0.4), 0.0);
    }

    #[test]
    fn cdf_monotone_within_group() {
        let fitted = FittedDistribution::fit(&spread_sample(), Family::Gamma).unwrap();
        let mut prev = f64::NEG_INFINITY;
        for i in 0..100 {
            let x = 0.1 + i as f64 * 0.3;
            let p = fitted.cdf(x);
            assert!(p >= prev, "cdf not monotone at x={x}");
            prev = p;
        }
    }

    #[test]
    fn normal_scores_plotting_positions() {
        // n = 4 distinct values: probabilities (0.5, 1.5, 2.5, 3.5) / 4.
        let fitted = FittedDistribution::normal_scores(&[4.0, 1.0, 3.0, 2.0]).unwrap();
        assert_relative_eq!(fitted.cdf(1.0), 0.125);
        assert_relative_eq!(fitted.cdf(2.0), 0.375);
        assert_relative_eq!(fitted.cdf(3.0), 0.625);
        assert_relative_eq!(fitted.cdf(4.0), 0.875);
        assert!(fitted.family().is_none());
        assert!(fitted.params().is_none());
    }

    #[test]
    fn normal_scores_midrank_ties() {
        // Ties share the average of their ranks.
        let fitted = FittedDistribution::normal_scores(&[1.0, 2.0, 2.0, 3.0]).unwrap();
        // ranks of the 2.0 pair are 2 and 3 -> midrank 2.5 -> (2.5-0.5)/4.
        assert_relative_eq!(fitted.cdf(2.0), 0.5);
    }

    #[test]
    fn normal_scores_round_trip() {
        let sample = [1.0, 2.5, 4.0, 8.0, 16.0];
        let fitted = FittedDistribution::normal_scores(&sample).unwrap();
        for &x in &sample {
            assert_relative_eq!(fitted.ppf(fitted.cdf(x)), x, epsilon = 1e-12);
        }
    }

    #[test]
    fn ppf_out_of_range() {
        let fitted = FittedDistribution::fit(&spread_sample(), Family::Normal).unwrap();
        assert!(fitted.ppf(-0.1).is_nan());
        assert!(fitted.ppf(1.1).is_nan());
    }

    #[test]
    fn ks_test_accepts_its_own_family() {
        use rand::SeedableRng;
        use rand_distr::{Distribution, Gamma as GammaDist};
        let mut rng = rand::rngs::StdRng::seed_from_u64(42);
        let dist = GammaDist::new(2.0, 3.0).unwrap();
        let sample: Vec<f64> = (0..500).map(|_| dist.sample(&mut rng)).collect();

        let fitted = FittedDistribution::fit(&sample, Family::Gamma).unwrap();
        let p = fitted.ks_test();
        assert!(p > 0.05, "KS rejected a correct family: p = {p}");
    }

    #[test]
    fn ks_test_rejects_a_wrong_family() {
        use rand::SeedableRng;
        use rand_distr::{Distribution, LogNormal as LogNormalDist};
        let mut rng = rand::rngs::StdRng::seed_from_u64(9);
        // Heavily skewed log-normal data against a symmetric normal fit.
        let dist = LogNormalDist::new(0.0, 1.5).unwrap();
        let sample: Vec<f64> = (0..500).map(|_| dist.sample(&mut rng)).collect();

        let fitted = FittedDistribution::fit(&sample, Family::Normal).unwrap();
        let p = fitted.ks_test();
        assert!(p < 0.01, "KS accepted a wrong family: p = {p}");
    }

    #[test]
    fn fitted_is_send_sync_clone() {
        fn assert_impl<T: Send + Sync + Clone>() {}
        assert_impl::<FittedDistribution>();
    }
}
