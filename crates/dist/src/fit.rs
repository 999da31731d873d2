//! Maximum-likelihood parameter estimation.

use statrs::function::gamma::digamma;

use crate::error::FitError;
use crate::family::Family;
use crate::params::DistParams;

/// Iteration bound for the gamma shape Newton solve.
const MAX_ITER: usize = 200;

/// Counts the number of unique values in a slice, using an epsilon
/// tolerance of 1e-10 for floating-point comparison.
pub(crate) fn count_unique(values: &[f64]) -> usize {
    if values.is_empty() {
        return 0;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    sorted
        .windows(2)
        .filter(|w| (w[1] - w[0]).abs() > 1e-10)
        .count()
        + 1
}

/// Estimates the family's parameters by maximum likelihood.
///
/// The caller guarantees the sample is non-empty, finite, non-degenerate,
/// and within the family's support (strictly positive for gamma and
/// log-normal).
pub(crate) fn mle(sample: &[f64], family: Family) -> Result<DistParams, FitError> {
    match family {
        Family::Normal => Ok(fit_normal(sample)),
        Family::LogNormal => Ok(fit_log_normal(sample)),
        Family::Gamma => fit_gamma(sample),
    }
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

/// Normal MLE: loc = sample mean, scale = sample sd with 1/n denominator.
fn fit_normal(sample: &[f64]) -> DistParams {
    let m = mean(sample);
    let var = sample.iter().map(|&x| (x - m) * (x - m)).sum::<f64>() / sample.len() as f64;
    DistParams::new(None, m, var.sqrt())
}

/// Log-normal MLE: closed form on ln x.
fn fit_log_normal(sample: &[f64]) -> DistParams {
    let logs: Vec<f64> = sample.iter().map(|&x| x.ln()).collect();
    let mu = mean(&logs);
    let var = logs.iter().map(|&l| (l - mu) * (l - mu)).sum::<f64>() / logs.len() as f64;
    DistParams::new(Some(var.sqrt()), 0.0, mu.exp())
}

/// Gamma MLE: Newton iteration on the shape.
///
/// With `s = ln(mean) - mean(ln x)` the likelihood equations reduce to
/// `ln(k) - digamma(k) = s`; the Minka closed-form approximation seeds a
/// Newton solve with a central-difference derivative, and
/// `scale = mean / k`.
fn fit_gamma(sample: &[f64]) -> Result<DistParams, FitError> {
    let m = mean(sample);
    let mean_ln = sample.iter().map(|&x| x.ln()).sum::<f64>() / sample.len() as f64;
    let s = m.ln() - mean_ln;

    // s > 0 by the AM-GM inequality for any non-degenerate sample; a
    // non-positive s only arises from pathological rounding.
    if !s.is_finite() || s <= 0.0 {
        return Err(FitError::NonConvergent {
            family: Family::Gamma,
            iterations: 0,
        });
    }

    let mut k = (3.0 - s + ((s - 3.0) * (s - 3.0) + 24.0 * s).sqrt()) / (12.0 * s);
    for _ in 0..MAX_ITER {
        let f = k.ln() - digamma(k) - s;
        let h = (k * 1e-6).max(1e-12);
        let f_hi = (k + h).ln() - digamma(k + h) - s;
        let f_lo = (k - h).ln() - digamma(k - h) - s;
        let df = (f_hi - f_lo) / (2.0 * h);
        let step = f / df;
        k -= step;
        if !k.is_finite() || k <= 0.0 {
            return Err(FitError::NonConvergent {
                family: Family::Gamma,
                iterations: MAX_ITER,
            });
        }
        if step.abs() <= 1e-10 * k.max(1.0) {
            return Ok(DistParams::new(Some(k), 0.0, m / k));
        }
    }
    Err(FitError::NonConvergent {
        family: Family::Gamma,
        iterations: MAX_ITER,
    })
}
