//! Rainfall anomaly indices.
//!
//! Unlike the standardized presets these scale anomalies against the
//! observed extremes instead of a fitted distribution: the classic index
//! against the ten wettest and driest observations of the whole record,
//! the modified variant against the tail means of each calendar month.

use std::collections::BTreeMap;

use notos_calendar::{Frequency, GroupKey};
use notos_series::TimeSeries;

use crate::error::IndexError;

/// Anomaly scaling constant of the classic index.
const RAI_SCALE: f64 = 3.0;
/// Number of extreme observations averaged into each denominator.
const RAI_TAIL: usize = 10;
/// Conventional scaling factor of the modified index.
pub const MRAI_SCALE: f64 = 1.7;

/// Rainfall Anomaly Index over the whole record.
///
/// Anomalies from the record mean are scaled to +-3 against the mean of
/// the ten largest (wet side) or ten smallest (dry side) observations.
/// Missing values stay `NaN` and do not enter the scaling.
///
/// # Errors
///
/// Returns [`IndexError::TooShort`] when fewer finite observations than
/// the tail size plus one are available (the tail mean would equal the
/// record mean), and [`IndexError::Degenerate`] for a spread-free series.
pub fn rai(series: &TimeSeries) -> Result<TimeSeries, IndexError> {
    let mut finite: Vec<f64> = series
        .values()
        .iter()
        .copied()
        .filter(|v| v.is_finite())
        .collect();
    if finite.len() <= RAI_TAIL {
        return Err(IndexError::TooShort {
            n: finite.len(),
            min: RAI_TAIL + 1,
        });
    }
    finite.sort_by(|a, b| a.partial_cmp(b).expect("finite values are ordered"));

    let mean = finite.iter().sum::<f64>() / finite.len() as f64;
    let dry_tail = finite[..RAI_TAIL].iter().sum::<f64>() / RAI_TAIL as f64;
    let wet_tail = finite[finite.len() - RAI_TAIL..].iter().sum::<f64>() / RAI_TAIL as f64;
    if wet_tail - mean <= 0.0 || mean - dry_tail <= 0.0 {
        return Err(IndexError::Degenerate);
    }

    let scores: Vec<f64> = series
        .values()
        .iter()
        .map(|&v| scale_anomaly(v, mean, wet_tail, dry_tail, RAI_SCALE))
        .collect();
    rebuild(series, scores)
}

/// Modified Rainfall Anomaly Index: the same anomaly scaling applied per
/// calendar month, with tails defined by the month's 0.9 and 0.1
/// quantiles and a softer scaling factor.
///
/// A month whose tails collapse (too few observations, or no spread)
/// yields `NaN` scores for its positions rather than failing the record.
///
/// # Errors
///
/// Returns [`IndexError::TooShort`] when the whole record has fewer
/// finite observations than the classic index would need.
pub fn mrai(series: &TimeSeries, scale: f64) -> Result<TimeSeries, IndexError> {
    let n_finite = series.values().iter().filter(|v| v.is_finite()).count();
    if n_finite <= RAI_TAIL {
        return Err(IndexError::TooShort {
            n: n_finite,
            min: RAI_TAIL + 1,
        });
    }

    let keys: Vec<GroupKey> = series
        .dates()
        .iter()
        .map(|&d| GroupKey::from_date(d, Frequency::Monthly))
        .collect();
    let mut groups: BTreeMap<GroupKey, Vec<f64>> = BTreeMap::new();
    for (&key, &value) in keys.iter().zip(series.values()) {
        if value.is_finite() {
            groups.entry(key).or_default().push(value);
        }
    }

    let mut scales: BTreeMap<GroupKey, (f64, f64, f64)> = BTreeMap::new();
    for (key, sample) in &mut groups {
        sample.sort_by(|a, b| a.partial_cmp(b).expect("finite values are ordered"));
        let mean = sample.iter().sum::<f64>() / sample.len() as f64;
        // Tail means over the observations strictly beyond the quantiles,
        // so ties at the quantile never dilute the extreme.
        let q90 = quantile(sample, 0.9);
        let q10 = quantile(sample, 0.1);
        let wet = tail_mean(sample.iter().filter(|&&v| v > q90));
        let dry = tail_mean(sample.iter().filter(|&&v| v < q10));
        if let (Some(wet), Some(dry)) = (wet, dry) {
            if wet - mean > 0.0 && mean - dry > 0.0 {
                scales.insert(*key, (mean, wet, dry));
            }
        }
    }

    let scores: Vec<f64> = keys
        .iter()
        .zip(series.values())
        .map(|(key, &v)| match scales.get(key) {
            Some(&(mean, wet, dry)) => scale_anomaly(v, mean, wet, dry, scale),
            None => f64::NAN,
        })
        .collect();
    rebuild(series, scores)
}

fn scale_anomaly(v: f64, mean: f64, wet_tail: f64, dry_tail: f64, scale: f64) -> f64 {
    if !v.is_finite() {
        f64::NAN
    } else if v > mean {
        scale * (v - mean) / (wet_tail - mean)
    } else {
        -scale * (v - mean) / (dry_tail - mean)
    }
}

fn tail_mean<'a>(values: impl Iterator<Item = &'a f64>) -> Option<f64> {
    let mut sum = 0.0;
    let mut n = 0usize;
    for &v in values {
        sum += v;
        n += 1;
    }
    (n > 0).then(|| sum / n as f64)
}

/// Linear-interpolation quantile of a sorted sample.
fn quantile(sorted: &[f64], q: f64) -> f64 {
    let h = q * (sorted.len() - 1) as f64;
    let lo = h.floor() as usize;
    if lo + 1 >= sorted.len() {
        return sorted[sorted.len() - 1];
    }
    sorted[lo] + (h - lo as f64) * (sorted[lo + 1] - sorted[lo])
}

fn rebuild(series: &TimeSeries, scores: Vec<f64>) -> Result<TimeSeries, IndexError> {
    let dates = series.dates().to_vec();
    let rebuilt = match series.frequency() {
        Some(frequency) => TimeSeries::with_frequency(dates, scores, frequency),
        None => TimeSeries::new(dates, scores),
    }?;
    Ok(rebuilt)
}
