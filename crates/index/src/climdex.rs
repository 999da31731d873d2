//! Precipitation extreme indices on daily records.
//!
//! Each index reduces a daily series to one value per calendar year,
//! dated at the year's end. Years with no finite observation yield `NaN`
//! rather than dropping out of the output.

use chrono::{Datelike, NaiveDate};
use notos_series::TimeSeries;

use crate::error::IndexError;

/// Wet-day threshold in the record's depth unit (1 mm by convention).
pub const WET_DAY_THRESHOLD: f64 = 1.0;

/// Highest one-day precipitation amount per year.
///
/// # Errors
///
/// Returns [`IndexError::WrongFrequency`] unless the series resolves to
/// daily sampling.
pub fn rx1day(series: &TimeSeries) -> Result<TimeSeries, IndexError> {
    yearly_summary(series, |days| {
        days.iter()
            .copied()
            .filter(|v| v.is_finite())
            .fold(f64::NAN, f64::max)
    })
}

/// Highest consecutive five-day precipitation amount per year.
///
/// Windows containing a missing day are skipped; a year shorter than the
/// window yields `NaN`.
///
/// # Errors
///
/// Returns [`IndexError::WrongFrequency`] unless the series resolves to
/// daily sampling.
pub fn rx5day(series: &TimeSeries) -> Result<TimeSeries, IndexError> {
    yearly_summary(series, |days| {
        days.windows(5)
            .filter(|w| w.iter().all(|v| v.is_finite()))
            .map(|w| w.iter().sum())
            .fold(f64::NAN, f64::max)
    })
}

/// Simple daily intensity index: mean precipitation over wet days, per
/// year. A year without a wet day yields `NaN`.
///
/// # Errors
///
/// Returns [`IndexError::WrongFrequency`] unless the series resolves to
/// daily sampling.
pub fn sdii(series: &TimeSeries, threshold: f64) -> Result<TimeSeries, IndexError> {
    yearly_summary(series, |days| {
        let wet: Vec<f64> = days
            .iter()
            .copied()
            .filter(|&v| v.is_finite() && v >= threshold)
            .collect();
        if wet.is_empty() {
            f64::NAN
        } else {
            wet.iter().sum::<f64>() / wet.len() as f64
        }
    })
}

/// Count of days at or above `threshold` per year.
///
/// # Errors
///
/// Returns [`IndexError::WrongFrequency`] unless the series resolves to
/// daily sampling.
pub fn rnmm(series: &TimeSeries, threshold: f64) -> Result<TimeSeries, IndexError> {
    yearly_summary(series, |days| {
        days.iter()
            .filter(|&&v| v.is_finite() && v >= threshold)
            .count() as f64
    })
}

/// Count of heavy precipitation days (at or above 10 mm) per year.
///
/// # Errors
///
/// As [`rnmm`].
pub fn r10mm(series: &TimeSeries) -> Result<TimeSeries, IndexError> {
    rnmm(series, 10.0)
}

/// Groups a daily series by calendar year and reduces each year's values
/// with `summarize`, dating the result at December 31.
fn yearly_summary<F>(series: &TimeSeries, summarize: F) -> Result<TimeSeries, IndexError>
where
    F: Fn(&[f64]) -> f64,
{
    let frequency = series.resolve_frequency()?;
    if frequency != notos_calendar::Frequency::Daily {
        return Err(IndexError::WrongFrequency {
            frequency: frequency.name(),
        });
    }

    // Dates are strictly increasing, so years arrive in order and a flat
    // run-based split preserves it.
    let mut years: Vec<(i32, Vec<f64>)> = Vec::new();
    for (date, value) in series.iter() {
        match years.last_mut() {
            Some((year, days)) if *year == date.year() => days.push(value),
            _ => years.push((date.year(), vec![value])),
        }
    }

    let mut dates = Vec::with_capacity(years.len());
    let mut values = Vec::with_capacity(years.len());
    for (year, days) in &years {
        let date = NaiveDate::from_ymd_opt(*year, 12, 31)
            .expect("december 31 exists in every year");
        dates.push(date);
        values.push(summarize(days));
    }
    Ok(TimeSeries::new(dates, values)?)
}
