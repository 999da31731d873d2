//! Dated univariate time series with frequency inference.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use notos_calendar::Frequency;

use crate::error::SeriesError;

/// Fraction of inter-observation gaps the modal spacing must cover for
/// frequency inference to succeed. Tolerates minor gaps in the record.
const MODAL_GAP_RATIO: f64 = 0.9;

/// An ordered univariate time series: strictly increasing unique dates with
/// one `f64` value each (`NaN` marks a missing observation).
///
/// The sampling frequency can be declared up front or inferred from the
/// date spacing; it is never guessed silently.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeSeries {
    dates: Vec<NaiveDate>,
    values: Vec<f64>,
    frequency: Option<Frequency>,
}

impl TimeSeries {
    /// Builds a series after validating that dates and values match in
    /// length, the series is non-empty, and dates are strictly increasing.
    ///
    /// # Errors
    ///
    /// Returns [`SeriesError::Empty`], [`SeriesError::LengthMismatch`], or
    /// [`SeriesError::NonMonotonicDates`].
    pub fn new(dates: Vec<NaiveDate>, values: Vec<f64>) -> Result<Self, SeriesError> {
        if dates.is_empty() {
            return Err(SeriesError::Empty);
        }
        if dates.len() != values.len() {
            return Err(SeriesError::LengthMismatch {
                dates: dates.len(),
                values: values.len(),
            });
        }
        for pair in dates.windows(2) {
            if pair[1] <= pair[0] {
                return Err(SeriesError::NonMonotonicDates { date: pair[1] });
            }
        }
        Ok(Self {
            dates,
            values,
            frequency: None,
        })
    }

    /// Builds a series with a declared sampling frequency.
    ///
    /// # Errors
    ///
    /// Same validation as [`TimeSeries::new`].
    pub fn with_frequency(
        dates: Vec<NaiveDate>,
        values: Vec<f64>,
        frequency: Frequency,
    ) -> Result<Self, SeriesError> {
        let mut series = Self::new(dates, values)?;
        series.frequency = Some(frequency);
        Ok(series)
    }

    /// Returns the observation dates.
    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    /// Returns the observation values (`NaN` = missing).
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Returns the declared sampling frequency, if any.
    pub fn frequency(&self) -> Option<Frequency> {
        self.frequency
    }

    /// Returns the number of observations.
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    /// Returns `true` if the series has no observations.
    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// Iterates over `(date, value)` pairs in order.
    pub fn iter(&self) -> impl Iterator<Item = (NaiveDate, f64)> + '_ {
        self.dates.iter().copied().zip(self.values.iter().copied())
    }

    /// Resolves the sampling frequency: the declared one if set, otherwise
    /// inferred from the modal day gap between consecutive dates (1 day is
    /// daily, 28-31 days is monthly).
    ///
    /// # Errors
    ///
    /// Returns [`SeriesError::FrequencyInference`] if the series is too
    /// short, the modal gap covers less than 90% of all gaps, or the gap
    /// matches neither a daily nor a monthly spacing.
    pub fn resolve_frequency(&self) -> Result<Frequency, SeriesError> {
        if let Some(freq) = self.frequency {
            return Ok(freq);
        }
        self.infer_frequency()
    }

    /// Infers the sampling frequency from date spacing, ignoring any
    /// declared frequency.
    pub fn infer_frequency(&self) -> Result<Frequency, SeriesError> {
        if self.len() < 2 {
            return Err(SeriesError::FrequencyInference {
                reason: format!("need at least 2 observations, got {}", self.len()),
            });
        }

        // Monthly spacing varies between 28 and 31 days; bucket those gaps
        // together before looking for a dominant spacing.
        let mut counts: BTreeMap<i64, usize> = BTreeMap::new();
        for pair in self.dates.windows(2) {
            let gap = (pair[1] - pair[0]).num_days();
            let bucket = if (28..=31).contains(&gap) { 30 } else { gap };
            *counts.entry(bucket).or_insert(0) += 1;
        }

        let total = self.len() - 1;
        let (&modal_gap, &modal_count) = counts
            .iter()
            .max_by_key(|(_, &count)| count)
            .expect("at least one gap");

        if (modal_count as f64) < MODAL_GAP_RATIO * total as f64 {
            return Err(SeriesError::FrequencyInference {
                reason: format!(
                    "modal spacing covers only {modal_count} of {total} gaps"
                ),
            });
        }

        match modal_gap {
            1 => Ok(Frequency::Daily),
            30 => Ok(Frequency::Monthly),
            other => Err(SeriesError::FrequencyInference {
                reason: format!("modal spacing of {other} days is neither daily nor monthly"),
            }),
        }
    }
}
