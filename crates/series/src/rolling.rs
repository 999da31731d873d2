//! Rolling aggregation over a timescale of native frequency steps.

use crate::error::SeriesError;
use crate::time_series::TimeSeries;

/// How a rolling window is reduced to one value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Aggregation {
    /// Window total (the convention for precipitation-type indices).
    #[default]
    Sum,
    /// Window mean (for level-type series such as groundwater heads).
    Mean,
}

impl TimeSeries {
    /// Applies a rolling aggregation of `timescale` native frequency steps.
    ///
    /// The first `timescale - 1` observations have no complete window and
    /// are dropped from the result; a `NaN` anywhere inside a window makes
    /// that window's aggregate `NaN` (gaps propagate, they are never
    /// imputed). `timescale = 1` returns the series unchanged. The declared
    /// frequency carries over.
    ///
    /// Windows are counted in index steps, so the series is expected to be
    /// (close to) gapless at its native frequency.
    ///
    /// # Errors
    ///
    /// Returns [`SeriesError::InvalidTimescale`] if `timescale` is zero or
    /// not smaller than the series length.
    pub fn rolling(&self, timescale: usize, agg: Aggregation) -> Result<TimeSeries, SeriesError> {
        if timescale == 0 || timescale > self.len() {
            return Err(SeriesError::InvalidTimescale {
                timescale,
                len: self.len(),
            });
        }
        if timescale == 1 {
            return Ok(self.clone());
        }

        let values = self.values();
        let mut out = Vec::with_capacity(self.len() - timescale + 1);
        for window in values.windows(timescale) {
            // NaN propagates through the sum by IEEE semantics.
            let sum: f64 = window.iter().sum();
            out.push(match agg {
                Aggregation::Sum => sum,
                Aggregation::Mean => sum / timescale as f64,
            });
        }

        let dates = self.dates()[timescale - 1..].to_vec();
        match self.frequency() {
            Some(freq) => TimeSeries::with_frequency(dates, out, freq),
            None => TimeSeries::new(dates, out),
        }
    }
}
