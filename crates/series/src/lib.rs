//! Time-series carrier for standardized drought indices.
//!
//! A [`TimeSeries`] is an ordered mapping from dates to values (`NaN` for
//! missing observations) with an optional declared sampling [`Frequency`]
//! (re-exported from `notos-calendar`). Frequency can also be inferred
//! from the modal day gap, tolerating minor holes in the record.
//!
//! [`TimeSeries::rolling`] produces the aggregated series an index is
//! computed on: a rolling sum or mean over `timescale` native steps, with
//! the incomplete leading windows dropped and `NaN` propagated.

mod error;
mod rolling;
mod time_series;

pub use error::SeriesError;
pub use notos_calendar::Frequency;
pub use rolling::Aggregation;
pub use time_series::TimeSeries;
