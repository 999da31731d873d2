//! CSV input and output for dated series.
//!
//! One observation per row, ISO dates, `NaN` (or an empty field on read)
//! for missing values. The format round-trips: a written file reads back
//! to an equal series.

mod error;
mod reader;
mod writer;

pub use error::IoError;
pub use reader::{read_series, read_series_from};
pub use writer::{write_series, write_series_to};
