//! CSV output: two columns, date and value.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use csv::WriterBuilder;
use notos_series::TimeSeries;
use tracing::debug;

use crate::error::IoError;

/// Writes a dated series as CSV with a `date,value` header.
///
/// Missing observations are written as a literal `NaN`, so a round trip
/// through [`crate::read_series`] preserves them.
///
/// # Errors
///
/// Returns [`IoError::Io`] or [`IoError::Csv`].
pub fn write_series(path: impl AsRef<Path>, series: &TimeSeries) -> Result<(), IoError> {
    let path = path.as_ref();
    write_series_to(File::create(path)?, series)?;
    debug!(path = %path.display(), n = series.len(), "wrote series");
    Ok(())
}

/// Writes a dated series as CSV to any sink. See [`write_series`].
///
/// # Errors
///
/// As [`write_series`], minus the file-create failure.
pub fn write_series_to<W: Write>(sink: W, series: &TimeSeries) -> Result<(), IoError> {
    let mut writer = WriterBuilder::new().from_writer(sink);
    writer.write_record(["date", "value"])?;
    for (date, value) in series.iter() {
        let value = if value.is_nan() {
            "NaN".to_string()
        } else {
            format!("{value}")
        };
        writer.write_record([date.format("%Y-%m-%d").to_string(), value])?;
    }
    writer.flush()?;
    Ok(())
}
