//! CSV input: two columns, date and value.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use chrono::NaiveDate;
use csv::ReaderBuilder;
use notos_series::TimeSeries;
use tracing::debug;

use crate::error::IoError;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Reads a dated series from a CSV file.
///
/// Expects two columns, `date` (ISO `YYYY-MM-DD`) and `value`; a header
/// row is detected and skipped. An empty value field or a literal `NaN`
/// (any case) marks a missing observation.
///
/// # Errors
///
/// Returns [`IoError::Io`] or [`IoError::Csv`] for file and framing
/// problems, [`IoError::Parse`] for an unreadable record, and
/// [`IoError::Series`] if the parsed records do not form a valid series
/// (empty, or dates not strictly increasing).
pub fn read_series(path: impl AsRef<Path>) -> Result<TimeSeries, IoError> {
    let path = path.as_ref();
    let series = read_series_from(File::open(path)?)?;
    debug!(path = %path.display(), n = series.len(), "read series");
    Ok(series)
}

/// Reads a dated series from any CSV source. See [`read_series`].
///
/// # Errors
///
/// As [`read_series`], minus the file-open failure.
pub fn read_series_from<R: Read>(source: R) -> Result<TimeSeries, IoError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(false)
        .trim(csv::Trim::All)
        .from_reader(source);

    let mut dates = Vec::new();
    let mut values = Vec::new();
    for (i, record) in reader.records().enumerate() {
        let record = record?;
        let line = i + 1;
        if record.len() != 2 {
            return Err(IoError::Parse {
                line,
                reason: format!("expected 2 fields, got {}", record.len()),
            });
        }
        let date_field = &record[0];
        let date = match NaiveDate::parse_from_str(date_field, DATE_FORMAT) {
            Ok(d) => d,
            // A non-date first field is only acceptable as the header row.
            Err(_) if line == 1 => continue,
            Err(_) => {
                return Err(IoError::Parse {
                    line,
                    reason: format!("invalid date '{date_field}'"),
                });
            }
        };
        dates.push(date);
        values.push(parse_value(&record[1]).ok_or_else(|| IoError::Parse {
            line,
            reason: format!("invalid value '{}'", &record[1]),
        })?);
    }

    Ok(TimeSeries::new(dates, values)?)
}

fn parse_value(field: &str) -> Option<f64> {
    if field.is_empty() || field.eq_ignore_ascii_case("nan") {
        return Some(f64::NAN);
    }
    field.parse().ok()
}
