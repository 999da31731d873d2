//! Rolling aggregation against hand-computed multi-year series.

use approx::assert_relative_eq;
use chrono::NaiveDate;
use notos_series::{Aggregation, Frequency, TimeSeries};

fn monthly(from_year: i32, values: Vec<f64>) -> TimeSeries {
    let dates: Vec<NaiveDate> = (0..values.len())
        .map(|i| {
            NaiveDate::from_ymd_opt(from_year + (i / 12) as i32, (i % 12) as u32 + 1, 1).unwrap()
        })
        .collect();
    TimeSeries::new(dates, values).unwrap()
}

#[test]
fn three_month_totals_line_up_with_window_ends() {
    let values: Vec<f64> = (1..=24).map(f64::from).collect();
    let ts = monthly(1990, values);
    let agg = ts.rolling(3, Aggregation::Sum).unwrap();

    assert_eq!(agg.len(), 22);
    assert_eq!(
        agg.dates()[0],
        NaiveDate::from_ymd_opt(1990, 3, 1).unwrap()
    );
    // First window: Jan + Feb + Mar = 1 + 2 + 3.
    assert_relative_eq!(agg.values()[0], 6.0);
    // Last window: months 22 + 23 + 24.
    assert_relative_eq!(*agg.values().last().unwrap(), 69.0);
}

#[test]
fn inferred_frequency_survives_resolution_after_aggregation() {
    let ts = monthly(1990, vec![1.0; 36]);
    let agg = ts.rolling(6, Aggregation::Sum).unwrap();
    assert_eq!(agg.resolve_frequency().unwrap(), Frequency::Monthly);
}

#[test]
fn interior_gap_disables_a_window_span_only() {
    let mut values = vec![2.0; 24];
    values[10] = f64::NAN;
    let ts = monthly(1990, values);
    let agg = ts.rolling(3, Aggregation::Sum).unwrap();

    // Aggregate index j covers raw indices j..j+2, so exactly the windows
    // touching raw index 10 are NaN: aggregate indices 8, 9, 10.
    for (j, v) in agg.values().iter().enumerate() {
        if (8..=10).contains(&j) {
            assert!(v.is_nan(), "expected NaN at aggregate index {j}");
        } else {
            assert_relative_eq!(*v, 6.0);
        }
    }
}
