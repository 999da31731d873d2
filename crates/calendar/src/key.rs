//! Group key assignment on the no-leap calendar ring.

use chrono::{Datelike, NaiveDate};

use crate::error::CalendarError;
use crate::frequency::Frequency;

/// Number of days in each month of the no-leap calendar
/// (index 0 unused, index 1 = January, ..., index 12 = December).
const DAYS_PER_MONTH: [u8; 13] = [0, 31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];

/// 0-based day-of-year on which each month starts in the no-leap calendar
/// (index 0 unused, January starts at 0, February at 31, ...).
const MONTH_START: [u16; 13] = [0, 0, 31, 59, 90, 120, 151, 181, 212, 243, 273, 304, 334];

/// Calendar bucket identifier: a 0-based index into the ring of its
/// [`Frequency`] (0..12 for monthly, 0..365 for daily).
///
/// Keys carry their frequency so that ring arithmetic (circular windows,
/// wraparound distance) never mixes rings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GroupKey {
    index: u16,
    frequency: Frequency,
}

impl GroupKey {
    /// Creates a key from a 0-based ring index.
    ///
    /// # Errors
    ///
    /// Returns [`CalendarError::InvalidKey`] if `index` is outside the ring.
    pub fn new(index: u16, frequency: Frequency) -> Result<Self, CalendarError> {
        if (index as usize) >= frequency.ring_size() {
            return Err(CalendarError::InvalidKey {
                index,
                frequency: frequency.name(),
                ring: frequency.ring_size(),
            });
        }
        Ok(Self { index, frequency })
    }

    /// Creates a monthly key from a 1-based calendar month.
    ///
    /// # Errors
    ///
    /// Returns [`CalendarError::InvalidMonth`] if `month` is not in 1..=12.
    pub fn from_month(month: u8) -> Result<Self, CalendarError> {
        if !(1..=12).contains(&month) {
            return Err(CalendarError::InvalidMonth { month });
        }
        Ok(Self {
            index: (month - 1) as u16,
            frequency: Frequency::Monthly,
        })
    }

    /// Assigns the calendar bucket for `date` at the given fit frequency.
    ///
    /// Daily keys use the 365-day no-leap ring: February 29 is merged with
    /// February 28 (key 58), so leap years never produce a near-empty 366th
    /// group. Dates in March and later fall on the same key in leap and
    /// non-leap years.
    pub fn from_date(date: NaiveDate, frequency: Frequency) -> Self {
        let month = date.month() as usize;
        match frequency {
            Frequency::Monthly => Self {
                index: (month - 1) as u16,
                frequency,
            },
            Frequency::Daily => {
                let day = (date.day() as u8).min(DAYS_PER_MONTH[month]);
                Self {
                    index: MONTH_START[month] + (day as u16 - 1),
                    frequency,
                }
            }
        }
    }

    /// Returns the 0-based ring index.
    pub fn index(self) -> u16 {
        self.index
    }

    /// Returns the frequency whose ring this key belongs to.
    pub fn frequency(self) -> Frequency {
        self.frequency
    }

    /// 1-based label for diagnostics: month number (1..=12) or day of year
    /// (1..=365).
    pub fn label(self) -> u16 {
        self.index + 1
    }

    /// Circular distance to `other` on the shared ring (0..=ring/2).
    ///
    /// # Panics
    ///
    /// Panics if the keys belong to different frequencies.
    pub fn ring_distance(self, other: GroupKey) -> usize {
        assert_eq!(
            self.frequency, other.frequency,
            "ring distance across frequencies is undefined"
        );
        let ring = self.frequency.ring_size();
        let a = self.index as usize;
        let b = other.index as usize;
        let forward = (ring + b - a) % ring;
        forward.min(ring - forward)
    }
}
