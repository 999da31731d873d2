//! Calendar frequency for sampling and distribution fitting.

use std::fmt;
use std::str::FromStr;

/// Calendar granularity of a time series or of per-period distribution fits.
///
/// `Daily` places every observation in a 365-key ring (no-leap calendar,
/// Feb-29 shares the Feb-28 key); `Monthly` uses a 12-key ring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Frequency {
    /// One group per day of year (365 keys).
    Daily,
    /// One group per calendar month (12 keys).
    Monthly,
}

impl Frequency {
    /// Number of group keys in the ring for this frequency.
    pub fn ring_size(self) -> usize {
        match self {
            Frequency::Daily => 365,
            Frequency::Monthly => 12,
        }
    }

    /// Lowercase name, used in error messages and logs.
    pub fn name(self) -> &'static str {
        match self {
            Frequency::Daily => "daily",
            Frequency::Monthly => "monthly",
        }
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Frequency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "daily" | "d" => Ok(Frequency::Daily),
            "monthly" | "m" => Ok(Frequency::Monthly),
            other => Err(format!(
                "unknown frequency '{other}' (expected daily or monthly)"
            )),
        }
    }
}
