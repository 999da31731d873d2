//! Calendar bucketing for per-period distribution fitting.
//!
//! Standardized indices fit one distribution per calendar period (month or
//! day of year). This crate maps dates onto a fixed ring of group keys and
//! answers circular-window membership queries over that ring:
//!
//! - [`Frequency`]: the ring granularity (12 monthly or 365 daily keys,
//!   no-leap calendar with Feb-29 merged into Feb-28)
//! - [`GroupKey`]: a 0-based index into the ring, derived from a date
//! - [`window_members`]: series positions whose key falls inside a
//!   symmetric window around a target key, wrapping Dec into Jan
//!
//! Window widths are normalized with [`normalize_window`]: 0 means the
//! target key alone and even widths are rounded up to stay symmetric.

mod error;
mod frequency;
mod key;
mod window;

pub use error::CalendarError;
pub use frequency::Frequency;
pub use key::GroupKey;
pub use window::{normalize_window, window_keys, window_members};
