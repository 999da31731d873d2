//! Error types for the notos-calendar crate.

/// Error type for all fallible operations in the notos-calendar crate.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CalendarError {
    /// Returned when a month value is outside 1..=12.
    #[error("invalid month: {month} (must be 1..=12)")]
    InvalidMonth {
        /// The invalid month value.
        month: u8,
    },

    /// Returned when a group key index is outside the ring of its frequency.
    #[error("invalid group key {index} for {frequency} frequency (ring size {ring})")]
    InvalidKey {
        /// The invalid 0-based key index.
        index: u16,
        /// Frequency name ("daily" or "monthly").
        frequency: &'static str,
        /// Number of keys in the ring.
        ring: usize,
    },
}
