//! Output carrier for a standardized index run.

use notos_calendar::GroupKey;
use notos_series::TimeSeries;

/// Partial-result bookkeeping accumulated while fitting and transforming.
///
/// A run that fits some groups and not others still produces a score
/// series; the groups that contributed `NaN` scores are recorded here
/// instead of failing the run (unless strict mode is on).
#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    pub(crate) skipped: Vec<(GroupKey, String)>,
    pub(crate) undersampled: Vec<GroupKey>,
    pub(crate) n_clipped: usize,
    pub(crate) frequency_fallback: bool,
}

impl Diagnostics {
    /// Groups whose distribution fit failed, with the failure reason.
    pub fn skipped(&self) -> &[(GroupKey, String)] {
        &self.skipped
    }

    /// Groups with fewer finite observations than the configured minimum.
    pub fn undersampled(&self) -> &[GroupKey] {
        &self.undersampled
    }

    /// Number of cumulative probabilities clipped away from 0 or 1 before
    /// the z-score mapping. A large count signals a poorly fitting
    /// distribution, not an error.
    pub fn n_clipped(&self) -> usize {
        self.n_clipped
    }

    /// Whether frequency inference failed and the run fell back to monthly
    /// grouping.
    pub fn frequency_fallback(&self) -> bool {
        self.frequency_fallback
    }

    /// `true` when every group fit cleanly and nothing was clipped.
    pub fn is_clean(&self) -> bool {
        self.skipped.is_empty()
            && self.undersampled.is_empty()
            && self.n_clipped == 0
            && !self.frequency_fallback
    }
}

/// Scores plus the diagnostics of the run that produced them.
///
/// The score series is aligned to the input dates: positions whose rolling
/// window was incomplete, whose aggregate was `NaN`, or whose calendar
/// group was not fit carry `NaN`.
#[derive(Debug, Clone)]
pub struct SiResult {
    pub(crate) scores: TimeSeries,
    pub(crate) diagnostics: Diagnostics,
}

impl SiResult {
    /// The standardized score series (z-scores, `NaN` for unscorable
    /// positions).
    pub fn scores(&self) -> &TimeSeries {
        &self.scores
    }

    /// Consumes the result, returning the score series.
    pub fn into_scores(self) -> TimeSeries {
        self.scores
    }

    /// Bookkeeping for the run.
    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_diagnostics_are_clean() {
        let d = Diagnostics::default();
        assert!(d.is_clean());
        assert_eq!(d.n_clipped(), 0);
        assert!(!d.frequency_fallback());
    }

    #[test]
    fn any_incident_marks_unclean() {
        let d = Diagnostics {
            n_clipped: 1,
            ..Diagnostics::default()
        };
        assert!(!d.is_clean());
        let d = Diagnostics {
            frequency_fallback: true,
            ..Diagnostics::default()
        };
        assert!(!d.is_clean());
    }
}
