//! Coverage periods
//!
//! A policy covers a closed range of calendar days. The end date is always
//! derived from the start date at issuance and never moves afterwards.

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Length of a standard policy term in days
pub const DEFAULT_TERM_DAYS: i64 = 365;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PeriodError {
    #[error("Coverage end {end} is before start {start}")]
    EndBeforeStart { start: NaiveDate, end: NaiveDate },

    #[error("Term length must be positive, got {0} days")]
    NonPositiveTerm(i64),

    #[error("Date out of range adding {days} days to {start}")]
    OutOfRange { start: NaiveDate, days: i64 },
}

/// Inclusive date range during which a policy provides cover
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CoveragePeriod {
    start: NaiveDate,
    end: NaiveDate,
}

impl CoveragePeriod {
    /// Creates a period from explicit bounds
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, PeriodError> {
        if end < start {
            return Err(PeriodError::EndBeforeStart { start, end });
        }
        Ok(Self { start, end })
    }

    /// Creates a period of `term_days` starting at `start`
    pub fn from_start(start: NaiveDate, term_days: i64) -> Result<Self, PeriodError> {
        if term_days <= 0 {
            return Err(PeriodError::NonPositiveTerm(term_days));
        }
        let end = start
            .checked_add_signed(Duration::days(term_days))
            .ok_or(PeriodError::OutOfRange { start, days: term_days })?;
        Ok(Self { start, end })
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Returns true once `today` has reached the end date
    pub fn has_lapsed(&self, today: NaiveDate) -> bool {
        today >= self.end
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_standard_term_is_365_days() {
        let period = CoveragePeriod::from_start(date(2024, 1, 1), DEFAULT_TERM_DAYS).unwrap();
        // 2024 is a leap year, so 365 days lands on Dec 31
        assert_eq!(period.end(), date(2024, 12, 31));
    }

    #[test]
    fn test_rejects_inverted_bounds() {
        let result = CoveragePeriod::new(date(2024, 6, 1), date(2024, 5, 1));
        assert!(matches!(result, Err(PeriodError::EndBeforeStart { .. })));
    }

    #[test]
    fn test_lapse_on_end_date() {
        let period = CoveragePeriod::from_start(date(2023, 1, 1), 365).unwrap();
        assert!(!period.has_lapsed(date(2023, 12, 31)));
        assert!(period.has_lapsed(date(2024, 1, 1)));
    }
}
