//! Inclusive calendar date ranges used by report queries.

use chrono::{DateTime, Datelike, Days, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// An inclusive `[from, to]` range of calendar days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    /// First day (inclusive).
    pub from: NaiveDate,
    /// Last day (inclusive).
    pub to: NaiveDate,
}

impl DateRange {
    /// Creates a range, rejecting `from > to`.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Validation` when the start is after the end.
    pub fn new(from: NaiveDate, to: NaiveDate) -> Result<Self, AppError> {
        if from > to {
            return Err(AppError::Validation(format!(
                "Start date {from} must be before or equal to end date {to}"
            )));
        }
        Ok(Self { from, to })
    }

    /// Builds a range from optional query bounds.
    ///
    /// Missing `to` defaults to `today`; missing `from` defaults to the first
    /// day of the month of `to`.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Validation` when the resolved start is after the end.
    pub fn from_query(
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
        today: NaiveDate,
    ) -> Result<Self, AppError> {
        let to = to.unwrap_or(today);
        let from = from.unwrap_or_else(|| to.with_day0(0).unwrap_or(to));
        Self::new(from, to)
    }

    /// Start of the range as a UTC instant (midnight of `from`).
    #[must_use]
    pub fn start_utc(&self) -> DateTime<Utc> {
        self.from.and_time(chrono::NaiveTime::MIN).and_utc()
    }

    /// Exclusive end of the range as a UTC instant (midnight after `to`).
    #[must_use]
    pub fn end_utc_exclusive(&self) -> DateTime<Utc> {
        let next = self.to.checked_add_days(Days::new(1)).unwrap_or(self.to);
        next.and_time(chrono::NaiveTime::MIN).and_utc()
    }

    /// Returns true if the day falls inside the range.
    #[must_use]
    pub fn contains(&self, day: NaiveDate) -> bool {
        day >= self.from && day <= self.to
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_rejects_inverted_range() {
        assert!(DateRange::new(d(2026, 3, 2), d(2026, 3, 1)).is_err());
        assert!(DateRange::new(d(2026, 3, 1), d(2026, 3, 1)).is_ok());
    }

    #[test]
    fn test_from_query_defaults_to_month_start() {
        let range = DateRange::from_query(None, None, d(2026, 10, 19)).unwrap();
        assert_eq!(range.from, d(2026, 10, 1));
        assert_eq!(range.to, d(2026, 10, 19));
    }

    #[test]
    fn test_utc_bounds_cover_whole_days() {
        let range = DateRange::new(d(2026, 1, 31), d(2026, 1, 31)).unwrap();
        assert_eq!(range.start_utc().to_rfc3339(), "2026-01-31T00:00:00+00:00");
        assert_eq!(range.end_utc_exclusive().to_rfc3339(), "2026-02-01T00:00:00+00:00");
        assert!(range.contains(d(2026, 1, 31)));
        assert!(!range.contains(d(2026, 2, 1)));
    }
}
