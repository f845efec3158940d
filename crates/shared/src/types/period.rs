//! Calendar month addressing for time-phased data.
//!
//! Allocations, monthly configurations and expense series are always keyed by an
//! explicit `{month, year}` pair, never by a timestamp.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Earliest year accepted for time-phased data.
pub const MIN_YEAR: i32 = 1900;

/// Errors raised when building a period.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PeriodError {
    /// Month outside 1-12.
    #[error("Month must be between 1 and 12, got {0}")]
    InvalidMonth(u32),

    /// Year before [`MIN_YEAR`].
    #[error("Year must be 1900 or later, got {0}")]
    InvalidYear(i32),

    /// Range start is after its end.
    #[error("Invalid date range: start {start} is after end {end}")]
    InvalidRange {
        /// Start date.
        start: NaiveDate,
        /// End date.
        end: NaiveDate,
    },
}

/// A calendar month of a specific year.
///
/// Field order gives chronological ordering: year first, then month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MonthYear {
    /// Year (e.g., 2024).
    pub year: i32,
    /// Month number, 1-12.
    pub month: u32,
}

impl MonthYear {
    /// Creates a validated period.
    ///
    /// # Errors
    ///
    /// Returns `PeriodError::InvalidMonth` or `PeriodError::InvalidYear`.
    pub fn new(month: u32, year: i32) -> Result<Self, PeriodError> {
        if !(1..=12).contains(&month) {
            return Err(PeriodError::InvalidMonth(month));
        }
        if year < MIN_YEAR {
            return Err(PeriodError::InvalidYear(year));
        }
        Ok(Self { year, month })
    }

    /// Returns the period containing the given date.
    #[must_use]
    pub fn of_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// Returns the following month.
    #[must_use]
    pub const fn next(self) -> Self {
        if self.month == 12 {
            Self {
                year: self.year + 1,
                month: 1,
            }
        } else {
            Self {
                year: self.year,
                month: self.month + 1,
            }
        }
    }

    /// Enumerates every month touched by `[start, end]`, inclusive and in order.
    ///
    /// # Errors
    ///
    /// Returns `PeriodError::InvalidRange` if `start > end`.
    pub fn range(start: NaiveDate, end: NaiveDate) -> Result<Vec<Self>, PeriodError> {
        if start > end {
            return Err(PeriodError::InvalidRange { start, end });
        }

        let last = Self::of_date(end);
        let mut current = Self::of_date(start);
        let mut months = Vec::new();
        while current <= last {
            months.push(current);
            current = current.next();
        }
        Ok(months)
    }

    /// Returns true if this period falls within the months touched by `[start, end]`.
    #[must_use]
    pub fn within(self, start: NaiveDate, end: NaiveDate) -> bool {
        self >= Self::of_date(start) && self <= Self::of_date(end)
    }
}

impl std::fmt::Display for MonthYear {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

#[cfg(test)]
#[path = "period_tests.rs"]
mod tests;
