//! Calendar date type for trading-day arithmetic.

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{PlanError, PlanResult};

/// A calendar date.
///
/// Newtype wrapper around `chrono::NaiveDate`. Serializes as an ISO 8601
/// `YYYY-MM-DD` string.
///
/// # Example
///
/// ```rust
/// use tradeplan_core::types::Date;
///
/// let date = Date::parse("2025-07-03").unwrap();
/// assert_eq!(date.add_days(1), Date::from_ymd(2025, 7, 4).unwrap());
/// assert_eq!(date.to_string(), "2025-07-03");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Date(NaiveDate);

impl Date {
    /// Creates a new date from year, month, and day.
    ///
    /// # Errors
    ///
    /// Returns `PlanError::InvalidDate` if the date is invalid.
    pub fn from_ymd(year: i32, month: u32, day: u32) -> PlanResult<Self> {
        NaiveDate::from_ymd_opt(year, month, day)
            .map(Date)
            .ok_or_else(|| PlanError::invalid_date(format!("{year}-{month:02}-{day:02}")))
    }

    /// Creates a date from an ISO 8601 string (YYYY-MM-DD).
    ///
    /// Surrounding whitespace is ignored.
    ///
    /// # Errors
    ///
    /// Returns `PlanError::InvalidDate` if the string is not a valid date.
    pub fn parse(s: &str) -> PlanResult<Self> {
        NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
            .map(Date)
            .map_err(|_| PlanError::invalid_date(format!("Cannot parse: {s}")))
    }

    /// Returns the year component.
    #[must_use]
    pub fn year(&self) -> i32 {
        self.0.year()
    }

    /// Returns the month component (1-12).
    #[must_use]
    pub fn month(&self) -> u32 {
        self.0.month()
    }

    /// Returns the day component (1-31).
    #[must_use]
    pub fn day(&self) -> u32 {
        self.0.day()
    }

    /// Adds a number of days to the date.
    ///
    /// # Panics
    ///
    /// Panics if the result leaves chrono's supported range; use
    /// [`Date::checked_add_days`] when stepping from untrusted input.
    #[must_use]
    pub fn add_days(&self, days: i64) -> Self {
        Date(self.0 + chrono::Duration::days(days))
    }

    /// Adds a number of days, returning `None` on overflow.
    #[must_use]
    pub fn checked_add_days(&self, days: i64) -> Option<Self> {
        self.0
            .checked_add_signed(chrono::Duration::days(days))
            .map(Date)
    }

    /// Calculates the number of calendar days from `self` to `other`.
    #[must_use]
    pub fn days_between(&self, other: &Date) -> i64 {
        (other.0 - self.0).num_days()
    }

    /// Returns the underlying `NaiveDate`.
    #[must_use]
    pub fn as_naive_date(&self) -> NaiveDate {
        self.0
    }

    /// Returns the day of week.
    #[must_use]
    pub fn weekday(&self) -> Weekday {
        self.0.weekday()
    }

    /// Checks if the date is a weekend (Saturday or Sunday).
    #[must_use]
    pub fn is_weekend(&self) -> bool {
        matches!(self.weekday(), Weekday::Sat | Weekday::Sun)
    }
}

impl fmt::Display for Date {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

impl FromStr for Date {
    type Err = PlanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Date::parse(s)
    }
}

impl From<NaiveDate> for Date {
    fn from(date: NaiveDate) -> Self {
        Date(date)
    }
}

impl From<Date> for NaiveDate {
    fn from(date: Date) -> Self {
        date.0
    }
}

/// Anything a classification call can be asked about.
///
/// Forms and CSV rows hand over dates as text. Classification must answer
/// for any input, so text that does not parse resolves to `None` and is
/// classified as "not a holiday" and "not a trading day".
pub trait CalendarDate {
    /// Resolves the value to a date, if it is one.
    fn to_date(&self) -> Option<Date>;
}

impl CalendarDate for Date {
    fn to_date(&self) -> Option<Date> {
        Some(*self)
    }
}

impl CalendarDate for NaiveDate {
    fn to_date(&self) -> Option<Date> {
        Some(Date(*self))
    }
}

impl CalendarDate for str {
    fn to_date(&self) -> Option<Date> {
        Date::parse(self).ok()
    }
}

impl CalendarDate for String {
    fn to_date(&self) -> Option<Date> {
        self.as_str().to_date()
    }
}

impl<T: CalendarDate + ?Sized> CalendarDate for &T {
    fn to_date(&self) -> Option<Date> {
        (**self).to_date()
    }
}
