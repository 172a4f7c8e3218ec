//! Trading-day calendars.
//!
//! This module provides:
//! - The [`HolidayRegistry`] of full closures and early closes
//! - The bundled US equity holiday schedule
//! - [`TradingDayCalendar`]: trading-day classification, navigation and arithmetic
//!
//! Early-close days are counted as non-trading. They shorten the session,
//! and a position is never scheduled to open or close on one.

mod holiday;
mod registry;
mod us_equities;

pub use holiday::{Holiday, HolidayKind};
pub use registry::{HolidayRegistry, RegistryData};
pub use us_equities::{
    build_us_equity_registry, us_equity_registry, EARLY_CLOSE_TIME, US_EQUITIES,
    US_EQUITY_HOLIDAYS,
};

use std::sync::Arc;

use crate::error::{PlanError, PlanResult};
use crate::types::{CalendarDate, Date};

/// Longest run of consecutive non-trading days a navigation call will
/// walk before giving up. Real calendars never come close; hitting it
/// means the holiday data is broken.
pub const MAX_SCAN_DAYS: u32 = 3650;

/// How a single date is classified. Computed on demand, never cached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TradingDayClassification {
    /// The classified date.
    pub date: Date,
    /// Saturday or Sunday.
    pub is_weekend: bool,
    /// Has a registry entry of either kind.
    pub is_holiday: bool,
    /// Has an early-close registry entry.
    pub is_early_close: bool,
    /// The registry entry, if any.
    pub holiday: Option<Holiday>,
}

impl TradingDayClassification {
    /// True when a position may be opened or closed on this date.
    #[must_use]
    pub fn is_trading_day(&self) -> bool {
        !self.is_weekend && !self.is_holiday
    }
}

/// Trading-day calendar over an injected holiday registry.
///
/// # Example
///
/// ```
/// use tradeplan_core::calendars::TradingDayCalendar;
/// use tradeplan_core::types::Date;
///
/// let cal = TradingDayCalendar::us_equities();
///
/// // Friday before MLK Day 2025; Saturday, Sunday and Monday are skipped
/// let friday = Date::from_ymd(2025, 1, 17).unwrap();
/// assert_eq!(cal.next_trading_day(friday).unwrap(), Date::from_ymd(2025, 1, 21).unwrap());
/// assert!(!cal.is_trading_day("2025-01-20"));
/// ```
#[derive(Debug, Clone)]
pub struct TradingDayCalendar {
    registry: Arc<HolidayRegistry>,
    scan_limit: u32,
}

impl TradingDayCalendar {
    /// Creates a calendar over the given registry.
    pub fn new(registry: Arc<HolidayRegistry>) -> Self {
        Self {
            registry,
            scan_limit: MAX_SCAN_DAYS,
        }
    }

    /// Calendar over the bundled US equity schedule.
    pub fn us_equities() -> Self {
        Self::new(us_equity_registry())
    }

    /// Overrides the non-trading run length treated as a data defect.
    pub fn with_scan_limit(mut self, scan_limit: u32) -> Self {
        self.scan_limit = scan_limit.max(1);
        self
    }

    /// The underlying registry.
    pub fn registry(&self) -> &HolidayRegistry {
        &self.registry
    }

    /// True if the date is a Saturday or Sunday. Malformed input is not.
    pub fn is_weekend(&self, date: impl CalendarDate) -> bool {
        date.to_date().is_some_and(|d| d.is_weekend())
    }

    /// True if the date is neither a weekend nor a holiday of any kind.
    /// Malformed input is never a trading day.
    pub fn is_trading_day(&self, date: impl CalendarDate) -> bool {
        date.to_date()
            .is_some_and(|d| self.is_trading_date(d))
    }

    /// Full classification of a date, or `None` for malformed input.
    pub fn classify(&self, date: impl CalendarDate) -> Option<TradingDayClassification> {
        let date = date.to_date()?;
        let holiday = self.registry.holiday(date).cloned();
        Some(TradingDayClassification {
            date,
            is_weekend: date.is_weekend(),
            is_holiday: holiday.is_some(),
            is_early_close: holiday.as_ref().is_some_and(Holiday::is_early_close),
            holiday,
        })
    }

    /// The first trading day strictly after `date`.
    pub fn next_trading_day(&self, date: Date) -> PlanResult<Date> {
        self.step_to_trading_day(date, 1)
    }

    /// The last trading day strictly before `date`.
    pub fn previous_trading_day(&self, date: Date) -> PlanResult<Date> {
        self.step_to_trading_day(date, -1)
    }

    /// The `n`th trading day after `date`.
    ///
    /// The start date is never counted, whether or not it trades. `n = 0`
    /// returns `date` unchanged.
    pub fn add_trading_days(&self, date: Date, n: u32) -> PlanResult<Date> {
        let mut current = date;
        for _ in 0..n {
            current = self.next_trading_day(current)?;
        }
        Ok(current)
    }

    /// Number of trading days `d` with `start <= d <= end`.
    ///
    /// Both endpoints count when they are trading days. Returns 0 when
    /// `end < start`.
    ///
    /// # Errors
    ///
    /// Returns `PlanError::ScanLimitExceeded` if the range spans more
    /// calendar days than the scan limit.
    pub fn count_trading_days(&self, start: Date, end: Date) -> PlanResult<u32> {
        if end < start {
            return Ok(0);
        }

        let span = start.days_between(&end) + 1;
        if span > i64::from(self.scan_limit) {
            return Err(self.scan_exceeded(start));
        }

        let mut count = 0;
        let mut current = start;
        while current <= end {
            if self.is_trading_date(current) {
                count += 1;
            }
            match current.checked_add_days(1) {
                Some(next) => current = next,
                None => break,
            }
        }

        Ok(count)
    }

    fn is_trading_date(&self, date: Date) -> bool {
        !date.is_weekend() && !self.registry.is_holiday(date)
    }

    fn step_to_trading_day(&self, start: Date, direction: i64) -> PlanResult<Date> {
        let mut current = start;
        for _ in 0..self.scan_limit {
            current = current.checked_add_days(direction).ok_or_else(|| {
                PlanError::invalid_date(format!("no trading day reachable from {start}"))
            })?;
            if self.is_trading_date(current) {
                return Ok(current);
            }
        }
        Err(self.scan_exceeded(start))
    }

    fn scan_exceeded(&self, start: Date) -> PlanError {
        tracing::warn!(
            registry = self.registry.name(),
            %start,
            limit = self.scan_limit,
            "trading-day scan limit exceeded; holiday data is malformed"
        );
        PlanError::ScanLimitExceeded {
            start: start.to_string(),
            limit: self.scan_limit,
        }
    }
}

impl Default for TradingDayCalendar {
    fn default() -> Self {
        Self::us_equities()
    }
}
