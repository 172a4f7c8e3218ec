//! Bundled US equity exchange holiday schedule.
//!
//! ## Full closures
//!
//! - New Year's Day, Martin Luther King Jr. Day, Presidents' Day
//! - Good Friday, Memorial Day, Juneteenth, Independence Day
//! - Labor Day, Thanksgiving Day, Christmas Day
//! - Unscheduled closures the exchange announced (2025-01-09)
//!
//! ## Early closes (13:00 ET)
//!
//! - Day before Independence Day (when it is a weekday session)
//! - Day after Thanksgiving
//! - Christmas Eve (when it is a weekday session)
//!
//! A new year is added by appending its rows to [`US_EQUITY_HOLIDAYS`] and
//! redeploying.

use std::sync::{Arc, OnceLock};

use super::holiday::{Holiday, HolidayKind};
use super::registry::HolidayRegistry;
use crate::error::PlanResult;
use crate::types::Date;

/// Name of the bundled registry.
pub const US_EQUITIES: &str = "US Equities";

/// Session end on early-close days.
pub const EARLY_CLOSE_TIME: &str = "13:00";

use HolidayKind::{EarlyClose, FullClosure};

/// (year, month, day, name, kind)
#[rustfmt::skip]
pub const US_EQUITY_HOLIDAYS: &[(i32, u32, u32, &str, HolidayKind)] = &[
    // 2024
    (2024,  1,  1, "New Year's Day", FullClosure),
    (2024,  1, 15, "Martin Luther King Jr. Day", FullClosure),
    (2024,  2, 19, "Presidents' Day", FullClosure),
    (2024,  3, 29, "Good Friday", FullClosure),
    (2024,  5, 27, "Memorial Day", FullClosure),
    (2024,  6, 19, "Juneteenth", FullClosure),
    (2024,  7,  3, "Independence Day Eve", EarlyClose),
    (2024,  7,  4, "Independence Day", FullClosure),
    (2024,  9,  2, "Labor Day", FullClosure),
    (2024, 11, 28, "Thanksgiving Day", FullClosure),
    (2024, 11, 29, "Day after Thanksgiving", EarlyClose),
    (2024, 12, 24, "Christmas Eve", EarlyClose),
    (2024, 12, 25, "Christmas Day", FullClosure),
    // 2025
    (2025,  1,  1, "New Year's Day", FullClosure),
    (2025,  1,  9, "National Day of Mourning", FullClosure),
    (2025,  1, 20, "Martin Luther King Jr. Day", FullClosure),
    (2025,  2, 17, "Presidents' Day", FullClosure),
    (2025,  4, 18, "Good Friday", FullClosure),
    (2025,  5, 26, "Memorial Day", FullClosure),
    (2025,  6, 19, "Juneteenth", FullClosure),
    (2025,  7,  3, "Independence Day Eve", EarlyClose),
    (2025,  7,  4, "Independence Day", FullClosure),
    (2025,  9,  1, "Labor Day", FullClosure),
    (2025, 11, 27, "Thanksgiving Day", FullClosure),
    (2025, 11, 28, "Day after Thanksgiving", EarlyClose),
    (2025, 12, 24, "Christmas Eve", EarlyClose),
    (2025, 12, 25, "Christmas Day", FullClosure),
    // 2026
    (2026,  1,  1, "New Year's Day", FullClosure),
    (2026,  1, 19, "Martin Luther King Jr. Day", FullClosure),
    (2026,  2, 16, "Presidents' Day", FullClosure),
    (2026,  4,  3, "Good Friday", FullClosure),
    (2026,  5, 25, "Memorial Day", FullClosure),
    (2026,  6, 19, "Juneteenth", FullClosure),
    (2026,  7,  3, "Independence Day (observed)", FullClosure),
    (2026,  9,  7, "Labor Day", FullClosure),
    (2026, 11, 26, "Thanksgiving Day", FullClosure),
    (2026, 11, 27, "Day after Thanksgiving", EarlyClose),
    (2026, 12, 24, "Christmas Eve", EarlyClose),
    (2026, 12, 25, "Christmas Day", FullClosure),
];

static US_EQUITY_REGISTRY: OnceLock<Arc<HolidayRegistry>> = OnceLock::new();

/// Builds a fresh registry from [`US_EQUITY_HOLIDAYS`].
pub fn build_us_equity_registry() -> PlanResult<HolidayRegistry> {
    let mut holidays = Vec::with_capacity(US_EQUITY_HOLIDAYS.len());
    for &(year, month, day, name, kind) in US_EQUITY_HOLIDAYS {
        let date = Date::from_ymd(year, month, day)?;
        holidays.push(match kind {
            FullClosure => Holiday::closure(date, name),
            EarlyClose => Holiday::early_close(date, name, EARLY_CLOSE_TIME),
        });
    }
    HolidayRegistry::new(US_EQUITIES, holidays)
}

/// Shared instance of the bundled registry.
///
/// The table is a compile-time constant checked by this module's tests, so
/// a build failure here is a data-entry defect in the table itself.
pub fn us_equity_registry() -> Arc<HolidayRegistry> {
    US_EQUITY_REGISTRY
        .get_or_init(|| {
            Arc::new(build_us_equity_registry().expect("bundled holiday table is valid"))
        })
        .clone()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Weekday;

    #[test]
    fn test_bundled_table_builds() {
        let registry = build_us_equity_registry().unwrap();
        assert_eq!(registry.len(), US_EQUITY_HOLIDAYS.len());
        assert_eq!(registry.name(), US_EQUITIES);
        assert_eq!(registry.covered_years(), Some((2024, 2026)));
    }

    #[test]
    fn test_no_entry_falls_on_a_weekend() {
        for holiday in us_equity_registry().holidays() {
            assert!(
                !holiday.date.is_weekend(),
                "{} ({}) falls on a weekend",
                holiday.date,
                holiday.name
            );
        }
    }

    #[test]
    fn test_floating_holidays_fall_on_expected_weekdays() {
        let registry = us_equity_registry();
        for holiday in registry.holidays() {
            let expected = match holiday.name.as_str() {
                "Martin Luther King Jr. Day" | "Presidents' Day" | "Memorial Day"
                | "Labor Day" => Some(Weekday::Mon),
                "Good Friday" | "Day after Thanksgiving" => Some(Weekday::Fri),
                "Thanksgiving Day" => Some(Weekday::Thu),
                _ => None,
            };
            if let Some(weekday) = expected {
                assert_eq!(holiday.date.weekday(), weekday, "{}", holiday.date);
            }
        }
    }

    #[test]
    fn test_each_year_has_ten_regular_closures() {
        let registry = us_equity_registry();
        for year in 2024..=2026 {
            let closures = registry
                .holidays_in_year(year)
                .filter(|h| h.kind == FullClosure && h.name != "National Day of Mourning")
                .count();
            assert_eq!(closures, 10, "year {year}");
        }
    }

    #[test]
    fn test_early_closes_carry_time() {
        let registry = us_equity_registry();
        let eve = registry.holiday("2025-12-24").unwrap();
        assert_eq!(eve.kind, EarlyClose);
        assert_eq!(eve.early_close_time.as_deref(), Some(EARLY_CLOSE_TIME));
        assert!(registry.is_early_close("2024-07-03"));
        assert!(!registry.is_early_close("2026-07-03"));
    }

    #[test]
    fn test_shared_instance_is_reused() {
        assert!(Arc::ptr_eq(&us_equity_registry(), &us_equity_registry()));
    }
}
