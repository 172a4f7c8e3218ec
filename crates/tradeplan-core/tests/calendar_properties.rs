//! Property tests for trading-day calendar invariants.
//!
//! 1. Totality: classification never fails, whatever the input text
//! 2. Partition: every date is exactly one of weekend, holiday, trading day
//! 3. Navigation: next/previous are strict and skip nothing
//! 4. Arithmetic: `add_trading_days` and `count_trading_days` agree

use proptest::prelude::*;
use tradeplan_core::calendars::{us_equity_registry, HolidayKind, TradingDayCalendar};
use tradeplan_core::types::Date;

// ── Strategies (proptest) ────────────────────────────────────────────

/// Dates from mid-2023 to mid-2027, straddling the bundled schedule.
fn arb_date() -> impl Strategy<Value = Date> {
    (0i64..1500).prop_map(|offset| Date::from_ymd(2023, 6, 1).unwrap().add_days(offset))
}

fn arb_hold() -> impl Strategy<Value = u32> {
    0u32..40
}

// ── 1. Totality ──────────────────────────────────────────────────────

proptest! {
    /// Arbitrary text is classified without panicking, and text that is
    /// not a date is never a trading day, weekend or holiday.
    #[test]
    fn classification_is_total(text in ".{0,16}") {
        let cal = TradingDayCalendar::us_equities();
        let trading = cal.is_trading_day(text.as_str());
        let weekend = cal.is_weekend(text.as_str());
        let holiday = cal.registry().is_holiday(text.as_str());
        if Date::parse(&text).is_err() {
            prop_assert!(!trading && !weekend && !holiday);
        }
    }

    /// ISO text classifies the same as the parsed date.
    #[test]
    fn text_and_date_agree(date in arb_date()) {
        let cal = TradingDayCalendar::us_equities();
        let text = date.to_string();
        prop_assert_eq!(cal.is_trading_day(text.as_str()), cal.is_trading_day(date));
        prop_assert_eq!(cal.is_weekend(text.as_str()), cal.is_weekend(date));
    }
}

// ── 2. Partition ─────────────────────────────────────────────────────

proptest! {
    /// A trading day is never a weekend nor any kind of holiday.
    #[test]
    fn trading_days_exclude_weekends_and_holidays(date in arb_date()) {
        let cal = TradingDayCalendar::us_equities();
        let c = cal.classify(date).unwrap();
        prop_assert_eq!(c.is_trading_day(), !c.is_weekend && !c.is_holiday);
        if c.is_early_close {
            prop_assert!(c.is_holiday);
            prop_assert!(!cal.is_trading_day(date));
        }
        if cal.is_trading_day(date) {
            prop_assert!(!cal.is_weekend(date));
            prop_assert!(!cal.registry().is_holiday(date));
        }
    }
}

/// Every registry entry, closure or early close, is excluded.
#[test]
fn every_registry_entry_is_non_trading() {
    let cal = TradingDayCalendar::us_equities();
    let registry = us_equity_registry();
    let mut kinds = (0, 0);
    for holiday in registry.holidays() {
        assert!(!cal.is_trading_day(holiday.date), "{} ({})", holiday.date, holiday.name);
        assert!(!cal.is_trading_day(holiday.date.to_string().as_str()));
        match holiday.kind {
            HolidayKind::FullClosure => kinds.0 += 1,
            HolidayKind::EarlyClose => kinds.1 += 1,
        }
        if let Ok(next) = cal.next_trading_day(holiday.date.add_days(-1)) {
            assert_ne!(next, holiday.date);
        }
    }
    assert!(kinds.0 > 0 && kinds.1 > 0);
}

// ── 3. Navigation ────────────────────────────────────────────────────

proptest! {
    /// next_trading_day is strictly later and nothing in between trades.
    #[test]
    fn next_is_strict_and_tight(date in arb_date()) {
        let cal = TradingDayCalendar::us_equities();
        let next = cal.next_trading_day(date).unwrap();
        prop_assert!(next > date);
        prop_assert!(cal.is_trading_day(next));
        let mut d = date.add_days(1);
        while d < next {
            prop_assert!(!cal.is_trading_day(d));
            d = d.add_days(1);
        }
    }

    /// previous_trading_day is strictly earlier and nothing in between trades.
    #[test]
    fn previous_is_strict_and_tight(date in arb_date()) {
        let cal = TradingDayCalendar::us_equities();
        let prev = cal.previous_trading_day(date).unwrap();
        prop_assert!(prev < date);
        prop_assert!(cal.is_trading_day(prev));
        let mut d = prev.add_days(1);
        while d < date {
            prop_assert!(!cal.is_trading_day(d));
            d = d.add_days(1);
        }
    }

    /// Stepping forward then back returns to a trading day unchanged.
    #[test]
    fn next_then_previous_round_trips_on_trading_days(date in arb_date()) {
        let cal = TradingDayCalendar::us_equities();
        prop_assume!(cal.is_trading_day(date));
        let next = cal.next_trading_day(date).unwrap();
        prop_assert_eq!(cal.previous_trading_day(next).unwrap(), date);
    }
}

// ── 4. Arithmetic ────────────────────────────────────────────────────

proptest! {
    /// Adding zero is the identity; adding n lands on a trading day.
    #[test]
    fn add_trading_days_lands_on_trading_day(date in arb_date(), n in arb_hold()) {
        let cal = TradingDayCalendar::us_equities();
        let end = cal.add_trading_days(date, n).unwrap();
        if n == 0 {
            prop_assert_eq!(end, date);
        } else {
            prop_assert!(end > date);
            prop_assert!(cal.is_trading_day(end));
        }
    }

    /// More trading days never lands earlier.
    #[test]
    fn add_trading_days_is_monotonic(date in arb_date(), a in arb_hold(), b in arb_hold()) {
        let cal = TradingDayCalendar::us_equities();
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(cal.add_trading_days(date, lo).unwrap() <= cal.add_trading_days(date, hi).unwrap());
        if lo < hi {
            prop_assert!(cal.add_trading_days(date, lo).unwrap() < cal.add_trading_days(date, hi).unwrap());
        }
    }

    /// The start is never counted: exactly n trading days lie in
    /// (date, add_trading_days(date, n)].
    #[test]
    fn add_and_count_agree(date in arb_date(), n in arb_hold()) {
        let cal = TradingDayCalendar::us_equities();
        let end = cal.add_trading_days(date, n).unwrap();
        prop_assert_eq!(cal.count_trading_days(date.add_days(1), end).unwrap(), n);
    }

    /// Counting is inclusive and splits additively.
    #[test]
    fn count_is_inclusive_and_additive(a in arb_date(), b in arb_date()) {
        let cal = TradingDayCalendar::us_equities();
        let (start, end) = if a <= b { (a, b) } else { (b, a) };

        prop_assert_eq!(
            cal.count_trading_days(start, start).unwrap(),
            u32::from(cal.is_trading_day(start))
        );
        if start < end {
            prop_assert_eq!(cal.count_trading_days(end, start).unwrap(), 0);
        }

        let mid = start.add_days(start.days_between(&end) / 2);
        let whole = cal.count_trading_days(start, end).unwrap();
        let left = cal.count_trading_days(start, mid).unwrap();
        let right = cal.count_trading_days(mid.add_days(1), end).unwrap();
        prop_assert_eq!(whole, left + right);
    }
}
