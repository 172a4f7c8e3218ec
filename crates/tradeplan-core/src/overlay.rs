//! Exit overlays: true-range widening and market-breadth scaling.
//!
//! Tier levels are fixed percentages. An overlay can push the stop and the
//! profit targets further out when the instrument's own range is wider
//! than the tier assumes, and tighten or widen the stop with market
//! breadth.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::{PlanError, PlanResult};

/// Breadth reading below which the stop is tightened.
pub const WEAK_BREADTH_BELOW: Decimal = dec!(20);
/// Breadth reading above which the stop is widened.
pub const STRONG_BREADTH_ABOVE: Decimal = dec!(60);

/// One daily OHLC bar (open is not needed).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bar {
    /// Session high.
    pub high: Decimal,
    /// Session low.
    pub low: Decimal,
    /// Session close.
    pub close: Decimal,
}

impl Bar {
    /// Creates a bar.
    pub fn new(high: Decimal, low: Decimal, close: Decimal) -> Self {
        Self { high, low, close }
    }
}

/// True range of the first bars after entry.
///
/// - no bars: `None`
/// - one bar: `high - low`
/// - two or more: true range of the second bar against the first close,
///   `max(high - low, |high - prev_close|, |low - prev_close|)`
pub fn true_range(bars: &[Bar]) -> Option<Decimal> {
    match bars {
        [] => None,
        [only] => only.high.checked_sub(only.low),
        [prev, bar, ..] => {
            let high_low = bar.high.checked_sub(bar.low)?;
            let high_prev = bar.high.checked_sub(prev.close)?.abs();
            let low_prev = bar.low.checked_sub(prev.close)?.abs();
            Some(high_low.max(high_prev).max(low_prev))
        }
    }
}

/// Market breadth regime from a T2108-style reading (percent of stocks
/// above their 40-day average).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BreadthRegime {
    /// Reading below 20: stop tightened to 80%.
    Weak,
    /// Reading between 20 and 60 inclusive: unchanged.
    Neutral,
    /// Reading above 60: stop widened to 120%.
    Strong,
}

impl BreadthRegime {
    /// Classifies a breadth reading.
    pub fn from_reading(reading: Decimal) -> Self {
        if reading < WEAK_BREADTH_BELOW {
            BreadthRegime::Weak
        } else if reading > STRONG_BREADTH_ABOVE {
            BreadthRegime::Strong
        } else {
            BreadthRegime::Neutral
        }
    }

    /// Factor applied to the stop percentage.
    pub fn stop_factor(&self) -> Decimal {
        match self {
            BreadthRegime::Weak => dec!(0.8),
            BreadthRegime::Neutral => Decimal::ONE,
            BreadthRegime::Strong => dec!(1.2),
        }
    }
}

/// Which input set a price level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PriceBasis {
    /// The tier's fixed percentage.
    #[default]
    Percent,
    /// A true-range distance, because it was further from entry.
    TrueRange,
}

/// Optional adjustments to tier levels.
///
/// The stop multiplier applies whenever a true range is set. Target
/// multipliers are opt-in per target; breadth only moves the stop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ExitOverlay {
    /// Recent true range in price units.
    pub true_range: Option<Decimal>,
    /// Multiple of the true range the stop must clear.
    pub true_range_multiplier: Decimal,
    /// Multiple of the true range the first target must reach.
    #[serde(default)]
    pub target1_true_range_multiplier: Option<Decimal>,
    /// Multiple of the true range the second target must reach.
    #[serde(default)]
    pub target2_true_range_multiplier: Option<Decimal>,
    /// Breadth reading, percent.
    pub breadth: Option<Decimal>,
}

impl ExitOverlay {
    /// Overlay with only a true-range stop requirement.
    pub fn true_range(true_range: Decimal, multiplier: Decimal) -> Self {
        Self {
            true_range: Some(true_range),
            true_range_multiplier: multiplier,
            ..Self::default()
        }
    }

    /// Adds true-range multiples for the two profit targets.
    pub fn with_target_multipliers(mut self, target1: Decimal, target2: Decimal) -> Self {
        self.target1_true_range_multiplier = Some(target1);
        self.target2_true_range_multiplier = Some(target2);
        self
    }

    /// Adds a breadth reading.
    pub fn with_breadth(mut self, reading: Decimal) -> Self {
        self.breadth = Some(reading);
        self
    }

    /// Effective stop percentage for a tier stop and entry price.
    ///
    /// Takes the more distant of the tier stop and the true-range stop,
    /// then scales by breadth.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` for a negative true range or multiplier, when the
    /// adjusted stop lands at or below zero, or on arithmetic overflow.
    pub fn apply(
        &self,
        tier_stop_pct: Decimal,
        entry_price: Decimal,
    ) -> PlanResult<(Decimal, PriceBasis)> {
        let (mut pct, basis) = match self.true_range {
            Some(tr) => {
                check_non_negative("true_range", tr)?;
                check_non_negative("true_range_multiplier", self.true_range_multiplier)?;
                let tr_pct = tr
                    .checked_mul(self.true_range_multiplier)
                    .and_then(|d| d.checked_div(entry_price))
                    .and_then(|d| d.checked_mul(Decimal::ONE_HUNDRED))
                    .ok_or_else(|| overflow("true_range"))?;
                if -tr_pct < tier_stop_pct {
                    (-tr_pct, PriceBasis::TrueRange)
                } else {
                    (tier_stop_pct, PriceBasis::Percent)
                }
            }
            None => (tier_stop_pct, PriceBasis::Percent),
        };

        if let Some(reading) = self.breadth {
            pct = pct
                .checked_mul(BreadthRegime::from_reading(reading).stop_factor())
                .ok_or_else(|| overflow("breadth"))?;
        }

        if pct <= dec!(-100) {
            return Err(PlanError::invalid_argument(
                "overlay",
                format!("stop of {pct}% would be at or below zero"),
            ));
        }

        Ok((pct, basis))
    }

    /// Target price for a tier target percentage.
    ///
    /// With a true range and a multiplier set, the target is the further
    /// of `entry * (1 + pct / 100)` and `entry + true_range * multiplier`.
    pub fn apply_target(
        &self,
        tier_target_pct: Decimal,
        multiplier: Option<Decimal>,
        entry_price: Decimal,
    ) -> PlanResult<(Decimal, PriceBasis)> {
        let base = price_at(entry_price, tier_target_pct)?;
        let (Some(tr), Some(multiplier)) = (self.true_range, multiplier) else {
            return Ok((base, PriceBasis::Percent));
        };

        check_non_negative("true_range", tr)?;
        check_non_negative("target_true_range_multiplier", multiplier)?;
        let tr_target = tr
            .checked_mul(multiplier)
            .and_then(|d| entry_price.checked_add(d))
            .ok_or_else(|| overflow("true_range"))?;

        if tr_target > base {
            Ok((tr_target, PriceBasis::TrueRange))
        } else {
            Ok((base, PriceBasis::Percent))
        }
    }
}

/// `entry * (1 + pct / 100)`
///
/// # Errors
///
/// `InvalidArgument` naming `entry_price` when the product overflows.
pub fn price_at(entry_price: Decimal, pct: Decimal) -> PlanResult<Decimal> {
    pct.checked_div(Decimal::ONE_HUNDRED)
        .and_then(|d| Decimal::ONE.checked_add(d))
        .and_then(|d| entry_price.checked_mul(d))
        .ok_or_else(|| overflow("entry_price"))
}

fn check_non_negative(argument: &'static str, value: Decimal) -> PlanResult<()> {
    if value < Decimal::ZERO {
        return Err(PlanError::invalid_argument(
            argument,
            format!("must not be negative, got {value}"),
        ));
    }
    Ok(())
}

fn overflow(argument: &'static str) -> PlanError {
    PlanError::invalid_argument(argument, "value out of decimal range")
}
