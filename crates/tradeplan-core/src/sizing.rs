//! Position sizing from account risk.
//!
//! ```text
//! risk_amount    = balance * risk_pct / 100 * multiplier
//! per_share_risk = entry - stop
//! shares         = floor(risk_amount / per_share_risk)
//! ```

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{PlanError, PlanResult};
use crate::planner::ExitPlan;

/// Number of whole shares to buy.
///
/// A non-positive balance or risk percentage is a "do not trade" request
/// and sizes to zero.
///
/// # Errors
///
/// `InvalidArgument` if the stop is not below entry, an intermediate
/// amount leaves the decimal range, or the result does not fit in a `u64`.
pub fn size_position(
    account_balance: Decimal,
    risk_pct_per_trade: Decimal,
    entry_price: Decimal,
    stop_loss_price: Decimal,
    tier_multiplier: Decimal,
) -> PlanResult<u64> {
    let per_share_risk = entry_price
        .checked_sub(stop_loss_price)
        .ok_or_else(|| out_of_range("stop_loss_price"))?;
    if per_share_risk <= Decimal::ZERO {
        return Err(PlanError::invalid_argument(
            "stop_loss_price",
            format!("stop {stop_loss_price} must be below entry {entry_price}"),
        ));
    }

    if account_balance <= Decimal::ZERO || risk_pct_per_trade <= Decimal::ZERO {
        return Ok(0);
    }

    let risk_amount = account_balance
        .checked_mul(risk_pct_per_trade)
        .and_then(|d| d.checked_div(Decimal::ONE_HUNDRED))
        .and_then(|d| d.checked_mul(tier_multiplier))
        .ok_or_else(|| out_of_range("account_balance"))?;
    let shares = risk_amount
        .checked_div(per_share_risk)
        .ok_or_else(|| out_of_range("stop_loss_price"))?
        .floor();
    if shares <= Decimal::ZERO {
        return Ok(0);
    }

    let shares = shares.to_u64().ok_or_else(|| {
        PlanError::invalid_argument("account_balance", format!("{shares} shares overflows"))
    })?;

    tracing::debug!(
        %account_balance,
        %risk_pct_per_trade,
        %risk_amount,
        %per_share_risk,
        shares,
        "sized position"
    );

    Ok(shares)
}

fn out_of_range(argument: &'static str) -> PlanError {
    PlanError::invalid_argument(argument, "value out of decimal range")
}

/// Account-level sizing settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionSizer {
    /// Account equity.
    pub account_balance: Decimal,
    /// Percent of equity risked per trade before the tier multiplier.
    pub risk_pct_per_trade: Decimal,
}

impl PositionSizer {
    /// Creates a sizer.
    pub fn new(account_balance: Decimal, risk_pct_per_trade: Decimal) -> Self {
        Self {
            account_balance,
            risk_pct_per_trade,
        }
    }

    /// Sizes a position for explicit prices.
    pub fn size(
        &self,
        entry_price: Decimal,
        stop_loss_price: Decimal,
        tier_multiplier: Decimal,
    ) -> PlanResult<u64> {
        size_position(
            self.account_balance,
            self.risk_pct_per_trade,
            entry_price,
            stop_loss_price,
            tier_multiplier,
        )
    }

    /// Sizes a position for a plan, using its stop and tier multiplier.
    pub fn size_for_plan(&self, plan: &ExitPlan) -> PlanResult<u64> {
        self.size(
            plan.entry_price,
            plan.stop_loss_price,
            plan.tier.size_multiplier,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::planner::ExitPlanner;
    use crate::types::Date;
    use rust_decimal_macros::dec;

    #[test]
    fn test_basic_sizing() {
        // 100_000 * 1% * 1.0 = 1000 risk, 4 per share
        let shares = size_position(dec!(100000), dec!(1), dec!(100), dec!(96), dec!(1)).unwrap();
        assert_eq!(shares, 250);
    }

    #[test]
    fn test_rounds_down() {
        // 50_000 * 1% * 1.1 = 550 risk, 4.52 per share -> 121.68
        let shares =
            size_position(dec!(50000), dec!(1), dec!(45.20), dec!(40.68), dec!(1.1)).unwrap();
        assert_eq!(shares, 121);
    }

    #[test]
    fn test_zero_risk_is_zero_shares() {
        assert_eq!(size_position(dec!(0), dec!(1), dec!(10), dec!(9), dec!(1)).unwrap(), 0);
        assert_eq!(size_position(dec!(-5), dec!(1), dec!(10), dec!(9), dec!(1)).unwrap(), 0);
        assert_eq!(size_position(dec!(1000), dec!(0), dec!(10), dec!(9), dec!(1)).unwrap(), 0);
        // Risk smaller than one share
        assert_eq!(size_position(dec!(100), dec!(1), dec!(10), dec!(8), dec!(1)).unwrap(), 0);
    }

    #[test]
    fn test_stop_at_or_above_entry_rejected() {
        for stop in [dec!(10), dec!(10.5)] {
            let err = size_position(dec!(1000), dec!(1), dec!(10), stop, dec!(1)).unwrap_err();
            assert!(matches!(
                err,
                PlanError::InvalidArgument { argument: "stop_loss_price", .. }
            ));
        }
    }

    #[test]
    fn test_stop_checked_before_zero_balance() {
        assert!(size_position(dec!(0), dec!(1), dec!(10), dec!(11), dec!(1)).is_err());
    }

    #[test]
    fn test_sliver_of_risk_per_share_is_an_error() {
        // 10_000 risk over 1e-27 per share leaves the decimal range
        let stop = dec!(10) - Decimal::new(1, 27);
        let err = size_position(dec!(1000000), dec!(1), dec!(10), stop, dec!(1)).unwrap_err();
        assert!(matches!(
            err,
            PlanError::InvalidArgument { argument: "stop_loss_price", .. }
        ));
    }

    #[test]
    fn test_oversized_inputs_are_errors() {
        assert!(size_position(Decimal::MAX, dec!(200), dec!(10), dec!(9), dec!(1)).is_err());
        assert!(size_position(dec!(1000), dec!(1), Decimal::MAX, Decimal::MIN, dec!(1)).is_err());
        // Representable but beyond u64
        let balance = Decimal::from_i128_with_scale(10_i128.pow(25), 0);
        assert!(matches!(
            size_position(balance, dec!(100), dec!(1), dec!(0.5), dec!(1)),
            Err(PlanError::InvalidArgument { argument: "account_balance", .. })
        ));
    }

    #[test]
    fn test_size_for_plan_uses_tier_multiplier() {
        let plan = ExitPlanner::standard()
            .plan_exit(Date::from_ymd(2025, 3, 3).unwrap(), dec!(100), 45.0)
            .unwrap();
        // Extreme: stop -18%, multiplier 1.4; 10_000 * 2% * 1.4 = 280, 18 per share
        let sizer = PositionSizer::new(dec!(10000), dec!(2));
        assert_eq!(sizer.size_for_plan(&plan).unwrap(), 15);
    }
}
