//! Exit planning: the entry point that turns an entry into a complete plan.
//!
//! [`ExitPlanner`] composes a [`TradingDayCalendar`] and a
//! [`VolatilityTierTable`]. Planning is a pure function of its arguments;
//! a planner can be shared freely between threads.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::calendars::TradingDayCalendar;
use crate::error::{PlanError, PlanResult};
use crate::input::TradeTicket;
use crate::overlay::{price_at, ExitOverlay, PriceBasis};
use crate::tiers::{VolatilityTier, VolatilityTierTable};
use crate::types::Date;

/// A complete exit plan for one long entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExitPlan {
    /// Entry date as given (need not be a trading day).
    pub entry_date: Date,
    /// Entry price, strictly positive.
    pub entry_price: Decimal,
    /// Volatility reading the tier was chosen from.
    pub volatility: f64,
    /// The tier the reading resolved to.
    pub tier: VolatilityTier,
    /// Latest exit: `max_holding_trading_days` trading days after entry.
    pub exit_date: Date,
    /// Effective stop distance in percent (negative).
    pub stop_loss_pct: Decimal,
    /// Whether the stop came from the tier or a true-range overlay.
    pub stop_basis: PriceBasis,
    /// Stop price.
    pub stop_loss_price: Decimal,
    /// First target price; `None` when the tier has no first target.
    pub profit_target1_price: Option<Decimal>,
    /// Basis of the first target, present with the price.
    pub profit_target1_basis: Option<PriceBasis>,
    /// Second target price.
    pub profit_target2_price: Decimal,
    /// Basis of the second target.
    pub profit_target2_basis: PriceBasis,
}

impl ExitPlan {
    /// Risk per share: entry minus stop.
    #[must_use]
    pub fn risk_per_share(&self) -> Decimal {
        self.entry_price.saturating_sub(self.stop_loss_price)
    }

    /// Reward-to-risk ratio at the second target.
    #[must_use]
    pub fn reward_to_risk(&self) -> Option<Decimal> {
        let risk = self.risk_per_share();
        if risk.is_zero() {
            return None;
        }
        self.profit_target2_price
            .checked_sub(self.entry_price)?
            .checked_div(risk)
    }
}

/// Progress of an open position against its plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HoldingStatus {
    /// Trading days after entry up to and including the as-of date.
    pub trading_days_held: u32,
    /// Trading days left before the exit date, never negative.
    pub trading_days_remaining: u32,
    /// True on or after the exit date.
    pub exit_due: bool,
}

/// Builds exit plans from a calendar and a tier table.
///
/// # Example
///
/// ```
/// use rust_decimal_macros::dec;
/// use tradeplan_core::planner::ExitPlanner;
/// use tradeplan_core::types::Date;
///
/// let planner = ExitPlanner::standard();
/// let plan = planner
///     .plan_exit(Date::from_ymd(2025, 3, 3).unwrap(), dec!(100), 10.5)
///     .unwrap();
///
/// assert_eq!(plan.tier.label, "Ultra-Low");
/// assert_eq!(plan.stop_loss_price, dec!(96));
/// assert_eq!(plan.profit_target1_price, Some(dec!(104)));
/// assert_eq!(plan.profit_target2_price, dec!(110));
/// ```
#[derive(Debug, Clone)]
pub struct ExitPlanner {
    calendar: TradingDayCalendar,
    tiers: VolatilityTierTable,
}

impl ExitPlanner {
    /// Creates a planner.
    pub fn new(calendar: TradingDayCalendar, tiers: VolatilityTierTable) -> Self {
        Self { calendar, tiers }
    }

    /// Planner over the bundled US equity calendar and standard tiers.
    pub fn standard() -> Self {
        Self::new(TradingDayCalendar::us_equities(), VolatilityTierTable::standard())
    }

    /// The calendar.
    pub fn calendar(&self) -> &TradingDayCalendar {
        &self.calendar
    }

    /// The tier table.
    pub fn tiers(&self) -> &VolatilityTierTable {
        &self.tiers
    }

    /// Plans an exit from the tier for `volatility`.
    ///
    /// # Errors
    ///
    /// - `InvalidArgument` if `entry_price <= 0`
    /// - `ScanLimitExceeded` if the holiday data leaves no reachable exit date
    pub fn plan_exit(
        &self,
        entry_date: Date,
        entry_price: Decimal,
        volatility: f64,
    ) -> PlanResult<ExitPlan> {
        self.plan_exit_with_overlay(entry_date, entry_price, volatility, &ExitOverlay::default())
    }

    /// Plans an exit with levels adjusted by an overlay.
    ///
    /// The exit date matches [`ExitPlanner::plan_exit`]. The stop moves
    /// with the overlay's true range and breadth; each target moves only
    /// when the overlay carries a multiplier for it.
    pub fn plan_exit_with_overlay(
        &self,
        entry_date: Date,
        entry_price: Decimal,
        volatility: f64,
        overlay: &ExitOverlay,
    ) -> PlanResult<ExitPlan> {
        if entry_price <= Decimal::ZERO {
            return Err(PlanError::invalid_argument(
                "entry_price",
                format!("must be positive, got {entry_price}"),
            ));
        }

        let tier = self.tiers.tier_for(volatility);
        let exit_date = self
            .calendar
            .add_trading_days(entry_date, tier.max_holding_trading_days)?;
        let (stop_loss_pct, stop_basis) = overlay.apply(tier.stop_loss_pct, entry_price)?;
        let target1 = tier
            .profit_target1_pct
            .map(|pct| {
                overlay.apply_target(pct, overlay.target1_true_range_multiplier, entry_price)
            })
            .transpose()?;
        let (profit_target2_price, profit_target2_basis) = overlay.apply_target(
            tier.profit_target2_pct,
            overlay.target2_true_range_multiplier,
            entry_price,
        )?;

        let plan = ExitPlan {
            entry_date,
            entry_price,
            volatility,
            tier: tier.clone(),
            exit_date,
            stop_loss_pct,
            stop_basis,
            stop_loss_price: price_at(entry_price, stop_loss_pct)?,
            profit_target1_price: target1.map(|(price, _)| price),
            profit_target1_basis: target1.map(|(_, basis)| basis),
            profit_target2_price,
            profit_target2_basis,
        };

        tracing::debug!(
            %entry_date,
            %entry_price,
            volatility,
            tier = %plan.tier.label,
            %exit_date,
            stop = %plan.stop_loss_price,
            ?stop_basis,
            target2 = %plan.profit_target2_price,
            target2_basis = ?plan.profit_target2_basis,
            "planned exit"
        );

        Ok(plan)
    }

    /// Plans an exit from a parsed ticket.
    pub fn plan_ticket(&self, ticket: &TradeTicket) -> PlanResult<ExitPlan> {
        self.plan_exit(ticket.entry_date, ticket.entry_price, ticket.volatility)
    }

    /// Where a position stands against its plan on `as_of`.
    ///
    /// # Errors
    ///
    /// `ScanLimitExceeded` if `as_of` is further from entry than the
    /// calendar's scan limit.
    pub fn holding_status(&self, plan: &ExitPlan, as_of: Date) -> PlanResult<HoldingStatus> {
        let trading_days_held = match plan.entry_date.checked_add_days(1) {
            Some(first) if first <= as_of => self.calendar.count_trading_days(first, as_of)?,
            _ => 0,
        };

        Ok(HoldingStatus {
            trading_days_held,
            trading_days_remaining: plan
                .tier
                .max_holding_trading_days
                .saturating_sub(trading_days_held),
            exit_due: as_of >= plan.exit_date,
        })
    }
}

impl Default for ExitPlanner {
    fn default() -> Self {
        Self::standard()
    }
}
