//! # Tradeplan Core
//!
//! Trading-day calendars, volatility tiers and exit planning for swing-trade
//! entries.
//!
//! This crate provides:
//!
//! - **Calendars**: holiday registry and trading-day arithmetic that skips
//!   weekends, exchange closures and early-close sessions
//! - **Tiers**: a volatility-indexed table of stop, target, holding-period
//!   and sizing parameters
//! - **Planner**: one call from (entry date, entry price, volatility) to a
//!   complete exit plan
//! - **Sizing**: share counts from account risk and the tier multiplier
//!
//! Everything is pure and synchronous over immutable tables.
//!
//! ## Example
//!
//! ```rust
//! use tradeplan_core::prelude::*;
//! use rust_decimal_macros::dec;
//!
//! let planner = ExitPlanner::standard();
//! let plan = planner
//!     .plan_exit(Date::from_ymd(2025, 3, 3).unwrap(), dec!(45.20), 22.4)
//!     .unwrap();
//!
//! assert_eq!(plan.tier.label, "Elevated");
//! assert_eq!(plan.stop_loss_price, dec!(40.68));
//!
//! let shares = PositionSizer::new(dec!(50000), dec!(1)).size_for_plan(&plan).unwrap();
//! assert_eq!(shares, 121);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::float_cmp)]
#![allow(clippy::too_many_arguments)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::trivially_copy_pass_by_ref)]

pub mod calendars;
pub mod error;
pub mod input;
pub mod overlay;
pub mod planner;
pub mod sizing;
pub mod tiers;
pub mod types;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::calendars::{
        Holiday, HolidayKind, HolidayRegistry, TradingDayCalendar, TradingDayClassification,
    };
    pub use crate::error::{PlanError, PlanResult};
    pub use crate::input::TradeTicket;
    pub use crate::overlay::{price_at, true_range, Bar, BreadthRegime, ExitOverlay, PriceBasis};
    pub use crate::planner::{ExitPlan, ExitPlanner, HoldingStatus};
    pub use crate::sizing::{size_position, PositionSizer};
    pub use crate::tiers::{VolatilityTier, VolatilityTierTable};
    pub use crate::types::{CalendarDate, Date};
}

// Re-export commonly used types at crate root
pub use error::{PlanError, PlanResult};
pub use planner::{ExitPlan, ExitPlanner};
pub use types::Date;
