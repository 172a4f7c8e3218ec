//! Volatility tiers.
//!
//! A [`VolatilityTierTable`] maps a volatility reading (a VIX-like index
//! level) to exactly one [`VolatilityTier`] of risk parameters. Tiers are
//! half-open intervals `[lower, upper)`; the lowest starts at −∞ and the
//! highest ends at +∞, so every reading resolves.
//!
//! # Example
//!
//! ```
//! use tradeplan_core::tiers::VolatilityTierTable;
//!
//! let table = VolatilityTierTable::standard();
//! assert_eq!(table.tier_for(19.99).label, "Normal");
//! assert_eq!(table.tier_for(20.0).label, "Elevated");
//! assert_eq!(table.tier_for(-3.0).label, "Ultra-Low");
//! assert_eq!(table.tier_for(250.0).label, "Extreme");
//! ```

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashSet;
use std::path::Path;
use std::sync::OnceLock;

use crate::error::{PlanError, PlanResult};

/// One row of risk parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VolatilityTier {
    /// Display label.
    pub label: String,

    /// Inclusive lower bound; `null` in JSON for −∞.
    #[serde(with = "lower_bound", default = "lower_bound::open")]
    pub lower_bound: f64,

    /// Exclusive upper bound; `null` in JSON for +∞.
    #[serde(with = "upper_bound", default = "upper_bound::open")]
    pub upper_bound: f64,

    /// Stop distance in percent, negative (e.g. -8 for 8% below entry).
    pub stop_loss_pct: Decimal,

    /// First profit target in percent. `None` marks a configuration gap.
    #[serde(default)]
    pub profit_target1_pct: Option<Decimal>,

    /// Second profit target in percent.
    pub profit_target2_pct: Decimal,

    /// Latest exit, in trading days after entry.
    pub max_holding_trading_days: u32,

    /// Position-size scaling factor.
    pub size_multiplier: Decimal,
}

impl VolatilityTier {
    /// True if `volatility` falls inside `[lower_bound, upper_bound)`.
    ///
    /// +∞ belongs to the tier whose upper bound is +∞.
    #[must_use]
    pub fn contains(&self, volatility: f64) -> bool {
        self.lower_bound <= volatility
            && (volatility < self.upper_bound || self.upper_bound == f64::INFINITY)
    }
}

/// Ordered, gap-free partition of the volatility domain.
#[derive(Debug, Clone, PartialEq)]
pub struct VolatilityTierTable {
    tiers: Vec<VolatilityTier>,
    neutral: usize,
}

static STANDARD_TABLE: OnceLock<VolatilityTierTable> = OnceLock::new();

impl VolatilityTierTable {
    /// Builds a table, checking that the tiers partition the domain.
    ///
    /// # Errors
    ///
    /// Returns `PlanError::InvalidTierTable` on an empty table, a closed
    /// outer end, a gap or overlap between neighbours, or out-of-range
    /// risk parameters.
    pub fn new(tiers: Vec<VolatilityTier>) -> PlanResult<Self> {
        let (first, last) = match (tiers.first(), tiers.last()) {
            (Some(first), Some(last)) => (first, last),
            _ => return Err(PlanError::invalid_tier_table("no tiers")),
        };

        if first.lower_bound != f64::NEG_INFINITY {
            return Err(PlanError::invalid_tier_table(format!(
                "lowest tier '{}' must start at -inf, starts at {}",
                first.label, first.lower_bound
            )));
        }
        if last.upper_bound != f64::INFINITY {
            return Err(PlanError::invalid_tier_table(format!(
                "highest tier '{}' must end at +inf, ends at {}",
                last.label, last.upper_bound
            )));
        }

        let mut labels = HashSet::new();
        for tier in &tiers {
            validate_tier(tier)?;
            if !labels.insert(tier.label.as_str()) {
                return Err(PlanError::invalid_tier_table(format!(
                    "label '{}' is used twice",
                    tier.label
                )));
            }
        }

        for pair in tiers.windows(2) {
            if pair[0].upper_bound != pair[1].lower_bound {
                return Err(PlanError::invalid_tier_table(format!(
                    "'{}' ends at {} but '{}' starts at {}",
                    pair[0].label, pair[0].upper_bound, pair[1].label, pair[1].lower_bound
                )));
            }
        }

        let neutral = tiers
            .iter()
            .position(|t| t.size_multiplier == Decimal::ONE)
            .unwrap_or(0);

        Ok(Self { tiers, neutral })
    }

    /// The seven-tier table used by the journal.
    ///
    /// First profit targets for Low, High and Very High are not set; plans
    /// from those tiers carry no first target until a configured table
    /// supplies one.
    pub fn standard() -> Self {
        STANDARD_TABLE
            .get_or_init(|| {
                Self::new(standard_tiers()).expect("standard tier table is a valid partition")
            })
            .clone()
    }

    /// Load a table from JSON data.
    ///
    /// # JSON Format
    ///
    /// ```json
    /// {
    ///   "tiers": [
    ///     { "label": "Calm", "lower_bound": null, "upper_bound": 20.0,
    ///       "stop_loss_pct": -5, "profit_target1_pct": 5, "profit_target2_pct": 10,
    ///       "max_holding_trading_days": 4, "size_multiplier": 1.0 },
    ///     { "label": "Stormy", "lower_bound": 20.0, "upper_bound": null,
    ///       "stop_loss_pct": -12, "profit_target2_pct": 25,
    ///       "max_holding_trading_days": 7, "size_multiplier": 1.2 }
    ///   ]
    /// }
    /// ```
    pub fn from_json(json: &str) -> PlanResult<Self> {
        let data: TierTableData = serde_json::from_str(json)
            .map_err(|e| PlanError::config(format!("Failed to parse tier JSON: {e}")))?;
        Self::new(data.tiers)
    }

    /// Load a table from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> PlanResult<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| PlanError::config(format!("Failed to read file: {e}")))?;
        Self::from_json(&content)
    }

    /// Export to a pretty-printed JSON string.
    pub fn to_json(&self) -> PlanResult<String> {
        let data = TierTableData {
            tiers: self.tiers.clone(),
        };
        serde_json::to_string_pretty(&data)
            .map_err(|e| PlanError::config(format!("Failed to serialize tiers: {e}")))
    }

    /// The tier containing `volatility`.
    ///
    /// Total over `f64`: readings below or above the table clamp into the
    /// outer tiers. NaN matches no interval and falls back to the neutral
    /// tier (see [`VolatilityTierTable::neutral_tier`]).
    pub fn tier_for(&self, volatility: f64) -> &VolatilityTier {
        match self.tiers.iter().find(|t| t.contains(volatility)) {
            Some(tier) => tier,
            None => {
                let neutral = self.neutral_tier();
                tracing::warn!(
                    volatility,
                    fallback = %neutral.label,
                    "volatility reading matches no tier; using neutral tier"
                );
                neutral
            }
        }
    }

    /// First tier with a size multiplier of exactly 1, else the lowest tier.
    pub fn neutral_tier(&self) -> &VolatilityTier {
        &self.tiers[self.neutral]
    }

    /// Tiers in ascending order.
    pub fn tiers(&self) -> &[VolatilityTier] {
        &self.tiers
    }

    /// Looks a tier up by label.
    pub fn by_label(&self, label: &str) -> Option<&VolatilityTier> {
        self.tiers.iter().find(|t| t.label == label)
    }

    /// Labels of tiers without a first profit target.
    pub fn missing_profit_target1(&self) -> Vec<&str> {
        self.tiers
            .iter()
            .filter(|t| t.profit_target1_pct.is_none())
            .map(|t| t.label.as_str())
            .collect()
    }
}

impl Default for VolatilityTierTable {
    fn default() -> Self {
        Self::standard()
    }
}

fn validate_tier(tier: &VolatilityTier) -> PlanResult<()> {
    let fail = |reason: String| {
        Err(PlanError::invalid_tier_table(format!(
            "'{}': {reason}",
            tier.label
        )))
    };

    if tier.label.trim().is_empty() {
        return Err(PlanError::invalid_tier_table("tier label is blank"));
    }
    // NaN bounds compare as None
    if tier.lower_bound.partial_cmp(&tier.upper_bound) != Some(Ordering::Less) {
        return fail(format!(
            "empty interval [{}, {})",
            tier.lower_bound, tier.upper_bound
        ));
    }
    if tier.stop_loss_pct >= Decimal::ZERO || tier.stop_loss_pct <= dec!(-100) {
        return fail(format!(
            "stop loss must be in (-100, 0), got {}",
            tier.stop_loss_pct
        ));
    }
    if tier.profit_target2_pct <= Decimal::ZERO {
        return fail(format!(
            "second profit target must be positive, got {}",
            tier.profit_target2_pct
        ));
    }
    if let Some(target1) = tier.profit_target1_pct {
        if target1 <= Decimal::ZERO || target1 > tier.profit_target2_pct {
            return fail(format!(
                "first profit target must be in (0, {}], got {target1}",
                tier.profit_target2_pct
            ));
        }
    }
    if tier.max_holding_trading_days == 0 {
        return fail("max holding period must be at least one trading day".into());
    }
    if tier.size_multiplier <= Decimal::ZERO {
        return fail(format!(
            "size multiplier must be positive, got {}",
            tier.size_multiplier
        ));
    }
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn tier(
    label: &str,
    lower_bound: f64,
    upper_bound: f64,
    stop_loss_pct: Decimal,
    profit_target1_pct: Option<Decimal>,
    profit_target2_pct: Decimal,
    max_holding_trading_days: u32,
    size_multiplier: Decimal,
) -> VolatilityTier {
    VolatilityTier {
        label: label.to_string(),
        lower_bound,
        upper_bound,
        stop_loss_pct,
        profit_target1_pct,
        profit_target2_pct,
        max_holding_trading_days,
        size_multiplier,
    }
}

#[rustfmt::skip]
fn standard_tiers() -> Vec<VolatilityTier> {
    vec![
        tier("Ultra-Low", f64::NEG_INFINITY, 12.0, dec!(-4), Some(dec!(4)), dec!(10), 3, dec!(0.8)),
        tier("Low", 12.0, 15.0, dec!(-6), None, dec!(12), 4, dec!(0.9)),
        tier("Normal", 15.0, 20.0, dec!(-8), Some(dec!(7)), dec!(15), 5, dec!(1.0)),
        tier("Elevated", 20.0, 25.0, dec!(-10), Some(dec!(9)), dec!(20), 5, dec!(1.1)),
        tier("High", 25.0, 30.0, dec!(-12), None, dec!(25), 6, dec!(1.2)),
        tier("Very High", 30.0, 40.0, dec!(-15), None, dec!(30), 7, dec!(1.3)),
        tier("Extreme", 40.0, f64::INFINITY, dec!(-18), Some(dec!(15)), dec!(35), 10, dec!(1.4)),
    ]
}

/// Tier table data structure for JSON serialization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TierTableData {
    /// Tiers in ascending order.
    pub tiers: Vec<VolatilityTier>,
}

// JSON has no infinities; open ends are written as null.
mod lower_bound {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn open() -> f64 {
        f64::NEG_INFINITY
    }

    pub fn serialize<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
        if value.is_finite() {
            serializer.serialize_some(value)
        } else {
            serializer.serialize_none()
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or_else(open))
    }
}

mod upper_bound {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn open() -> f64 {
        f64::INFINITY
    }

    pub fn serialize<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
        if value.is_finite() {
            serializer.serialize_some(value)
        } else {
            serializer.serialize_none()
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or_else(open))
    }
}
