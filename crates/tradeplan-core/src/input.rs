//! Parsing of raw trade-entry text.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::{PlanError, PlanResult};
use crate::types::Date;

/// Validated inputs for one plan.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TradeTicket {
    /// Entry date.
    pub entry_date: Date,
    /// Entry price, strictly positive.
    pub entry_price: Decimal,
    /// Volatility reading; never NaN, may be infinite.
    pub volatility: f64,
}

impl TradeTicket {
    /// Parses raw form fields.
    ///
    /// Fields are trimmed. The price may carry a leading `$` or `€` and
    /// `,` thousands separators.
    ///
    /// # Errors
    ///
    /// - `InvalidDate` if the date is not `YYYY-MM-DD`
    /// - `InvalidArgument` for an unparseable or non-positive price, or an
    ///   unparseable or NaN volatility
    ///
    /// Out-of-range volatility, infinite included, is accepted; the tier
    /// table clamps it.
    pub fn parse(entry_date: &str, entry_price: &str, volatility: &str) -> PlanResult<Self> {
        let entry_date = Date::parse(entry_date)?;
        let entry_price = parse_price(entry_price)?;
        let volatility = parse_volatility(volatility)?;
        Ok(Self {
            entry_date,
            entry_price,
            volatility,
        })
    }
}

fn parse_price(raw: &str) -> PlanResult<Decimal> {
    let cleaned: String = raw
        .trim()
        .trim_start_matches(['$', '€'])
        .chars()
        .filter(|c| *c != ',')
        .collect();

    let price = Decimal::from_str(cleaned.trim())
        .map_err(|e| PlanError::invalid_argument("entry_price", format!("'{raw}': {e}")))?;
    if price <= Decimal::ZERO {
        return Err(PlanError::invalid_argument(
            "entry_price",
            format!("must be positive, got {price}"),
        ));
    }
    Ok(price)
}

fn parse_volatility(raw: &str) -> PlanResult<f64> {
    let value: f64 = raw
        .trim()
        .parse()
        .map_err(|e| PlanError::invalid_argument("volatility", format!("'{raw}': {e}")))?;
    if value.is_nan() {
        return Err(PlanError::invalid_argument("volatility", "must be a number, got NaN"));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_parse_plain() {
        let ticket = TradeTicket::parse("2025-03-03", "45.20", "22.4").unwrap();
        assert_eq!(ticket.entry_date, Date::from_ymd(2025, 3, 3).unwrap());
        assert_eq!(ticket.entry_price, dec!(45.20));
        assert_eq!(ticket.volatility, 22.4);
    }

    #[test]
    fn test_parse_decorated_price() {
        let ticket = TradeTicket::parse(" 2025-03-03 ", " $1,234.50 ", " 18 ").unwrap();
        assert_eq!(ticket.entry_price, dec!(1234.50));
        assert_eq!(ticket.volatility, 18.0);

        let euro = TradeTicket::parse("2025-03-03", "€12", "18").unwrap();
        assert_eq!(euro.entry_price, dec!(12));
    }

    #[test]
    fn test_bad_date() {
        assert!(matches!(
            TradeTicket::parse("03/03/2025", "10", "18"),
            Err(PlanError::InvalidDate { .. })
        ));
    }

    #[test]
    fn test_bad_price() {
        for price in ["", "abc", "0", "-3", "$"] {
            assert!(
                matches!(
                    TradeTicket::parse("2025-03-03", price, "18"),
                    Err(PlanError::InvalidArgument { argument: "entry_price", .. })
                ),
                "{price:?}"
            );
        }
    }

    #[test]
    fn test_bad_volatility() {
        for vol in ["", "high", "NaN", "nan"] {
            assert!(
                matches!(
                    TradeTicket::parse("2025-03-03", "10", vol),
                    Err(PlanError::InvalidArgument { argument: "volatility", .. })
                ),
                "{vol:?}"
            );
        }
    }

    #[test]
    fn test_infinite_volatility_is_accepted() {
        let ticket = TradeTicket::parse("2025-03-03", "10", "1e400").unwrap();
        assert_eq!(ticket.volatility, f64::INFINITY);
        let ticket = TradeTicket::parse("2025-03-03", "10", "-inf").unwrap();
        assert_eq!(ticket.volatility, f64::NEG_INFINITY);
    }

    #[test]
    fn test_negative_volatility_is_accepted() {
        // Clamped to the lowest tier at planning time
        let ticket = TradeTicket::parse("2025-03-03", "10", "-2.5").unwrap();
        assert_eq!(ticket.volatility, -2.5);
    }
}
