//! Error types for trade planning.
//!
//! Classification calls (weekend, holiday, trading-day checks) never fail.
//! Everything that computes a date, a price or a share count returns a
//! [`PlanResult`].

use thiserror::Error;

/// A specialized Result type for planning operations.
pub type PlanResult<T> = Result<T, PlanError>;

/// The main error type for planning operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PlanError {
    /// Date text could not be parsed into a calendar date.
    #[error("Invalid date: {message}")]
    InvalidDate {
        /// Description of the date error.
        message: String,
    },

    /// A caller passed a value outside the operation's contract.
    #[error("Invalid argument `{argument}`: {reason}")]
    InvalidArgument {
        /// Name of the offending argument.
        argument: &'static str,
        /// Reason for invalidity.
        reason: String,
    },

    /// Volatility tiers do not partition the volatility domain.
    #[error("Invalid tier table: {reason}")]
    InvalidTierTable {
        /// Description of the broken invariant.
        reason: String,
    },

    /// Holiday entries are contradictory.
    #[error("Invalid holiday registry: {reason}")]
    InvalidRegistry {
        /// Description of the broken invariant.
        reason: String,
    },

    /// Trading-day navigation scanned past its limit without finding a
    /// trading day. The holiday data itself is malformed.
    #[error("Scanned {limit} calendar days from {start} without resolving a trading day")]
    ScanLimitExceeded {
        /// Date the scan started from.
        start: String,
        /// Maximum number of calendar days scanned.
        limit: u32,
    },

    /// Configuration could not be read or parsed.
    #[error("Configuration error: {reason}")]
    ConfigError {
        /// Description of the configuration error.
        reason: String,
    },
}

impl PlanError {
    /// Creates an invalid date error.
    #[must_use]
    pub fn invalid_date(message: impl Into<String>) -> Self {
        Self::InvalidDate {
            message: message.into(),
        }
    }

    /// Creates an invalid argument error.
    #[must_use]
    pub fn invalid_argument(argument: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            argument,
            reason: reason.into(),
        }
    }

    /// Creates an invalid tier table error.
    #[must_use]
    pub fn invalid_tier_table(reason: impl Into<String>) -> Self {
        Self::InvalidTierTable {
            reason: reason.into(),
        }
    }

    /// Creates an invalid registry error.
    #[must_use]
    pub fn invalid_registry(reason: impl Into<String>) -> Self {
        Self::InvalidRegistry {
            reason: reason.into(),
        }
    }

    /// Creates a configuration error.
    #[must_use]
    pub fn config(reason: impl Into<String>) -> Self {
        Self::ConfigError {
            reason: reason.into(),
        }
    }

    /// Returns true for internal consistency failures.
    ///
    /// These indicate defective static data rather than a bad call and
    /// should not be shown to a user as an input problem.
    #[must_use]
    pub fn is_internal(&self) -> bool {
        matches!(self, Self::ScanLimitExceeded { .. })
    }
}
