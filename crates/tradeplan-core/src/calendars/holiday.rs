//! Holiday records.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::types::Date;

/// How a holiday affects the trading session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HolidayKind {
    /// Market closed for the whole day.
    FullClosure,
    /// Market opens but closes early.
    EarlyClose,
}

impl fmt::Display for HolidayKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            HolidayKind::FullClosure => "Full Closure",
            HolidayKind::EarlyClose => "Early Close",
        };
        write!(f, "{name}")
    }
}

/// A non-trading or partial-trading date.
///
/// `early_close_time` is a wall-clock time such as `"13:00"` and is present
/// exactly when `kind` is [`HolidayKind::EarlyClose`]; the registry rejects
/// entries that break this.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Holiday {
    /// The affected date.
    pub date: Date,
    /// Display label.
    pub name: String,
    /// Closure kind.
    pub kind: HolidayKind,
    /// Session end on early-close days.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub early_close_time: Option<String>,
}

impl Holiday {
    /// Creates a full-closure holiday.
    pub fn closure(date: Date, name: impl Into<String>) -> Self {
        Self {
            date,
            name: name.into(),
            kind: HolidayKind::FullClosure,
            early_close_time: None,
        }
    }

    /// Creates an early-close day ending at `close_time`.
    pub fn early_close(date: Date, name: impl Into<String>, close_time: impl Into<String>) -> Self {
        Self {
            date,
            name: name.into(),
            kind: HolidayKind::EarlyClose,
            early_close_time: Some(close_time.into()),
        }
    }

    /// Returns true for a shortened session.
    #[must_use]
    pub fn is_early_close(&self) -> bool {
        self.kind == HolidayKind::EarlyClose
    }
}
