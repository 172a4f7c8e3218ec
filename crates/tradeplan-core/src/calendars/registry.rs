//! Holiday registry: the authoritative table of closed and early-close dates.
//!
//! # Example
//!
//! ```
//! use tradeplan_core::calendars::{Holiday, HolidayRegistry};
//! use tradeplan_core::types::Date;
//!
//! let registry = HolidayRegistry::new(
//!     "Desk",
//!     vec![Holiday::closure(Date::from_ymd(2025, 1, 1).unwrap(), "New Year's Day")],
//! )
//! .unwrap();
//!
//! assert!(registry.is_holiday("2025-01-01"));
//! assert!(!registry.is_holiday("2025-01-02"));
//! assert!(!registry.is_holiday("garbage"));
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use super::holiday::{Holiday, HolidayKind};
use crate::error::{PlanError, PlanResult};
use crate::types::{CalendarDate, Date};

/// Immutable lookup table of holidays.
///
/// Holds at most one [`Holiday`] per date. Built once and never modified;
/// share it between calendars with an `Arc`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HolidayRegistry {
    name: String,
    holidays: BTreeMap<Date, Holiday>,
}

impl HolidayRegistry {
    /// Creates a registry from holiday entries.
    ///
    /// # Errors
    ///
    /// Returns `PlanError::InvalidRegistry` if two entries share a date, an
    /// early-close entry lacks its close time, or a full closure carries one.
    pub fn new(
        name: impl Into<String>,
        holidays: impl IntoIterator<Item = Holiday>,
    ) -> PlanResult<Self> {
        let mut table = BTreeMap::new();
        for holiday in holidays {
            validate_entry(&holiday)?;
            let date = holiday.date;
            if let Some(existing) = table.insert(date, holiday) {
                return Err(PlanError::invalid_registry(format!(
                    "{date} is listed twice (first as '{}')",
                    existing.name
                )));
            }
        }

        Ok(Self {
            name: name.into(),
            holidays: table,
        })
    }

    /// Creates a registry with no holidays; only weekends are closed.
    pub fn empty(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            holidays: BTreeMap::new(),
        }
    }

    /// Load a registry from JSON data.
    ///
    /// # JSON Format
    ///
    /// ```json
    /// {
    ///   "name": "Desk Calendar",
    ///   "holidays": [
    ///     { "date": "2025-12-24", "name": "Christmas Eve", "kind": "EarlyClose", "early_close_time": "13:00" },
    ///     { "date": "2025-12-25", "name": "Christmas Day", "kind": "FullClosure" }
    ///   ]
    /// }
    /// ```
    pub fn from_json(json: &str) -> PlanResult<Self> {
        let data: RegistryData = serde_json::from_str(json)
            .map_err(|e| PlanError::config(format!("Failed to parse holiday JSON: {e}")))?;
        Self::from_registry_data(data)
    }

    /// Load a registry from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> PlanResult<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| PlanError::config(format!("Failed to read file: {e}")))?;
        Self::from_json(&content)
    }

    /// Build a registry from already-deserialized data.
    pub fn from_registry_data(data: RegistryData) -> PlanResult<Self> {
        Self::new(data.name, data.holidays)
    }

    /// Export the registry to a serializable struct.
    pub fn to_registry_data(&self) -> RegistryData {
        RegistryData {
            name: self.name.clone(),
            holidays: self.holidays.values().cloned().collect(),
        }
    }

    /// Export to a pretty-printed JSON string.
    pub fn to_json(&self) -> PlanResult<String> {
        serde_json::to_string_pretty(&self.to_registry_data())
            .map_err(|e| PlanError::config(format!("Failed to serialize registry: {e}")))
    }

    /// Name of the registry.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// True if the date carries any holiday entry, full closure or early close.
    ///
    /// Unparseable input is never a holiday.
    pub fn is_holiday(&self, date: impl CalendarDate) -> bool {
        self.holiday(date).is_some()
    }

    /// True if the date is an early-close day.
    pub fn is_early_close(&self, date: impl CalendarDate) -> bool {
        self.holiday(date)
            .is_some_and(|h| h.kind == HolidayKind::EarlyClose)
    }

    /// Exact lookup of the holiday on a date.
    pub fn holiday(&self, date: impl CalendarDate) -> Option<&Holiday> {
        date.to_date().and_then(|d| self.holidays.get(&d))
    }

    /// All holidays in date order.
    pub fn holidays(&self) -> impl Iterator<Item = &Holiday> + '_ {
        self.holidays.values()
    }

    /// Holidays falling in one calendar year, in date order.
    pub fn holidays_in_year(&self, year: i32) -> impl Iterator<Item = &Holiday> + '_ {
        self.holidays.values().filter(move |h| h.date.year() == year)
    }

    /// First and last year with at least one entry.
    pub fn covered_years(&self) -> Option<(i32, i32)> {
        let first = self.holidays.keys().next()?;
        let last = self.holidays.keys().next_back()?;
        Some((first.year(), last.year()))
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.holidays.len()
    }

    /// True if the registry has no entries.
    pub fn is_empty(&self) -> bool {
        self.holidays.is_empty()
    }
}

fn validate_entry(holiday: &Holiday) -> PlanResult<()> {
    match (holiday.kind, holiday.early_close_time.as_deref()) {
        (HolidayKind::FullClosure, Some(time)) => Err(PlanError::invalid_registry(format!(
            "{} ({}) is a full closure but has close time {time}",
            holiday.date, holiday.name
        ))),
        (HolidayKind::EarlyClose, None) => Err(PlanError::invalid_registry(format!(
            "{} ({}) is an early close without a close time",
            holiday.date, holiday.name
        ))),
        (HolidayKind::EarlyClose, Some(time)) if time.trim().is_empty() => {
            Err(PlanError::invalid_registry(format!(
                "{} ({}) has a blank close time",
                holiday.date, holiday.name
            )))
        }
        _ => Ok(()),
    }
}

/// Registry data structure for JSON serialization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistryData {
    /// Name of the registry
    pub name: String,

    /// Holiday entries
    #[serde(default)]
    pub holidays: Vec<Holiday>,
}

impl RegistryData {
    /// Create empty registry data.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            holidays: Vec::new(),
        }
    }

    /// Add a holiday entry.
    pub fn with_holiday(mut self, holiday: Holiday) -> Self {
        self.holidays.push(holiday);
        self
    }

    /// Build into a validated registry.
    pub fn build(self) -> PlanResult<HolidayRegistry> {
        HolidayRegistry::from_registry_data(self)
    }
}
