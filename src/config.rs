//! Scheduler configuration and partial updates.

use chrono::Datelike;
use serde::{Deserialize, Serialize};

use crate::error::ScheduleError;

/// Default minimum rest between two shifts of the same guard.
pub const DEFAULT_MIN_REST_HOURS: u32 = 8;

/// Default bound on swaps applied by the improvement pass.
pub const DEFAULT_MAX_SWAP_ITERATIONS: u32 = 100;

/// Valid range for `priority_level`.
pub const PRIORITY_LEVEL_RANGE: std::ops::RangeInclusive<u32> = 1..=10;

/// Whose interests the score favours when they pull apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ClientPriority {
    ClientFirst,
    GuardFirst,
    #[default]
    Balanced,
}

impl ClientPriority {
    /// Base bonus for a preferred-location match.
    pub fn location_bonus(self) -> f64 {
        match self {
            ClientPriority::GuardFirst => 5.0,
            ClientPriority::Balanced => 3.0,
            ClientPriority::ClientFirst => 1.0,
        }
    }

    /// Base bonus for a preferred time-of-day match.
    pub fn time_bonus(self) -> f64 {
        match self {
            ClientPriority::GuardFirst => 4.0,
            ClientPriority::Balanced => 2.0,
            ClientPriority::ClientFirst => 1.0,
        }
    }

    /// Base bonus for unused weekly hours.
    pub fn hour_bonus(self) -> f64 {
        match self {
            ClientPriority::GuardFirst => 5.0,
            ClientPriority::Balanced => 3.0,
            ClientPriority::ClientFirst => 1.0,
        }
    }

    /// Penalty per shift already committed to a guard in this run.
    ///
    /// Client-first tolerates overload, guard-first spreads work out.
    pub fn workload_factor(self) -> f64 {
        match self {
            ClientPriority::ClientFirst => 0.2,
            ClientPriority::Balanced => 0.5,
            ClientPriority::GuardFirst => 1.0,
        }
    }
}

/// Complete scheduler configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleConfig {
    pub client_priority: ClientPriority,
    /// 1–10; bonuses and the workload penalty scale by `priority_level / 5`.
    pub priority_level: u32,
    pub consider_guard_preferences: bool,
    /// 0 means unlimited.
    pub max_shifts_per_guard: u32,
    pub min_rest_hours: u32,
    /// Calendar year used to resolve year-less shift dates.
    pub reference_year: i32,
    /// Most swaps the improvement pass applies; 0 disables it.
    pub max_swap_iterations: u32,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            client_priority: ClientPriority::Balanced,
            priority_level: 5,
            consider_guard_preferences: true,
            max_shifts_per_guard: 0,
            min_rest_hours: DEFAULT_MIN_REST_HOURS,
            reference_year: chrono::Local::now().year(),
            max_swap_iterations: DEFAULT_MAX_SWAP_ITERATIONS,
        }
    }
}

impl ScheduleConfig {
    /// Default configuration pinned to a calendar year.
    pub fn for_year(year: i32) -> Self {
        Self {
            reference_year: year,
            ..Default::default()
        }
    }

    /// The multiplier applied to every preference bonus and the workload penalty.
    pub fn priority_scale(&self) -> f64 {
        f64::from(self.priority_level) / 5.0
    }

    pub fn min_rest(&self) -> chrono::Duration {
        chrono::Duration::hours(i64::from(self.min_rest_hours))
    }

    pub fn validate(&self) -> Result<(), ScheduleError> {
        if !PRIORITY_LEVEL_RANGE.contains(&self.priority_level) {
            return Err(ScheduleError::invalid_config(
                "priorityLevel",
                format!("must be between 1 and 10, got {}", self.priority_level),
            ));
        }
        if chrono::NaiveDate::from_ymd_opt(self.reference_year, 1, 1).is_none() {
            return Err(ScheduleError::invalid_config(
                "referenceYear",
                format!("{} is out of range", self.reference_year),
            ));
        }
        Ok(())
    }

    /// Returns a copy with every field set in `patch` overridden, validated.
    ///
    /// ```
    /// use guard_scheduling::config::{ClientPriority, ConfigPatch, ScheduleConfig};
    ///
    /// let base = ScheduleConfig::for_year(2025);
    /// let merged = base
    ///     .merged(&ConfigPatch {
    ///         client_priority: Some(ClientPriority::GuardFirst),
    ///         ..Default::default()
    ///     })
    ///     .unwrap();
    /// assert_eq!(merged.client_priority, ClientPriority::GuardFirst);
    /// assert_eq!(merged.min_rest_hours, 8);
    /// ```
    pub fn merged(&self, patch: &ConfigPatch) -> Result<Self, ScheduleError> {
        let max_shifts_per_guard = match patch.max_shifts_per_guard {
            Some(v) => non_negative("maxShiftsPerGuard", v)?,
            None => self.max_shifts_per_guard,
        };
        let min_rest_hours = match patch.min_rest_hours {
            Some(v) => non_negative("minRestHours", v)?,
            None => self.min_rest_hours,
        };

        let merged = Self {
            client_priority: patch.client_priority.unwrap_or(self.client_priority),
            priority_level: patch.priority_level.unwrap_or(self.priority_level),
            consider_guard_preferences: patch
                .consider_guard_preferences
                .unwrap_or(self.consider_guard_preferences),
            max_shifts_per_guard,
            min_rest_hours,
            reference_year: patch.reference_year.unwrap_or(self.reference_year),
            max_swap_iterations: patch
                .max_swap_iterations
                .unwrap_or(self.max_swap_iterations),
        };
        merged.validate()?;
        Ok(merged)
    }
}

fn non_negative(field: &'static str, value: i64) -> Result<u32, ScheduleError> {
    if value < 0 {
        return Err(ScheduleError::invalid_config(
            field,
            format!("must not be negative, got {}", value),
        ));
    }
    u32::try_from(value)
        .map_err(|_| ScheduleError::invalid_config(field, format!("{} is too large", value)))
}

/// A partial configuration; `None` fields keep their current value.
///
/// Counts are signed so that negative input from a form reaches validation
/// instead of failing deserialization with a less useful message.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ConfigPatch {
    pub client_priority: Option<ClientPriority>,
    pub priority_level: Option<u32>,
    pub consider_guard_preferences: Option<bool>,
    pub max_shifts_per_guard: Option<i64>,
    pub min_rest_hours: Option<i64>,
    pub reference_year: Option<i32>,
    pub max_swap_iterations: Option<u32>,
}
