//! Domain model for the Guard Scheduling Problem.

use chrono::Weekday;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Duty status of a guard. Only `Available` guards are scheduling candidates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GuardStatus {
    #[default]
    Available,
    OnDuty,
    OffDuty,
}

/// Time-of-day bucket a shift falls into, keyed on its start hour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeOfDay {
    Morning,
    Afternoon,
    Night,
}

impl TimeOfDay {
    /// Classifies a start hour: morning is 05–11, afternoon 12–17, night otherwise.
    ///
    /// ```
    /// use guard_scheduling::domain::TimeOfDay;
    ///
    /// assert_eq!(TimeOfDay::from_hour(5), TimeOfDay::Morning);
    /// assert_eq!(TimeOfDay::from_hour(12), TimeOfDay::Afternoon);
    /// assert_eq!(TimeOfDay::from_hour(18), TimeOfDay::Night);
    /// assert_eq!(TimeOfDay::from_hour(3), TimeOfDay::Night);
    /// ```
    pub fn from_hour(hour: u32) -> Self {
        match hour {
            5..=11 => TimeOfDay::Morning,
            12..=17 => TimeOfDay::Afternoon,
            _ => TimeOfDay::Night,
        }
    }
}

/// Optional scheduling preferences recorded for a guard.
///
/// Every field defaults to "no preference" so partially filled records from
/// the onboarding flow deserialize cleanly.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GuardPreferences {
    #[serde(default)]
    pub max_hours_per_week: Option<u32>,
    #[serde(default)]
    pub preferred_locations: HashSet<String>,
    #[serde(default)]
    pub preferred_shift_times: HashSet<TimeOfDay>,
    /// Weekday names, e.g. "saturday" or "Sat".
    #[serde(default)]
    pub unavailable_days: HashSet<String>,
}

impl GuardPreferences {
    /// Returns true if `day` is listed in `unavailable_days`.
    ///
    /// Names are matched case-insensitively in full or abbreviated form;
    /// unrecognised names never match.
    pub fn is_unavailable_on(&self, day: Weekday) -> bool {
        self.unavailable_days
            .iter()
            .filter_map(|name| name.trim().parse::<Weekday>().ok())
            .any(|d| d == day)
    }

    /// Returns the weekly hour cap, treating zero as "no cap".
    pub fn hour_cap(&self) -> Option<u32> {
        self.max_hours_per_week.filter(|&h| h > 0)
    }
}

/// A security guard who can be assigned to shifts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Guard {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub status: GuardStatus,
    #[serde(default)]
    pub skills: HashSet<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preferences: Option<GuardPreferences>,
}

impl Guard {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            email: String::new(),
            status: GuardStatus::Available,
            skills: HashSet::new(),
            preferences: None,
        }
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = email.into();
        self
    }

    pub fn with_skills(mut self, skills: impl IntoIterator<Item = impl Into<String>>) -> Self {
        for skill in skills {
            self.skills.insert(skill.into());
        }
        self
    }

    pub fn with_status(mut self, status: GuardStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_preferences(mut self, preferences: GuardPreferences) -> Self {
        self.preferences = Some(preferences);
        self
    }

    /// Highest security level encoded in this guard's skill tags.
    pub fn security_level(&self) -> Option<u32> {
        self.skills.iter().filter_map(|s| parse_level(s)).max()
    }

    /// Returns true if some skill tag encodes a level of at least `level`.
    pub fn meets_level(&self, level: u32) -> bool {
        self.security_level().is_some_and(|own| own >= level)
    }

    pub fn is_available(&self) -> bool {
        self.status == GuardStatus::Available
    }
}

/// The guard currently holding a shift.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignedGuard {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

/// A shift that needs to be staffed by a guard.
///
/// `date` and `time` keep the display form produced by the shift-creation
/// flow ("Jan 19", "08:00 - 16:00"); see [`crate::interval`] for parsing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Shift {
    pub id: String,
    #[serde(default)]
    pub title: String,
    pub location: String,
    pub date: String,
    pub time: String,
    #[serde(default)]
    pub security_level: String,
    #[serde(default)]
    pub requirements: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned: Option<AssignedGuard>,
}

impl Shift {
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        location: impl Into<String>,
        date: impl Into<String>,
        time: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            location: location.into(),
            date: date.into(),
            time: time.into(),
            security_level: String::new(),
            requirements: Vec::new(),
            assigned: None,
        }
    }

    pub fn with_security_level(mut self, level: impl Into<String>) -> Self {
        self.security_level = level.into();
        self
    }

    pub fn with_requirements(
        mut self,
        requirements: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        self.requirements = requirements.into_iter().map(Into::into).collect();
        self
    }

    /// Security level demanded by this shift, if its label encodes one.
    pub fn required_level(&self) -> Option<u32> {
        parse_level(&self.security_level)
    }

    pub fn is_assigned(&self) -> bool {
        self.assigned.is_some()
    }
}

/// Guards and shifts held together, as the roster collaborator stores them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Roster {
    pub guards: Vec<Guard>,
    pub shifts: Vec<Shift>,
}

impl Roster {
    pub fn new(guards: Vec<Guard>, shifts: Vec<Shift>) -> Self {
        Self { guards, shifts }
    }
}

/// Extracts `N` from the first "Level N" in `text` (case-insensitive, at
/// least one whitespace between the word and the number). A number too large
/// for `u32` saturates to `u32::MAX`.
///
/// ```
/// use guard_scheduling::domain::parse_level;
///
/// assert_eq!(parse_level("Security Level 2"), Some(2));
/// assert_eq!(parse_level("level   12"), Some(12));
/// assert_eq!(parse_level("Level2"), None);
/// assert_eq!(parse_level("Event Security"), None);
/// assert_eq!(parse_level("Level 99999999999"), Some(u32::MAX));
/// ```
pub fn parse_level(text: &str) -> Option<u32> {
    let lower = text.to_ascii_lowercase();
    let mut rest = lower.as_str();
    while let Some(pos) = rest.find("level") {
        let after = &rest[pos + "level".len()..];
        let digits_at = after.len() - after.trim_start().len();
        if digits_at > 0 {
            let digits: String = after[digits_at..]
                .chars()
                .take_while(|c| c.is_ascii_digit())
                .collect();
            if !digits.is_empty() {
                return Some(digits.parse().unwrap_or(u32::MAX));
            }
        }
        rest = after;
    }
    None
}
