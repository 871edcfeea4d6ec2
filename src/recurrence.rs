//! Expanding a shift template into dated shifts.

use chrono::{Datelike, NaiveDate, NaiveTime, Weekday};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::domain::Shift;
use crate::error::ScheduleError;
use crate::interval::format_date;

/// Which days of a date range get a shift.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "days", rename_all = "camelCase")]
pub enum Recurrence {
    /// Only the start date.
    Once,
    /// Every day of the range.
    Daily,
    /// Days of the range falling on one of these weekdays.
    Weekdays(HashSet<Weekday>),
}

impl Recurrence {
    fn includes(&self, day: Weekday) -> bool {
        match self {
            Recurrence::Once | Recurrence::Daily => true,
            Recurrence::Weekdays(days) => days.contains(&day),
        }
    }
}

/// The repeating part of a shift.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShiftTemplate {
    /// Prefix of every generated shift id.
    pub base_id: String,
    pub title: String,
    pub location: String,
    #[serde(default)]
    pub security_level: String,
    #[serde(default)]
    pub requirements: Vec<String>,
    pub start_time: NaiveTime,
    /// Earlier than `start_time` for overnight shifts.
    pub end_time: NaiveTime,
}

impl ShiftTemplate {
    /// Creates one shift per guard for each day `recurrence` selects in
    /// `start_date..=end_date`.
    ///
    /// ```
    /// use chrono::{NaiveDate, NaiveTime, Weekday};
    /// use guard_scheduling::recurrence::{Recurrence, ShiftTemplate};
    ///
    /// let template = ShiftTemplate {
    ///     base_id: "mall".to_string(),
    ///     title: "Mall Patrol".to_string(),
    ///     location: "Riverside Mall".to_string(),
    ///     security_level: "Level 2".to_string(),
    ///     requirements: vec![],
    ///     start_time: NaiveTime::from_hms_opt(22, 0, 0).unwrap(),
    ///     end_time: NaiveTime::from_hms_opt(6, 0, 0).unwrap(),
    /// };
    /// let weekends = Recurrence::Weekdays([Weekday::Sat, Weekday::Sun].into_iter().collect());
    /// let shifts = template
    ///     .expand(
    ///         NaiveDate::from_ymd_opt(2025, 1, 13).unwrap(),
    ///         NaiveDate::from_ymd_opt(2025, 1, 19).unwrap(),
    ///         &weekends,
    ///         2,
    ///     )
    ///     .unwrap();
    ///
    /// let ids: Vec<_> = shifts.iter().map(|s| s.id.as_str()).collect();
    /// assert_eq!(
    ///     ids,
    ///     [
    ///         "mall-20250118-guard-1",
    ///         "mall-20250118-guard-2",
    ///         "mall-20250119-guard-1",
    ///         "mall-20250119-guard-2",
    ///     ]
    /// );
    /// assert_eq!(shifts[0].date, "Jan 18");
    /// assert_eq!(shifts[0].time, "22:00 - 06:00");
    /// ```
    pub fn expand(
        &self,
        start_date: NaiveDate,
        end_date: NaiveDate,
        recurrence: &Recurrence,
        guards_per_shift: u32,
    ) -> Result<Vec<Shift>, ScheduleError> {
        if end_date < start_date {
            return Err(ScheduleError::InvalidTemplate(format!(
                "end date {} is before start date {}",
                end_date, start_date
            )));
        }
        if guards_per_shift == 0 {
            return Err(ScheduleError::InvalidTemplate(
                "at least one guard per shift is required".to_string(),
            ));
        }

        let days: Vec<NaiveDate> = match recurrence {
            Recurrence::Once => vec![start_date],
            _ => start_date
                .iter_days()
                .take_while(|d| *d <= end_date)
                .filter(|d| recurrence.includes(d.weekday()))
                .collect(),
        };

        let time = format!(
            "{} - {}",
            self.start_time.format("%H:%M"),
            self.end_time.format("%H:%M")
        );

        let mut shifts = Vec::with_capacity(days.len() * guards_per_shift as usize);
        for day in days {
            for n in 1..=guards_per_shift {
                shifts.push(
                    Shift::new(
                        format!("{}-{}-guard-{}", self.base_id, day.format("%Y%m%d"), n),
                        self.title.clone(),
                        self.location.clone(),
                        format_date(day),
                        time.clone(),
                    )
                    .with_security_level(self.security_level.clone())
                    .with_requirements(self.requirements.iter().cloned()),
                );
            }
        }
        Ok(shifts)
    }
}
