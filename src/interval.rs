//! Shift time normalization.
//!
//! Shifts carry their date and time in display form ("Jan 19",
//! "22:00 - 06:00"). Every downstream check works on absolute instants, so a
//! token that does not parse is an error rather than a default.

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime, Timelike, Weekday};

use crate::domain::{Shift, TimeOfDay};
use crate::error::ScheduleError;

/// Absolute start and end of a shift. `end` is never before `start`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ShiftInterval {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl ShiftInterval {
    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    /// Duration in fractional hours.
    pub fn hours(&self) -> f64 {
        self.duration().num_seconds() as f64 / 3600.0
    }

    pub fn weekday(&self) -> Weekday {
        self.start.weekday()
    }

    pub fn time_of_day(&self) -> TimeOfDay {
        TimeOfDay::from_hour(self.start.hour())
    }

    /// Half-open overlap: a shift ending at 16:00 does not overlap one
    /// starting at 16:00.
    pub fn overlaps(&self, other: &ShiftInterval) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// Time between the earlier shift's end and the later shift's start, or
    /// `None` if the two overlap.
    pub fn gap(&self, other: &ShiftInterval) -> Option<Duration> {
        if self.end <= other.start {
            Some(other.start - self.end)
        } else if other.end <= self.start {
            Some(self.start - other.end)
        } else {
            None
        }
    }
}

/// Resolves a shift's date and time tokens in `year`, rolling the end past
/// midnight when it precedes the start.
///
/// ```
/// use guard_scheduling::domain::Shift;
/// use guard_scheduling::interval::parse_shift_time;
///
/// let shift = Shift::new("s1", "Night watch", "Depot", "Jan 19", "22:00 - 06:00");
/// let interval = parse_shift_time(&shift, 2025).unwrap();
/// assert_eq!(interval.start.to_string(), "2025-01-19 22:00:00");
/// assert_eq!(interval.end.to_string(), "2025-01-20 06:00:00");
/// assert_eq!(interval.hours(), 8.0);
/// ```
pub fn parse_shift_time(shift: &Shift, year: i32) -> Result<ShiftInterval, ScheduleError> {
    let date = parse_date(&shift.date, year).ok_or_else(|| ScheduleError::InvalidDate {
        shift_id: shift.id.clone(),
        value: shift.date.clone(),
    })?;
    let (start_time, end_time) =
        parse_time_range(&shift.time).ok_or_else(|| ScheduleError::InvalidTimeRange {
            shift_id: shift.id.clone(),
            value: shift.time.clone(),
        })?;

    let start = NaiveDateTime::new(date, start_time);
    let mut end = NaiveDateTime::new(date, end_time);
    if end < start {
        end += Duration::days(1);
    }
    Ok(ShiftInterval { start, end })
}

/// Duration of a shift in fractional hours.
pub fn shift_hours(shift: &Shift, year: i32) -> Result<f64, ScheduleError> {
    parse_shift_time(shift, year).map(|interval| interval.hours())
}

/// Parses a month/day token such as "Jan 19" or "jan 5" in `year`.
pub fn parse_date(token: &str, year: i32) -> Option<NaiveDate> {
    let token = token.trim();
    if token.is_empty() {
        return None;
    }
    NaiveDate::parse_from_str(&format!("{} {}", token, year), "%b %d %Y").ok()
}

/// Parses "HH:MM - HH:MM" into its two clock times.
pub fn parse_time_range(token: &str) -> Option<(NaiveTime, NaiveTime)> {
    let (start, end) = token.split_once('-')?;
    let start = NaiveTime::parse_from_str(start.trim(), "%H:%M").ok()?;
    let end = NaiveTime::parse_from_str(end.trim(), "%H:%M").ok()?;
    Some((start, end))
}

/// Formats a date the way shift records carry it ("Jan 05").
pub fn format_date(date: NaiveDate) -> String {
    date.format("%b %d").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shift(date: &str, time: &str) -> Shift {
        Shift::new("s1", "Patrol", "Mall", date, time)
    }

    fn at(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M").unwrap()
    }

    #[test]
    fn test_day_shift() {
        let interval = parse_shift_time(&shift("Jan 19", "08:00 - 16:00"), 2025).unwrap();
        assert_eq!(interval.start, at("2025-01-19 08:00"));
        assert_eq!(interval.end, at("2025-01-19 16:00"));
        assert_eq!(interval.hours(), 8.0);
        assert_eq!(interval.weekday(), Weekday::Sun);
        assert_eq!(interval.time_of_day(), TimeOfDay::Morning);
    }

    #[test]
    fn test_overnight_shift_rolls_end_forward() {
        let interval = parse_shift_time(&shift("Dec 31", "20:30 - 04:45"), 2024).unwrap();
        assert_eq!(interval.end, at("2025-01-01 04:45"));
        assert_eq!(interval.hours(), 8.25);
        assert_eq!(interval.time_of_day(), TimeOfDay::Night);
    }

    #[test]
    fn test_single_digit_day_and_loose_spacing() {
        let interval = parse_shift_time(&shift("Mar 5", "9:00-17:30"), 2025).unwrap();
        assert_eq!(interval.start, at("2025-03-05 09:00"));
        assert_eq!(interval.hours(), 8.5);
    }

    #[test]
    fn test_malformed_tokens_are_errors() {
        assert!(matches!(
            parse_shift_time(&shift("19/01", "08:00 - 16:00"), 2025),
            Err(ScheduleError::InvalidDate { .. })
        ));
        assert!(matches!(
            parse_shift_time(&shift("Feb 29", "08:00 - 16:00"), 2025),
            Err(ScheduleError::InvalidDate { .. })
        ));
        assert!(matches!(
            parse_shift_time(&shift("Jan 19", "8am to 4pm"), 2025),
            Err(ScheduleError::InvalidTimeRange { .. })
        ));
        assert!(matches!(
            parse_shift_time(&shift("Jan 19", "25:00 - 04:00"), 2025),
            Err(ScheduleError::InvalidTimeRange { .. })
        ));
    }

    #[test]
    fn test_overlap_is_half_open() {
        let a = parse_shift_time(&shift("Jan 19", "08:00 - 16:00"), 2025).unwrap();
        let b = parse_shift_time(&shift("Jan 19", "15:00 - 23:00"), 2025).unwrap();
        let c = parse_shift_time(&shift("Jan 19", "16:00 - 20:00"), 2025).unwrap();
        assert!(a.overlaps(&b));
        assert!(!a.overlaps(&c));
        assert_eq!(a.gap(&c), Some(Duration::zero()));
        assert_eq!(a.gap(&b), None);
    }

    #[test]
    fn test_gap_is_symmetric() {
        let a = parse_shift_time(&shift("Jan 19", "06:00 - 14:00"), 2025).unwrap();
        let b = parse_shift_time(&shift("Jan 19", "20:00 - 23:00"), 2025).unwrap();
        assert_eq!(a.gap(&b), Some(Duration::hours(6)));
        assert_eq!(b.gap(&a), Some(Duration::hours(6)));
    }

    #[test]
    fn test_format_date_round_trips() {
        let date = NaiveDate::from_ymd_opt(2025, 1, 5).unwrap();
        assert_eq!(format_date(date), "Jan 05");
        assert_eq!(parse_date(&format_date(date), 2025), Some(date));
    }
}
