//! Consistency checks over a roster's existing assignments.
//!
//! Manual edits can leave a roster in a state the scheduler would never
//! produce. [`audit_roster`] reports those problems without changing
//! anything.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

use crate::domain::{Guard, Shift};
use crate::error::ScheduleError;
use crate::interval::{parse_shift_time, ShiftInterval};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
    Overlap,
    InsufficientRest,
    ExceededHours,
}

/// A problem found on an assigned shift.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RosterIssue {
    pub shift_id: String,
    pub guard_name: String,
    pub kind: IssueKind,
    pub details: String,
}

impl RosterIssue {
    fn new(shift: &Shift, guard_name: &str, kind: IssueKind, details: String) -> Self {
        Self {
            shift_id: shift.id.clone(),
            guard_name: guard_name.to_string(),
            kind,
            details,
        }
    }
}

/// Checks every guard's assigned shifts for overlaps, short rest and
/// exceeded weekly hours.
///
/// Shifts are grouped by the assignee's name, the only link an assigned
/// shift carries. Hour caps come from the guard with that name, if any.
/// Issues are ordered by guard name, then by shift start.
pub fn audit_roster(
    guards: &[Guard],
    shifts: &[Shift],
    min_rest_hours: u32,
    year: i32,
) -> Result<Vec<RosterIssue>, ScheduleError> {
    let mut by_guard: BTreeMap<&str, Vec<(&Shift, ShiftInterval)>> = BTreeMap::new();
    for shift in shifts {
        if let Some(assigned) = &shift.assigned {
            let interval = parse_shift_time(shift, year)?;
            by_guard
                .entry(assigned.name.as_str())
                .or_default()
                .push((shift, interval));
        }
    }

    let guards_by_name: HashMap<&str, &Guard> =
        guards.iter().map(|g| (g.name.as_str(), g)).collect();
    let min_rest = f64::from(min_rest_hours);
    let mut issues = Vec::new();

    for (name, mut held) in by_guard {
        held.sort_by_key(|(_, interval)| interval.start);

        for (i, (shift, interval)) in held.iter().enumerate() {
            for (other, other_interval) in &held[i + 1..] {
                if interval.overlaps(other_interval) {
                    issues.push(RosterIssue::new(
                        shift,
                        name,
                        IssueKind::Overlap,
                        format!("Overlaps with shift {}", other.id),
                    ));
                }
            }
        }

        for pair in held.windows(2) {
            let (_, previous) = &pair[0];
            let (next, interval) = &pair[1];
            let rest = (interval.start - previous.end).num_minutes() as f64 / 60.0;
            // Overlaps are reported above.
            if (0.0..min_rest).contains(&rest) {
                issues.push(RosterIssue::new(
                    next,
                    name,
                    IssueKind::InsufficientRest,
                    format!("Only {:.1} hours rest after previous shift", rest),
                ));
            }
        }

        let cap = guards_by_name
            .get(name)
            .and_then(|g| g.preferences.as_ref())
            .and_then(|p| p.hour_cap());
        if let (Some(cap), Some((last, _))) = (cap, held.last()) {
            let total: f64 = held.iter().map(|(_, interval)| interval.hours()).sum();
            if total > f64::from(cap) {
                issues.push(RosterIssue::new(
                    last,
                    name,
                    IssueKind::ExceededHours,
                    format!("Exceeds maximum weekly hours ({:.1}/{})", total, cap),
                ));
            }
        }
    }

    Ok(issues)
}
