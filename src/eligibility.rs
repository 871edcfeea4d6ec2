//! Hard eligibility checks for a (guard, shift) pair.
//!
//! Checks run in a fixed order and the first failure is reported. The order
//! only affects which [`Exclusion`] is named, never whether a pair passes.
//! Skill and security-level fit is handled by [`crate::scoring`].

use chrono::{Duration, Weekday};
use std::fmt;

use crate::config::ScheduleConfig;
use crate::domain::{Guard, GuardStatus};
use crate::interval::ShiftInterval;
use crate::ledger::GuardLoad;

/// Why a guard cannot take a shift.
#[derive(Debug, Clone, PartialEq)]
pub enum Exclusion {
    /// The guard is on duty or off duty.
    NotAvailable(GuardStatus),
    /// The shift falls on a day the guard marked unavailable.
    UnavailableDay(Weekday),
    /// The guard already holds `max_shifts_per_guard` shifts in this run.
    ShiftCap(u32),
    /// The shift overlaps one already committed to the guard.
    Overlap { shift_id: String },
    /// Too little rest between the shift and one already committed.
    InsufficientRest { shift_id: String, gap: Duration },
}

impl fmt::Display for Exclusion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Exclusion::NotAvailable(status) => write!(f, "guard is {:?}", status),
            Exclusion::UnavailableDay(day) => write!(f, "guard is unavailable on {}", day),
            Exclusion::ShiftCap(cap) => write!(f, "guard already has {} shifts", cap),
            Exclusion::Overlap { shift_id } => write!(f, "overlaps shift {}", shift_id),
            Exclusion::InsufficientRest { shift_id, gap } => write!(
                f,
                "only {:.1} hours rest around shift {}",
                gap.num_minutes() as f64 / 60.0,
                shift_id
            ),
        }
    }
}

/// Runs every hard check and returns the first one that fails.
pub fn check_eligibility(
    guard: &Guard,
    interval: &ShiftInterval,
    load: &GuardLoad,
    config: &ScheduleConfig,
) -> Result<(), Exclusion> {
    if guard.status != GuardStatus::Available {
        return Err(Exclusion::NotAvailable(guard.status));
    }

    if config.consider_guard_preferences {
        if let Some(prefs) = &guard.preferences {
            let day = interval.weekday();
            if prefs.is_unavailable_on(day) {
                return Err(Exclusion::UnavailableDay(day));
            }
        }
    }

    if config.max_shifts_per_guard > 0
        && load.shift_count() >= config.max_shifts_per_guard as usize
    {
        return Err(Exclusion::ShiftCap(config.max_shifts_per_guard));
    }

    for committed in load.commitments() {
        if committed.interval.overlaps(interval) {
            return Err(Exclusion::Overlap {
                shift_id: committed.shift_id.clone(),
            });
        }
    }

    let min_rest = config.min_rest();
    for committed in load.commitments() {
        // `gap` measures in whichever direction the two shifts are ordered.
        if let Some(gap) = committed.interval.gap(interval) {
            if gap < min_rest {
                return Err(Exclusion::InsufficientRest {
                    shift_id: committed.shift_id.clone(),
                    gap,
                });
            }
        }
    }

    Ok(())
}

/// Returns true if the guard passes every hard check for the shift.
pub fn is_eligible(
    guard: &Guard,
    interval: &ShiftInterval,
    load: &GuardLoad,
    config: &ScheduleConfig,
) -> bool {
    check_eligibility(guard, interval, load, config).is_ok()
}
