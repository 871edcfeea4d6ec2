//! Desirability score for an eligible (guard, shift) pair.
//!
//! Higher is better. [`DISQUALIFIED`] marks pairs that must never be
//! committed: missing skills, insufficient security level, or a weekly-hour
//! cap that the shift would break.

use crate::config::ScheduleConfig;
use crate::domain::{Guard, Shift};
use crate::interval::ShiftInterval;
use crate::ledger::GuardLoad;

/// Sentinel score for a pair that must not be assigned.
pub const DISQUALIFIED: f64 = -100.0;

/// Awarded when the guard covers every required skill.
pub const SKILL_MATCH: f64 = 10.0;

/// Awarded when the guard meets the shift's security level.
pub const LEVEL_MATCH: f64 = 5.0;

/// Returns true if the guard holds every skill the shift requires.
pub fn meets_requirements(guard: &Guard, shift: &Shift) -> bool {
    shift.requirements.iter().all(|req| guard.skills.contains(req))
}

/// Returns true if the shift encodes no level or the guard holds one at
/// least as high.
pub fn meets_security_level(guard: &Guard, shift: &Shift) -> bool {
    match shift.required_level() {
        Some(level) => guard.meets_level(level),
        None => true,
    }
}

/// Scores assigning `guard` to `shift` given what the run has committed to
/// the guard so far.
///
/// Pure: reads only its arguments.
pub fn score(
    guard: &Guard,
    shift: &Shift,
    interval: &ShiftInterval,
    load: &GuardLoad,
    config: &ScheduleConfig,
) -> f64 {
    if !meets_requirements(guard, shift) {
        return DISQUALIFIED;
    }
    let mut score = SKILL_MATCH;

    if !meets_security_level(guard, shift) {
        return DISQUALIFIED;
    }
    score += LEVEL_MATCH;

    let scale = config.priority_scale();
    let priority = config.client_priority;

    if config.consider_guard_preferences {
        if let Some(prefs) = &guard.preferences {
            if prefs.preferred_locations.contains(&shift.location) {
                score += priority.location_bonus() * scale;
            }

            if prefs.preferred_shift_times.contains(&interval.time_of_day()) {
                score += priority.time_bonus() * scale;
            }

            if let Some(cap) = prefs.hour_cap() {
                let cap = f64::from(cap);
                let current = load.hours();
                if current + interval.hours() > cap {
                    return DISQUALIFIED;
                }
                score += (1.0 - current / cap) * priority.hour_bonus() * scale;
            }
        }
    }

    score -= load.shift_count() as f64 * priority.workload_factor() * scale;
    score
}
