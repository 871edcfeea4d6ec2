//! Greedy auto-scheduler for guard shifts.
//!
//! Shifts are processed in chronological order. Each one goes to the
//! highest-scoring eligible guard, or becomes a [`Conflict`] when nobody
//! scores above zero. A bounded swap pass then exchanges guards between
//! pairs of assignments while that strictly raises the total score.

use std::collections::{BTreeMap, HashSet};
use std::time::Instant;
use tracing::{debug, info};

use crate::config::{ConfigPatch, ScheduleConfig};
use crate::domain::{Guard, Shift};
use crate::eligibility::check_eligibility;
use crate::error::ScheduleError;
use crate::interval::{parse_shift_time, ShiftInterval};
use crate::ledger::{Commitment, GuardLoad, RunLedger};
use crate::result::{Assignment, Conflict, ConflictKind, ScheduleMetrics, ScheduleResult};
use crate::scoring::{meets_requirements, meets_security_level, score};

/// Minimum gain for a swap to count as an improvement.
const SWAP_EPSILON: f64 = 1e-9;

/// Matches guards to shifts.
///
/// # Examples
///
/// ```
/// use guard_scheduling::config::ScheduleConfig;
/// use guard_scheduling::domain::{Guard, Shift};
/// use guard_scheduling::solver::AutoScheduler;
///
/// let guards = vec![Guard::new("g1", "Amy Cole").with_skills(["Level 2"])];
/// let shifts = vec![
///     Shift::new("s1", "Patrol", "Mall", "Jan 19", "08:00 - 16:00")
///         .with_security_level("Level 2"),
/// ];
/// let scheduler =
///     AutoScheduler::with_config(guards, shifts, ScheduleConfig::for_year(2025)).unwrap();
///
/// let result = scheduler.generate_schedule().unwrap();
/// assert_eq!(result.assignments.len(), 1);
/// assert_eq!(result.assignments[0].guard_id, "g1");
/// assert!(result.conflicts.is_empty());
/// ```
#[derive(Debug, Clone)]
pub struct AutoScheduler {
    guards: Vec<Guard>,
    shifts: Vec<Shift>,
    config: ScheduleConfig,
}

impl AutoScheduler {
    /// Creates a scheduler with the default configuration.
    pub fn new(guards: Vec<Guard>, shifts: Vec<Shift>) -> Result<Self, ScheduleError> {
        Self::with_config(guards, shifts, ScheduleConfig::default())
    }

    /// Creates a scheduler with an explicit configuration.
    ///
    /// Rejects duplicate guard or shift ids and invalid configuration.
    pub fn with_config(
        guards: Vec<Guard>,
        shifts: Vec<Shift>,
        config: ScheduleConfig,
    ) -> Result<Self, ScheduleError> {
        config.validate()?;

        let mut seen = HashSet::new();
        for guard in &guards {
            if !seen.insert(guard.id.as_str()) {
                return Err(ScheduleError::DuplicateGuardId(guard.id.clone()));
            }
        }
        let mut seen = HashSet::new();
        for shift in &shifts {
            if !seen.insert(shift.id.as_str()) {
                return Err(ScheduleError::DuplicateShiftId(shift.id.clone()));
            }
        }

        Ok(Self {
            guards,
            shifts,
            config,
        })
    }

    /// Merges `patch` into the current configuration.
    ///
    /// On error the configuration is left unchanged.
    pub fn configure(&mut self, patch: &ConfigPatch) -> Result<(), ScheduleError> {
        self.config = self.config.merged(patch)?;
        Ok(())
    }

    pub fn config(&self) -> &ScheduleConfig {
        &self.config
    }

    /// Runs the scheduler over the guards and shifts given at construction.
    ///
    /// Shifts that already carry an assignment are left out of the run. Fails
    /// only on malformed shift times; unstaffable shifts become conflicts.
    pub fn generate_schedule(&self) -> Result<ScheduleResult, ScheduleError> {
        let run_start = Instant::now();
        let run = Run::new(&self.guards, &self.shifts, &self.config)?;

        info!(
            guards = self.guards.len(),
            shifts = run.len(),
            skipped = self.shifts.len() - run.len(),
            client_priority = ?self.config.client_priority,
            priority_level = self.config.priority_level,
            "Starting auto-schedule"
        );

        let (mut chosen, conflicts) = run.construct();
        let swaps = run.improve(&mut chosen);
        let result = run.finish(&chosen, conflicts);

        info!(
            assigned = result.metrics.assigned_shifts,
            unassigned = result.metrics.unassigned_shifts,
            swaps,
            total_score = result.total_score(),
            duration_ms = run_start.elapsed().as_millis() as u64,
            "Auto-schedule complete"
        );

        Ok(result)
    }
}

/// State shared by the phases of one `generate_schedule` call.
///
/// Shifts to schedule are addressed by their position in chronological
/// order; `chosen[pos]` is the guard index holding that shift, if any.
struct Run<'a> {
    guards: &'a [Guard],
    config: &'a ScheduleConfig,
    /// Unassigned input shifts, sorted by start.
    shifts: Vec<&'a Shift>,
    /// Normalized interval of `shifts[pos]`.
    intervals: Vec<ShiftInterval>,
}

impl<'a> Run<'a> {
    fn new(
        guards: &'a [Guard],
        shifts: &'a [Shift],
        config: &'a ScheduleConfig,
    ) -> Result<Self, ScheduleError> {
        let mut timed = Vec::with_capacity(shifts.len());
        for shift in shifts {
            if shift.is_assigned() {
                debug!(shift_id = %shift.id, "Skipping already assigned shift");
                continue;
            }
            timed.push((shift, parse_shift_time(shift, config.reference_year)?));
        }
        // Stable: shifts starting together keep their input order.
        timed.sort_by_key(|(_, interval)| interval.start);

        let (shifts, intervals) = timed.into_iter().unzip();
        Ok(Self {
            guards,
            config,
            shifts,
            intervals,
        })
    }

    fn len(&self) -> usize {
        self.shifts.len()
    }

    /// Greedy pass. Returns the chosen guard per position and the conflicts
    /// in processing order.
    fn construct(&self) -> (Vec<Option<usize>>, Vec<Conflict>) {
        let mut ledger = RunLedger::new(self.guards.len());
        let mut chosen = vec![None; self.len()];
        let mut conflicts = Vec::new();

        for (pos, (shift, interval)) in self.shifts.iter().zip(&self.intervals).enumerate() {
            let mut best: Option<(usize, f64)> = None;
            let mut any_unqualified = false;

            for (guard_idx, guard) in self.guards.iter().enumerate() {
                let load = ledger.load(guard_idx);
                if let Err(exclusion) = check_eligibility(guard, interval, load, self.config) {
                    debug!(shift_id = %shift.id, guard_id = %guard.id, %exclusion, "Guard excluded");
                    continue;
                }
                if !meets_requirements(guard, shift) || !meets_security_level(guard, shift) {
                    any_unqualified = true;
                }

                let candidate = score(guard, shift, interval, load, self.config);
                if best.map_or(true, |(_, top)| candidate > top) {
                    best = Some((guard_idx, candidate));
                }
            }

            match best {
                Some((guard_idx, top)) if top > 0.0 => {
                    ledger.commit(guard_idx, shift.id.clone(), *interval);
                    chosen[pos] = Some(guard_idx);
                }
                _ => {
                    // Qualified guards turned away by hours or workload are
                    // unavailable, not unqualified.
                    let kind = if any_unqualified {
                        ConflictKind::NoQualifiedGuard
                    } else {
                        ConflictKind::NoAvailableGuard
                    };
                    debug!(shift_id = %shift.id, reason = %kind, "Shift left unassigned");
                    conflicts.push(Conflict::new(shift.id.clone(), kind));
                }
            }
        }

        (chosen, conflicts)
    }

    /// Replays one guard's shifts in chronological order, returning the score
    /// of each, or `None` if any of them would be ineligible or disqualified.
    fn replay_guard(&self, guard_idx: usize, positions: &[usize]) -> Option<Vec<f64>> {
        let guard = &self.guards[guard_idx];
        let mut load = GuardLoad::default();
        let mut scores = Vec::with_capacity(positions.len());

        for &pos in positions {
            let shift = self.shifts[pos];
            let interval = &self.intervals[pos];
            if check_eligibility(guard, interval, &load, self.config).is_err() {
                return None;
            }
            let value = score(guard, shift, interval, &load, self.config);
            if value <= 0.0 {
                return None;
            }
            scores.push(value);
            load.push(Commitment {
                shift_id: shift.id.clone(),
                interval: *interval,
            });
        }

        Some(scores)
    }

    /// Positions held by each guard, each list in chronological order.
    fn positions_by_guard(&self, chosen: &[Option<usize>]) -> Vec<Vec<usize>> {
        let mut by_guard = vec![Vec::new(); self.guards.len()];
        for (pos, guard_idx) in chosen.iter().enumerate() {
            if let Some(guard_idx) = guard_idx {
                by_guard[*guard_idx].push(pos);
            }
        }
        by_guard
    }

    /// Static part of the hard checks: status, skills, level, unavailable day.
    /// Used to skip swaps that can never be feasible before replaying.
    fn could_take(&self, guard_idx: usize, pos: usize) -> bool {
        let guard = &self.guards[guard_idx];
        let shift = self.shifts[pos];
        if !guard.is_available() || !meets_requirements(guard, shift) {
            return false;
        }
        if !meets_security_level(guard, shift) {
            return false;
        }
        if self.config.consider_guard_preferences {
            if let Some(prefs) = &guard.preferences {
                if prefs.is_unavailable_on(self.intervals[pos].weekday()) {
                    return false;
                }
            }
        }
        true
    }

    /// [`Run::could_take`] for every guard and position, indexed `[guard][pos]`.
    fn takeable(&self) -> Vec<Vec<bool>> {
        (0..self.guards.len())
            .map(|guard_idx| (0..self.len()).map(|pos| self.could_take(guard_idx, pos)).collect())
            .collect()
    }

    /// Swap pass. Walks the pairs of assigned positions cyclically, applying
    /// each strictly improving swap and resuming right after it. Stops after
    /// `max_swap_iterations` swaps or a full cycle without one. Returns the
    /// number of swaps applied.
    fn improve(&self, chosen: &mut [Option<usize>]) -> u32 {
        let max_swaps = self.config.max_swap_iterations;
        // Swaps exchange guards, so the set of assigned positions is fixed.
        let assigned: Vec<usize> = chosen
            .iter()
            .enumerate()
            .filter_map(|(pos, guard_idx)| guard_idx.map(|_| pos))
            .collect();
        let mut pairs = PairCursor::new(assigned.len());
        if max_swaps == 0 || pairs.len() == 0 {
            return 0;
        }

        let mut by_guard = self.positions_by_guard(chosen);
        let mut totals: Vec<f64> = Vec::with_capacity(by_guard.len());
        for (guard_idx, positions) in by_guard.iter().enumerate() {
            match self.replay_guard(guard_idx, positions) {
                Some(scores) => totals.push(scores.iter().sum()),
                None => {
                    debug!("Greedy schedule failed replay, skipping swap pass");
                    return 0;
                }
            }
        }
        let takeable = self.takeable();

        let mut swaps = 0;
        let mut since_last_swap = 0;
        while swaps < max_swaps && since_last_swap < pairs.len() {
            let (i, j) = pairs.advance();
            since_last_swap += 1;

            let (first_pos, second_pos) = (assigned[i], assigned[j]);
            let (Some(first_guard), Some(second_guard)) = (chosen[first_pos], chosen[second_pos])
            else {
                continue;
            };
            if first_guard == second_guard
                || !takeable[second_guard][first_pos]
                || !takeable[first_guard][second_pos]
            {
                continue;
            }

            let Some(swap) = self.try_swap(
                (first_pos, first_guard),
                (second_pos, second_guard),
                &by_guard,
                &totals,
            ) else {
                continue;
            };
            chosen[first_pos] = Some(second_guard);
            chosen[second_pos] = Some(first_guard);
            totals[first_guard] = swap.first_total;
            totals[second_guard] = swap.second_total;
            by_guard[first_guard] = swap.first_positions;
            by_guard[second_guard] = swap.second_positions;
            swaps += 1;
            since_last_swap = 0;
        }
        swaps
    }

    /// Replays both guards with their `(position, guard)` assignments
    /// exchanged. Only the two touched guards are replayed; `totals` holds
    /// the current sum for every other guard.
    fn try_swap(
        &self,
        (first_pos, first_guard): (usize, usize),
        (second_pos, second_guard): (usize, usize),
        by_guard: &[Vec<usize>],
        totals: &[f64],
    ) -> Option<Swap> {
        let first_positions = exchange(&by_guard[first_guard], first_pos, second_pos);
        let first_total: f64 = self.replay_guard(first_guard, &first_positions)?.iter().sum();
        let second_positions = exchange(&by_guard[second_guard], second_pos, first_pos);
        let second_total: f64 = self.replay_guard(second_guard, &second_positions)?.iter().sum();

        let gain = first_total + second_total - totals[first_guard] - totals[second_guard];
        if gain <= SWAP_EPSILON {
            return None;
        }
        debug!(
            first = %self.shifts[first_pos].id,
            second = %self.shifts[second_pos].id,
            gain,
            "Swapping guards"
        );
        Some(Swap {
            first_positions,
            second_positions,
            first_total,
            second_total,
        })
    }

    fn finish(&self, chosen: &[Option<usize>], conflicts: Vec<Conflict>) -> ScheduleResult {
        let by_guard = self.positions_by_guard(chosen);
        let mut scores = vec![0.0; self.len()];
        for (guard_idx, positions) in by_guard.iter().enumerate() {
            if let Some(guard_scores) = self.replay_guard(guard_idx, positions) {
                for (&pos, value) in positions.iter().zip(guard_scores) {
                    scores[pos] = value;
                }
            }
        }

        let assignments: Vec<Assignment> = chosen
            .iter()
            .enumerate()
            .filter_map(|(pos, guard_idx)| {
                guard_idx.map(|guard_idx| {
                    let guard = &self.guards[guard_idx];
                    Assignment {
                        shift_id: self.shifts[pos].id.clone(),
                        guard_id: guard.id.clone(),
                        guard_name: guard.name.clone(),
                        score: scores[pos],
                    }
                })
            })
            .collect();

        let guard_utilization: BTreeMap<String, usize> = self
            .guards
            .iter()
            .zip(&by_guard)
            .map(|(guard, positions)| (guard.id.clone(), positions.len()))
            .collect();
        let average_guard_utilization = if self.guards.is_empty() {
            0.0
        } else {
            assignments.len() as f64 / self.guards.len() as f64
        };

        let metrics = ScheduleMetrics {
            total_shifts: self.len(),
            assigned_shifts: assignments.len(),
            unassigned_shifts: conflicts.len(),
            guard_utilization,
            average_guard_utilization,
        };

        ScheduleResult {
            unassigned_shifts: conflicts.iter().map(|c| c.shift_id.clone()).collect(),
            assignments,
            conflicts,
            metrics,
        }
    }
}

/// `positions` with `out` replaced by `incoming`, kept in chronological order.
fn exchange(positions: &[usize], out: usize, incoming: usize) -> Vec<usize> {
    let mut next: Vec<usize> = positions.iter().copied().filter(|&p| p != out).collect();
    next.push(incoming);
    next.sort_unstable();
    next
}

/// Replayed schedules of the two guards after an improving exchange.
struct Swap {
    first_positions: Vec<usize>,
    second_positions: Vec<usize>,
    first_total: f64,
    second_total: f64,
}

/// Cycles through the index pairs `(i, j)` with `i < j < n`, row by row,
/// wrapping back to `(0, 1)` after the last pair.
struct PairCursor {
    n: usize,
    i: usize,
    j: usize,
}

impl PairCursor {
    fn new(n: usize) -> Self {
        Self { n, i: 0, j: 1 }
    }

    /// Number of distinct pairs.
    fn len(&self) -> usize {
        self.n * self.n.saturating_sub(1) / 2
    }

    /// Returns the current pair and moves to the next one. Only call when
    /// `len() > 0`.
    fn advance(&mut self) -> (usize, usize) {
        let pair = (self.i, self.j);
        self.j += 1;
        if self.j == self.n {
            self.i += 1;
            if self.i + 1 >= self.n {
                self.i = 0;
            }
            self.j = self.i + 1;
        }
        pair
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::audit_roster;
    use crate::demo_data::{self, DemoData, DEMO_YEAR};
    use crate::domain::{GuardPreferences, GuardStatus};
    use crate::interval::shift_hours;
    use crate::repository::{apply_schedule, InMemoryRoster, RosterRepository};
    use std::collections::HashMap;

    const YEAR: i32 = 2025;

    fn config() -> ScheduleConfig {
        ScheduleConfig::for_year(YEAR)
    }

    fn level2_shift(id: &str, date: &str, time: &str) -> Shift {
        Shift::new(id, "Patrol", "Mall", date, time)
            .with_security_level("Security Level 2")
            .with_requirements(["Level 2"])
    }

    #[test]
    fn test_overlapping_shifts_for_single_guard() {
        let guards = vec![Guard::new("g1", "Amy Cole").with_skills(["Level 2"])];
        let shifts = vec![
            level2_shift("s1", "Jan 21", "08:00 - 16:00"),
            level2_shift("s2", "Jan 21", "15:00 - 23:00"),
        ];
        let result = AutoScheduler::with_config(guards, shifts, config())
            .unwrap()
            .generate_schedule()
            .unwrap();

        assert_eq!(result.assignments.len(), 1);
        assert_eq!(result.assignments[0].shift_id, "s1");
        assert_eq!(result.conflicts.len(), 1);
        assert_eq!(result.conflicts[0].shift_id, "s2");
        assert_eq!(result.conflicts[0].kind, ConflictKind::NoAvailableGuard);
    }

    #[test]
    fn test_unavailable_weekday() {
        let prefs = GuardPreferences {
            unavailable_days: ["saturday".to_string()].into_iter().collect(),
            ..Default::default()
        };
        let guards = vec![Guard::new("g1", "Amy Cole")
            .with_skills(["Level 2"])
            .with_preferences(prefs)];
        // Jan 18 2025 is a Saturday.
        let shifts = vec![level2_shift("s1", "Jan 18", "08:00 - 16:00")];
        let result = AutoScheduler::with_config(guards, shifts, config())
            .unwrap()
            .generate_schedule()
            .unwrap();

        assert!(result.assignments.is_empty());
        assert_eq!(result.conflicts[0].kind, ConflictKind::NoAvailableGuard);
        assert_eq!(result.conflicts[0].reason, "No available guard");
    }

    #[test]
    fn test_security_level_selection() {
        let shift = Shift::new("s1", "Patrol", "Bank", "Jan 21", "08:00 - 16:00")
            .with_security_level("Level 2");
        let senior = Guard::new("g3", "Carl Green").with_skills(["Level 3"]);
        let junior = Guard::new("g1", "Dan Jones").with_skills(["Level 1"]);

        let result = AutoScheduler::with_config(
            vec![junior.clone(), senior.clone()],
            vec![shift.clone()],
            config(),
        )
        .unwrap()
        .generate_schedule()
        .unwrap();
        assert_eq!(result.assignments[0].guard_id, "g3");

        let result = AutoScheduler::with_config(
            vec![junior, senior.with_status(GuardStatus::OffDuty)],
            vec![shift],
            config(),
        )
        .unwrap()
        .generate_schedule()
        .unwrap();
        assert!(result.assignments.is_empty());
        assert_eq!(result.conflicts[0].kind, ConflictKind::NoQualifiedGuard);
        assert_eq!(result.conflicts[0].reason, "No qualified guard available");
    }

    #[test]
    fn test_hour_cap_only_rejection_is_no_available_guard() {
        let capped = Guard::new("g1", "Amy Cole")
            .with_skills(["Level 3"])
            .with_preferences(GuardPreferences {
                max_hours_per_week: Some(4),
                ..Default::default()
            });
        let shift = Shift::new("s1", "Patrol", "Bank", "Jan 21", "08:00 - 16:00")
            .with_security_level("Level 2");
        let result = AutoScheduler::with_config(vec![capped], vec![shift], config())
            .unwrap()
            .generate_schedule()
            .unwrap();

        assert!(result.assignments.is_empty());
        assert_eq!(result.conflicts[0].kind, ConflictKind::NoAvailableGuard);
        assert_eq!(result.conflicts[0].reason, "No available guard");
    }

    #[test]
    fn test_ties_go_to_first_guard() {
        let guards = vec![
            Guard::new("g1", "Amy Cole").with_skills(["Level 2"]),
            Guard::new("g2", "Beth Fox").with_skills(["Level 2"]),
        ];
        let shifts = vec![level2_shift("s1", "Jan 21", "08:00 - 16:00")];
        let result = AutoScheduler::with_config(guards, shifts, config())
            .unwrap()
            .generate_schedule()
            .unwrap();
        assert_eq!(result.assignments[0].guard_id, "g1");
        assert_eq!(result.assignments[0].score, 15.0);
    }

    #[test]
    fn test_shifts_processed_chronologically() {
        let guards = vec![Guard::new("g1", "Amy Cole").with_skills(["Level 2"])];
        // Listed late-first; the earlier shift must win the single guard.
        let shifts = vec![
            level2_shift("late", "Jan 21", "15:00 - 23:00"),
            level2_shift("early", "Jan 21", "08:00 - 16:00"),
        ];
        let result = AutoScheduler::with_config(guards, shifts, config())
            .unwrap()
            .generate_schedule()
            .unwrap();
        assert_eq!(result.assignments[0].shift_id, "early");
        assert_eq!(result.conflicts[0].shift_id, "late");
    }

    #[test]
    fn test_workload_spreads_across_guards() {
        let guards = vec![
            Guard::new("g1", "Amy Cole").with_skills(["Level 2"]),
            Guard::new("g2", "Beth Fox").with_skills(["Level 2"]),
        ];
        let shifts = vec![
            level2_shift("s1", "Jan 21", "08:00 - 16:00"),
            level2_shift("s2", "Jan 23", "08:00 - 16:00"),
        ];
        let result = AutoScheduler::with_config(guards, shifts, config())
            .unwrap()
            .generate_schedule()
            .unwrap();
        assert_eq!(result.assignment_for("s1").unwrap().guard_id, "g1");
        assert_eq!(result.assignment_for("s2").unwrap().guard_id, "g2");
        assert_eq!(result.metrics.guard_utilization["g1"], 1);
        assert_eq!(result.metrics.average_guard_utilization, 1.0);
    }

    #[test]
    fn test_swap_pass_fixes_greedy_tie_break() {
        // g1 wins the tie on s1, which blocks it from s2 at the location it
        // prefers. Exchanging the two assignments gains the location bonus.
        let prefs = GuardPreferences {
            preferred_locations: ["Harbor".to_string()].into_iter().collect(),
            ..Default::default()
        };
        let guards = vec![
            Guard::new("g1", "Amy Cole")
                .with_skills(["Level 2"])
                .with_preferences(prefs),
            Guard::new("g2", "Beth Fox").with_skills(["Level 2"]),
        ];
        let shifts = vec![
            Shift::new("s1", "Patrol", "Mall", "Jan 21", "08:00 - 16:00"),
            Shift::new("s2", "Patrol", "Harbor", "Jan 21", "12:00 - 20:00"),
        ];

        let greedy = AutoScheduler::with_config(
            guards.clone(),
            shifts.clone(),
            ScheduleConfig {
                max_swap_iterations: 0,
                ..config()
            },
        )
        .unwrap()
        .generate_schedule()
        .unwrap();
        assert_eq!(greedy.assignment_for("s1").unwrap().guard_id, "g1");
        assert_eq!(greedy.assignment_for("s2").unwrap().guard_id, "g2");
        assert_eq!(greedy.total_score(), 30.0);

        let improved = AutoScheduler::with_config(guards, shifts, config())
            .unwrap()
            .generate_schedule()
            .unwrap();
        assert_eq!(improved.assignment_for("s1").unwrap().guard_id, "g2");
        assert_eq!(improved.assignment_for("s2").unwrap().guard_id, "g1");
        assert_eq!(improved.total_score(), 33.0);
    }

    #[test]
    fn test_pair_cursor_wraps_after_last_pair() {
        let mut pairs = PairCursor::new(3);
        assert_eq!(pairs.len(), 3);
        let seen: Vec<(usize, usize)> = (0..4).map(|_| pairs.advance()).collect();
        assert_eq!(seen, vec![(0, 1), (0, 2), (1, 2), (0, 1)]);
        assert_eq!(PairCursor::new(1).len(), 0);
    }

    #[test]
    fn test_swap_count_respects_iteration_cap() {
        let roster = demo_data::generate(DemoData::Small);
        let capped = ScheduleConfig {
            max_swap_iterations: 1,
            ..ScheduleConfig::for_year(DEMO_YEAR)
        };
        let run = Run::new(&roster.guards, &roster.shifts, &capped).unwrap();
        let (mut chosen, _) = run.construct();
        let before: Vec<bool> = chosen.iter().map(Option::is_some).collect();
        assert!(run.improve(&mut chosen) <= 1);
        let after: Vec<bool> = chosen.iter().map(Option::is_some).collect();
        assert_eq!(before, after);
    }

    #[test]
    fn test_preassigned_shifts_are_skipped() {
        let mut taken = level2_shift("taken", "Jan 21", "08:00 - 16:00");
        taken.assigned = Some(crate::domain::AssignedGuard {
            name: "Beth Fox".to_string(),
            avatar: None,
        });
        let guards = vec![Guard::new("g1", "Amy Cole").with_skills(["Level 2"])];
        let shifts = vec![taken, level2_shift("open", "Jan 22", "08:00 - 16:00")];
        let result = AutoScheduler::with_config(guards, shifts, config())
            .unwrap()
            .generate_schedule()
            .unwrap();
        assert_eq!(result.metrics.total_shifts, 1);
        assert_eq!(result.assignments[0].shift_id, "open");
        assert!(result.conflict_for("taken").is_none());
    }

    #[test]
    fn test_malformed_time_fails_whole_run() {
        let guards = vec![Guard::new("g1", "Amy Cole").with_skills(["Level 2"])];
        let shifts = vec![
            level2_shift("s1", "Jan 21", "08:00 - 16:00"),
            level2_shift("s2", "Jan 21", "noon"),
        ];
        let err = AutoScheduler::with_config(guards, shifts, config())
            .unwrap()
            .generate_schedule()
            .unwrap_err();
        assert!(matches!(err, ScheduleError::InvalidTimeRange { ref shift_id, .. } if shift_id == "s2"));
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let guard = Guard::new("g1", "Amy Cole");
        let err = AutoScheduler::new(vec![guard.clone(), guard], vec![]).unwrap_err();
        assert_eq!(err, ScheduleError::DuplicateGuardId("g1".to_string()));

        let shift = level2_shift("s1", "Jan 21", "08:00 - 16:00");
        let err = AutoScheduler::new(vec![], vec![shift.clone(), shift]).unwrap_err();
        assert_eq!(err, ScheduleError::DuplicateShiftId("s1".to_string()));
    }

    #[test]
    fn test_configure_rejects_and_keeps_previous() {
        let mut scheduler = AutoScheduler::with_config(vec![], vec![], config()).unwrap();
        scheduler
            .configure(&ConfigPatch {
                min_rest_hours: Some(12),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(scheduler.config().min_rest_hours, 12);

        let err = scheduler.configure(&ConfigPatch {
            min_rest_hours: Some(-4),
            priority_level: Some(9),
            ..Default::default()
        });
        assert!(err.is_err());
        assert_eq!(scheduler.config().min_rest_hours, 12);
        assert_eq!(scheduler.config().priority_level, 5);
    }

    #[test]
    fn test_empty_inputs() {
        let result = AutoScheduler::with_config(vec![], vec![], config())
            .unwrap()
            .generate_schedule()
            .unwrap();
        assert_eq!(result.metrics.total_shifts, 0);
        assert_eq!(result.metrics.average_guard_utilization, 0.0);

        let shifts = vec![level2_shift("s1", "Jan 21", "08:00 - 16:00")];
        let result = AutoScheduler::with_config(vec![], shifts, config())
            .unwrap()
            .generate_schedule()
            .unwrap();
        assert_eq!(result.conflicts[0].kind, ConflictKind::NoAvailableGuard);
    }

    fn demo_result(config: ScheduleConfig) -> (Vec<Guard>, Vec<Shift>, ScheduleResult) {
        let roster = demo_data::generate(DemoData::Small);
        let result = AutoScheduler::with_config(roster.guards.clone(), roster.shifts.clone(), config)
            .unwrap()
            .generate_schedule()
            .unwrap();
        (roster.guards, roster.shifts, result)
    }

    #[test]
    fn test_demo_partition_property() {
        let (_, shifts, result) = demo_result(ScheduleConfig::for_year(DEMO_YEAR));
        let assigned: HashSet<&str> = result.assignments.iter().map(|a| a.shift_id.as_str()).collect();
        let conflicted: HashSet<&str> = result.conflicts.iter().map(|c| c.shift_id.as_str()).collect();

        assert_eq!(assigned.len(), result.assignments.len());
        assert_eq!(conflicted.len(), result.conflicts.len());
        assert!(assigned.is_disjoint(&conflicted));
        for shift in &shifts {
            assert!(
                assigned.contains(shift.id.as_str()) || conflicted.contains(shift.id.as_str()),
                "shift {} missing from result",
                shift.id
            );
        }
        assert_eq!(
            result.metrics.assigned_shifts + result.metrics.unassigned_shifts,
            result.metrics.total_shifts
        );
    }

    #[test]
    fn test_demo_hard_constraints_hold() {
        let config = ScheduleConfig::for_year(DEMO_YEAR);
        let (guards, shifts, result) = demo_result(config.clone());
        let guards_by_id: HashMap<&str, &Guard> = guards.iter().map(|g| (g.id.as_str(), g)).collect();
        let shifts_by_id: HashMap<&str, &Shift> = shifts.iter().map(|s| (s.id.as_str(), s)).collect();

        let mut hours: HashMap<&str, f64> = HashMap::new();
        for assignment in &result.assignments {
            let guard = guards_by_id[assignment.guard_id.as_str()];
            let shift = shifts_by_id[assignment.shift_id.as_str()];
            assert!(meets_requirements(guard, shift), "{} lacks skills for {}", guard.id, shift.id);
            assert!(meets_security_level(guard, shift), "{} under level for {}", guard.id, shift.id);
            assert!(assignment.score > 0.0);
            *hours.entry(guard.id.as_str()).or_default() += shift_hours(shift, DEMO_YEAR).unwrap();
        }

        for guard in &guards {
            if let Some(cap) = guard.preferences.as_ref().and_then(|p| p.hour_cap()) {
                let worked = hours.get(guard.id.as_str()).copied().unwrap_or(0.0);
                assert!(worked <= f64::from(cap), "{} worked {} > {}", guard.id, worked, cap);
            }
        }

        // Applying the result and auditing the roster finds no overlap or
        // rest violation.
        let repo = InMemoryRoster::new(guards, shifts);
        apply_schedule(&repo, &result).unwrap();
        let issues = audit_roster(
            &repo.load_guards(),
            &repo.load_shifts(),
            config.min_rest_hours,
            DEMO_YEAR,
        )
        .unwrap();
        assert!(issues.is_empty(), "audit found {:?}", issues);
    }

    #[test]
    fn test_demo_is_deterministic() {
        let (_, _, first) = demo_result(ScheduleConfig::for_year(DEMO_YEAR));
        let (_, _, second) = demo_result(ScheduleConfig::for_year(DEMO_YEAR));
        assert_eq!(first, second);
    }

    #[test]
    fn test_swap_pass_never_lowers_total() {
        let (_, _, greedy) = demo_result(ScheduleConfig {
            max_swap_iterations: 0,
            ..ScheduleConfig::for_year(DEMO_YEAR)
        });
        let (_, _, improved) = demo_result(ScheduleConfig::for_year(DEMO_YEAR));
        assert!(improved.total_score() >= greedy.total_score() - SWAP_EPSILON);
        assert_eq!(improved.assignments.len(), greedy.assignments.len());
    }
}
