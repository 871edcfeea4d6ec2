//! Roster storage and applying scheduling results to it.

use parking_lot::RwLock;
use std::collections::HashMap;
use tracing::info;

use crate::domain::{AssignedGuard, Guard, GuardStatus, Roster, Shift};
use crate::error::RosterError;
use crate::result::ScheduleResult;

/// Where guards and shifts live between scheduling runs.
pub trait RosterRepository: Send + Sync {
    fn load_guards(&self) -> Vec<Guard>;
    fn load_shifts(&self) -> Vec<Shift>;

    /// Runs `edit` against the current roster with no other update in
    /// between. The edit is kept only if it returns `Ok`.
    fn update(
        &self,
        edit: &mut dyn FnMut(&mut Roster) -> Result<(), RosterError>,
    ) -> Result<(), RosterError>;
}

/// Process-local roster behind a read/write lock.
#[derive(Debug, Default)]
pub struct InMemoryRoster {
    roster: RwLock<Roster>,
}

impl InMemoryRoster {
    pub fn new(guards: Vec<Guard>, shifts: Vec<Shift>) -> Self {
        Self::from_roster(Roster::new(guards, shifts))
    }

    pub fn from_roster(roster: Roster) -> Self {
        Self {
            roster: RwLock::new(roster),
        }
    }

    /// Copy of the current guards and shifts.
    pub fn snapshot(&self) -> Roster {
        self.roster.read().clone()
    }

    /// Replaces guards and shifts together.
    pub fn replace(&self, roster: Roster) {
        *self.roster.write() = roster;
    }
}

impl RosterRepository for InMemoryRoster {
    fn load_guards(&self) -> Vec<Guard> {
        self.roster.read().guards.clone()
    }

    fn load_shifts(&self) -> Vec<Shift> {
        self.roster.read().shifts.clone()
    }

    fn update(
        &self,
        edit: &mut dyn FnMut(&mut Roster) -> Result<(), RosterError>,
    ) -> Result<(), RosterError> {
        let mut roster = self.roster.write();
        let mut draft = roster.clone();
        edit(&mut draft)?;
        *roster = draft;
        Ok(())
    }
}

/// Writes every assignment in `result` into the roster and marks the
/// assigned guards on duty. Returns the number of shifts assigned.
///
/// The whole result is checked against the current roster first; if any
/// shift or guard is gone, or a shift has been assigned meanwhile, nothing
/// is written. Check and write happen in one [`RosterRepository::update`],
/// so concurrent applies of overlapping results cannot both succeed.
pub fn apply_schedule(
    repo: &dyn RosterRepository,
    result: &ScheduleResult,
) -> Result<usize, RosterError> {
    let mut applied = 0;
    repo.update(&mut |roster| {
        applied = assign_all(roster, result)?;
        Ok(())
    })?;
    info!(applied, "Applied schedule to roster");
    Ok(applied)
}

fn assign_all(roster: &mut Roster, result: &ScheduleResult) -> Result<usize, RosterError> {
    let guard_pos: HashMap<&str, usize> = roster
        .guards
        .iter()
        .enumerate()
        .map(|(i, g)| (g.id.as_str(), i))
        .collect();
    let shift_pos: HashMap<&str, usize> = roster
        .shifts
        .iter()
        .enumerate()
        .map(|(i, s)| (s.id.as_str(), i))
        .collect();

    let mut planned = Vec::with_capacity(result.assignments.len());
    for assignment in &result.assignments {
        let &shift_idx = shift_pos
            .get(assignment.shift_id.as_str())
            .ok_or_else(|| RosterError::UnknownShift(assignment.shift_id.clone()))?;
        let &guard_idx = guard_pos
            .get(assignment.guard_id.as_str())
            .ok_or_else(|| RosterError::UnknownGuard(assignment.guard_id.clone()))?;
        if let Some(current) = &roster.shifts[shift_idx].assigned {
            return Err(RosterError::AlreadyAssigned {
                shift_id: assignment.shift_id.clone(),
                assignee: current.name.clone(),
            });
        }
        planned.push((shift_idx, guard_idx));
    }

    for &(shift_idx, guard_idx) in &planned {
        let guard = &mut roster.guards[guard_idx];
        roster.shifts[shift_idx].assigned = Some(AssignedGuard {
            name: guard.name.clone(),
            avatar: None,
        });
        guard.status = GuardStatus::OnDuty;
    }
    Ok(planned.len())
}

/// Clears the assignment of one shift and returns the updated shift.
///
/// The former assignee goes back to available once they hold no other
/// shift.
pub fn unassign_shift(repo: &dyn RosterRepository, shift_id: &str) -> Result<Shift, RosterError> {
    let mut updated = None;
    repo.update(&mut |roster| {
        let shift = roster
            .shifts
            .iter_mut()
            .find(|s| s.id == shift_id)
            .ok_or_else(|| RosterError::UnknownShift(shift_id.to_string()))?;
        let former = shift
            .assigned
            .take()
            .ok_or_else(|| RosterError::NotAssigned(shift_id.to_string()))?;
        updated = Some(shift.clone());

        let still_busy = roster
            .shifts
            .iter()
            .any(|s| s.assigned.as_ref().is_some_and(|a| a.name == former.name));
        if !still_busy {
            for guard in roster.guards.iter_mut().filter(|g| g.name == former.name) {
                if guard.status == GuardStatus::OnDuty {
                    guard.status = GuardStatus::Available;
                }
            }
        }
        Ok(())
    })?;
    updated.ok_or_else(|| RosterError::UnknownShift(shift_id.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::result::{Assignment, ScheduleMetrics};

    fn roster() -> InMemoryRoster {
        InMemoryRoster::new(
            vec![Guard::new("g1", "Amy Cole"), Guard::new("g2", "Beth Fox")],
            vec![
                Shift::new("s1", "Patrol", "Mall", "Jan 19", "08:00 - 16:00"),
                Shift::new("s2", "Patrol", "Mall", "Jan 20", "08:00 - 16:00"),
            ],
        )
    }

    fn result(pairs: &[(&str, &str)]) -> ScheduleResult {
        ScheduleResult {
            assignments: pairs
                .iter()
                .map(|(shift_id, guard_id)| Assignment {
                    shift_id: shift_id.to_string(),
                    guard_id: guard_id.to_string(),
                    guard_name: String::new(),
                    score: 15.0,
                })
                .collect(),
            unassigned_shifts: vec![],
            conflicts: vec![],
            metrics: ScheduleMetrics {
                total_shifts: pairs.len(),
                assigned_shifts: pairs.len(),
                unassigned_shifts: 0,
                guard_utilization: Default::default(),
                average_guard_utilization: 0.0,
            },
        }
    }

    #[test]
    fn test_apply_assigns_and_marks_on_duty() {
        let repo = roster();
        let applied = apply_schedule(&repo, &result(&[("s1", "g2")])).unwrap();
        assert_eq!(applied, 1);

        let roster = repo.snapshot();
        assert_eq!(roster.shifts[0].assigned.as_ref().unwrap().name, "Beth Fox");
        assert!(roster.shifts[1].assigned.is_none());
        assert_eq!(roster.guards[1].status, GuardStatus::OnDuty);
        assert_eq!(roster.guards[0].status, GuardStatus::Available);
    }

    #[test]
    fn test_stale_result_changes_nothing() {
        let repo = roster();
        let before = repo.snapshot();

        let err = apply_schedule(&repo, &result(&[("s1", "g1"), ("s9", "g1")])).unwrap_err();
        assert_eq!(err, RosterError::UnknownShift("s9".to_string()));
        assert_eq!(repo.snapshot(), before);

        let err = apply_schedule(&repo, &result(&[("s1", "g7")])).unwrap_err();
        assert_eq!(err, RosterError::UnknownGuard("g7".to_string()));
        assert_eq!(repo.snapshot(), before);
    }

    #[test]
    fn test_applying_twice_is_rejected() {
        let repo = roster();
        let run = result(&[("s1", "g1")]);
        apply_schedule(&repo, &run).unwrap();
        let err = apply_schedule(&repo, &run).unwrap_err();
        assert!(matches!(err, RosterError::AlreadyAssigned { ref assignee, .. } if assignee == "Amy Cole"));
    }

    #[test]
    fn test_concurrent_applies_of_same_shift_admit_one() {
        use std::sync::Barrier;

        for _ in 0..20 {
            let repo = roster();
            let barrier = Barrier::new(2);
            let to_amy = result(&[("s1", "g1")]);
            let to_beth = result(&[("s1", "g2")]);

            let outcomes: Vec<Result<usize, RosterError>> = std::thread::scope(|scope| {
                let handles = [&to_amy, &to_beth].map(|run| {
                    let (repo, barrier) = (&repo, &barrier);
                    scope.spawn(move || {
                        barrier.wait();
                        apply_schedule(repo, run)
                    })
                });
                handles.into_iter().map(|h| h.join().unwrap()).collect()
            });

            assert_eq!(outcomes.iter().filter(|o| o.is_ok()).count(), 1);
            assert!(outcomes
                .iter()
                .any(|o| matches!(o, Err(RosterError::AlreadyAssigned { .. }))));

            let roster = repo.snapshot();
            let holder = roster.shifts[0].assigned.as_ref().unwrap().name.clone();
            let on_duty: Vec<&str> = roster
                .guards
                .iter()
                .filter(|g| g.status == GuardStatus::OnDuty)
                .map(|g| g.name.as_str())
                .collect();
            assert_eq!(on_duty, vec![holder.as_str()]);
        }
    }

    #[test]
    fn test_failed_update_keeps_roster() {
        let repo = roster();
        let before = repo.snapshot();
        let err = repo
            .update(&mut |roster| {
                roster.guards[0].status = GuardStatus::OffDuty;
                Err(RosterError::NotAssigned("s1".to_string()))
            })
            .unwrap_err();
        assert_eq!(err, RosterError::NotAssigned("s1".to_string()));
        assert_eq!(repo.snapshot(), before);
    }

    #[test]
    fn test_unassign_frees_guard_after_last_shift() {
        let repo = roster();
        apply_schedule(&repo, &result(&[("s1", "g1"), ("s2", "g1")])).unwrap();

        let shift = unassign_shift(&repo, "s1").unwrap();
        assert!(shift.assigned.is_none());
        assert_eq!(repo.load_guards()[0].status, GuardStatus::OnDuty);

        unassign_shift(&repo, "s2").unwrap();
        assert_eq!(repo.load_guards()[0].status, GuardStatus::Available);

        assert_eq!(
            unassign_shift(&repo, "s2"),
            Err(RosterError::NotAssigned("s2".to_string()))
        );
        assert_eq!(
            unassign_shift(&repo, "nope"),
            Err(RosterError::UnknownShift("nope".to_string()))
        );
    }
}
