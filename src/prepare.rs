//! Pre-filtering a roster into the inputs of one scheduling run.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::debug;

use crate::config::ConfigPatch;
use crate::domain::{Guard, Shift};
use crate::error::ScheduleError;

/// What a caller asks to have scheduled.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ScheduleRequest {
    /// Shift titles to schedule. Empty means every title.
    pub shift_types: Vec<String>,
    pub config: ConfigPatch,
}

/// Guards and shifts selected for a run.
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedRun {
    pub guards: Vec<Guard>,
    pub shifts: Vec<Shift>,
}

/// Keeps unassigned shifts (restricted to `shift_types` when non-empty) and
/// available guards.
///
/// ```
/// use guard_scheduling::domain::{Guard, GuardStatus, Shift};
/// use guard_scheduling::prepare::prepare_run;
///
/// let guards = vec![
///     Guard::new("g1", "Amy Cole"),
///     Guard::new("g2", "Beth Fox").with_status(GuardStatus::OffDuty),
/// ];
/// let shifts = vec![
///     Shift::new("s1", "Mall Patrol", "Mall", "Jan 19", "08:00 - 16:00"),
///     Shift::new("s2", "Front Desk", "Campus", "Jan 19", "08:00 - 16:00"),
/// ];
///
/// let run = prepare_run(&guards, &shifts, &["Mall Patrol".to_string()]).unwrap();
/// assert_eq!(run.guards.len(), 1);
/// assert_eq!(run.shifts.len(), 1);
/// assert_eq!(run.shifts[0].id, "s1");
/// ```
pub fn prepare_run(
    guards: &[Guard],
    shifts: &[Shift],
    shift_types: &[String],
) -> Result<PreparedRun, ScheduleError> {
    let types: HashSet<&str> = shift_types.iter().map(String::as_str).collect();

    let shifts: Vec<Shift> = shifts
        .iter()
        .filter(|s| !s.is_assigned())
        .filter(|s| types.is_empty() || types.contains(s.title.as_str()))
        .cloned()
        .collect();
    if shifts.is_empty() {
        return Err(ScheduleError::NothingToSchedule);
    }

    let guards: Vec<Guard> = guards.iter().filter(|g| g.is_available()).cloned().collect();
    if guards.is_empty() {
        return Err(ScheduleError::NoAvailableGuards);
    }

    debug!(
        guards = guards.len(),
        shifts = shifts.len(),
        shift_types = types.len(),
        "Prepared scheduling run"
    );
    Ok(PreparedRun { guards, shifts })
}
