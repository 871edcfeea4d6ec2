//! Output of a scheduling run.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// One committed (shift, guard) pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Assignment {
    pub shift_id: String,
    pub guard_id: String,
    pub guard_name: String,
    /// Score at the time of commit, with the guard's earlier commitments.
    pub score: f64,
}

/// Why a shift was left unassigned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConflictKind {
    /// A guard passed the hard checks but lacks a required skill or the
    /// shift's security level.
    NoQualifiedGuard,
    /// No qualified guard could take the shift.
    NoAvailableGuard,
}

impl ConflictKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ConflictKind::NoQualifiedGuard => "No qualified guard available",
            ConflictKind::NoAvailableGuard => "No available guard",
        }
    }
}

impl fmt::Display for ConflictKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A shift the run could not staff.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Conflict {
    pub shift_id: String,
    pub kind: ConflictKind,
    pub reason: String,
}

impl Conflict {
    pub fn new(shift_id: impl Into<String>, kind: ConflictKind) -> Self {
        Self {
            shift_id: shift_id.into(),
            kind,
            reason: kind.as_str().to_string(),
        }
    }
}

/// Aggregate counts over one run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleMetrics {
    pub total_shifts: usize,
    pub assigned_shifts: usize,
    pub unassigned_shifts: usize,
    /// Guard id -> shifts assigned, for every input guard.
    pub guard_utilization: BTreeMap<String, usize>,
    /// Mean of `guard_utilization` over every input guard.
    pub average_guard_utilization: f64,
}

/// Everything a scheduling run produced. Immutable once returned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleResult {
    /// In chronological order of the assigned shifts.
    pub assignments: Vec<Assignment>,
    pub unassigned_shifts: Vec<String>,
    pub conflicts: Vec<Conflict>,
    pub metrics: ScheduleMetrics,
}

impl ScheduleResult {
    /// Sum of assignment scores.
    pub fn total_score(&self) -> f64 {
        self.assignments.iter().map(|a| a.score).sum()
    }

    pub fn assignment_for(&self, shift_id: &str) -> Option<&Assignment> {
        self.assignments.iter().find(|a| a.shift_id == shift_id)
    }

    pub fn conflict_for(&self, shift_id: &str) -> Option<&Conflict> {
        self.conflicts.iter().find(|c| c.shift_id == shift_id)
    }

    /// One-line outcome suitable for a notification.
    ///
    /// ```
    /// use guard_scheduling::result::{ScheduleMetrics, ScheduleResult};
    ///
    /// let empty = ScheduleResult {
    ///     assignments: vec![],
    ///     unassigned_shifts: vec![],
    ///     conflicts: vec![],
    ///     metrics: ScheduleMetrics {
    ///         total_shifts: 0,
    ///         assigned_shifts: 0,
    ///         unassigned_shifts: 0,
    ///         guard_utilization: Default::default(),
    ///         average_guard_utilization: 0.0,
    ///     },
    /// };
    /// assert_eq!(
    ///     empty.summary(),
    ///     "Successfully scheduled 0 shifts. 0 shifts could not be assigned."
    /// );
    /// ```
    pub fn summary(&self) -> String {
        format!(
            "Successfully scheduled {} shifts. {} shifts could not be assigned.",
            self.assignments.len(),
            self.conflicts.len()
        )
    }
}
