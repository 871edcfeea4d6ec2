//! Per-guard commitments made during one scheduling run.

use crate::interval::ShiftInterval;

/// A shift committed to a guard earlier in the run.
#[derive(Debug, Clone, PartialEq)]
pub struct Commitment {
    pub shift_id: String,
    pub interval: ShiftInterval,
}

/// Everything committed to one guard so far.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GuardLoad {
    commitments: Vec<Commitment>,
    hours: f64,
}

impl GuardLoad {
    pub fn commitments(&self) -> &[Commitment] {
        &self.commitments
    }

    pub fn shift_count(&self) -> usize {
        self.commitments.len()
    }

    /// Total committed hours.
    pub fn hours(&self) -> f64 {
        self.hours
    }

    pub fn push(&mut self, commitment: Commitment) {
        self.hours += commitment.interval.hours();
        self.commitments.push(commitment);
    }
}

/// The run-load ledger: one [`GuardLoad`] per input guard, by guard index.
///
/// Created empty at the start of a run and dropped with it; nothing here
/// outlives a single `generate_schedule` call.
#[derive(Debug, Clone, PartialEq)]
pub struct RunLedger {
    loads: Vec<GuardLoad>,
}

impl RunLedger {
    pub fn new(guard_count: usize) -> Self {
        Self {
            loads: vec![GuardLoad::default(); guard_count],
        }
    }

    /// Load of the guard at `guard_idx`.
    ///
    /// # Panics
    ///
    /// Panics if `guard_idx` is not below the guard count given to [`RunLedger::new`].
    pub fn load(&self, guard_idx: usize) -> &GuardLoad {
        &self.loads[guard_idx]
    }

    pub fn commit(&mut self, guard_idx: usize, shift_id: impl Into<String>, interval: ShiftInterval) {
        self.loads[guard_idx].push(Commitment {
            shift_id: shift_id.into(),
            interval,
        });
    }
}
