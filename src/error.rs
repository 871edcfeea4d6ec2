//! Error types for scheduling and roster operations.
//!
//! "No guard could take this shift" is not an error: it is reported as a
//! [`Conflict`](crate::result::Conflict) inside a successful result. The
//! variants here cover input that cannot be scheduled at all.

/// Errors raised while configuring or running the scheduler.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ScheduleError {
    /// A shift's date token is not a month/day pair like "Jan 19".
    #[error("Shift {shift_id}: invalid date '{value}' (expected e.g. \"Jan 19\")")]
    InvalidDate { shift_id: String, value: String },

    /// A shift's time token is not an "HH:MM - HH:MM" range.
    #[error("Shift {shift_id}: invalid time range '{value}' (expected \"HH:MM - HH:MM\")")]
    InvalidTimeRange { shift_id: String, value: String },

    /// Two input shifts share an id.
    #[error("Duplicate shift id '{0}'")]
    DuplicateShiftId(String),

    /// Two input guards share an id.
    #[error("Duplicate guard id '{0}'")]
    DuplicateGuardId(String),

    /// A configuration value is out of range.
    #[error("Invalid configuration: {field} {reason}")]
    InvalidConfig { field: &'static str, reason: String },

    /// A shift template cannot be expanded.
    #[error("Invalid shift template: {0}")]
    InvalidTemplate(String),

    /// Nothing is left to schedule after pre-filtering.
    #[error("No unassigned shifts to schedule")]
    NothingToSchedule,

    /// No guard is available after pre-filtering.
    #[error("No available guards for scheduling")]
    NoAvailableGuards,
}

impl ScheduleError {
    pub(crate) fn invalid_config(field: &'static str, reason: impl Into<String>) -> Self {
        ScheduleError::InvalidConfig {
            field,
            reason: reason.into(),
        }
    }
}

/// Errors raised while applying a result to a roster.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RosterError {
    /// The result names a shift the roster no longer holds.
    #[error("Shift '{0}' is not in the roster")]
    UnknownShift(String),

    /// The result names a guard the roster no longer holds.
    #[error("Guard '{0}' is not in the roster")]
    UnknownGuard(String),

    /// The shift was assigned by someone else after the result was computed.
    #[error("Shift '{shift_id}' is already assigned to {assignee}")]
    AlreadyAssigned { shift_id: String, assignee: String },

    /// The shift has no assignment to clear.
    #[error("Shift '{0}' is not assigned")]
    NotAssigned(String),
}
