//! Waitlist entry state machine.
//!
//! An entry is a single row per affiliation identifier that cycles through
//! `Waiting -> Attending -> Removed` and back to `Waiting` on reactivation.
//! The numeric ids match the seed data of the `waitlist_statuses` table.

use serde::Serialize;

use crate::error::CoreError;
use crate::types::StatusId;

/// Area assigned to a new entry when the submitter does not name one.
pub const DEFAULT_AREA: &str = "general";

/// Lifecycle state of a waitlist entry.
#[repr(i16)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryState {
    /// Queued, not yet seen.
    Waiting = 1,
    /// Currently being seen.
    Attending = 2,
    /// Visit concluded or withdrawn. Historical.
    Removed = 3,
}

/// States that make up the active queue.
pub const ACTIVE_STATES: [EntryState; 2] = [EntryState::Waiting, EntryState::Attending];

impl EntryState {
    /// Return the database status ID.
    pub fn id(self) -> StatusId {
        self as StatusId
    }

    /// Name as seeded in `waitlist_statuses.name`.
    pub fn as_str(self) -> &'static str {
        match self {
            EntryState::Waiting => "waiting",
            EntryState::Attending => "attending",
            EntryState::Removed => "removed",
        }
    }

    /// Whether the entry belongs to the active queue.
    pub fn is_active(self) -> bool {
        ACTIVE_STATES.contains(&self)
    }

    /// Whether an operator action may move an entry from `self` to `to`.
    ///
    /// Reactivation (`* -> Waiting`) is not an operator transition; it is
    /// applied unconditionally by a waitlist submission.
    pub fn can_transition_to(self, to: EntryState) -> bool {
        matches!(
            (self, to),
            (EntryState::Waiting, EntryState::Attending)
                | (EntryState::Waiting, EntryState::Removed)
                | (EntryState::Attending, EntryState::Removed)
        )
    }
}

impl From<EntryState> for StatusId {
    fn from(value: EntryState) -> Self {
        value as StatusId
    }
}

impl TryFrom<StatusId> for EntryState {
    type Error = CoreError;

    fn try_from(value: StatusId) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(EntryState::Waiting),
            2 => Ok(EntryState::Attending),
            3 => Ok(EntryState::Removed),
            other => Err(CoreError::Internal(format!(
                "Unknown waitlist status id {other}"
            ))),
        }
    }
}

impl std::fmt::Display for EntryState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether a submission inserted a fresh row or reused an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmitOutcome {
    Created,
    Reactivated,
}

impl SubmitOutcome {
    pub fn from_created(created: bool) -> Self {
        if created {
            SubmitOutcome::Created
        } else {
            SubmitOutcome::Reactivated
        }
    }
}

/// Trim a requested area, treating blank input as "not given".
///
/// A submission without an area keeps the entry's current area on
/// reactivation and gets [`DEFAULT_AREA`] on creation.
pub fn normalize_area(requested: Option<&str>) -> Option<String> {
    requested
        .map(str::trim)
        .filter(|a| !a.is_empty())
        .map(str::to_string)
}
