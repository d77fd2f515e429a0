//! Waitlist entry model and DTOs.

use serde::{Deserialize, Deserializer, Serialize};
use sqlx::FromRow;
use validator::Validate;
use waitroom_core::types::{DbId, Timestamp};
use waitroom_core::waitlist::{EntryState, SubmitOutcome};

/// A row from the `waitlist_entries` table.
///
/// `created_at` is the first admission time; reactivation leaves it alone.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct WaitlistEntry {
    pub id: DbId,
    pub affiliation_id: String,
    pub name: String,
    pub area: String,
    #[sqlx(rename = "status_id", try_from = "i16")]
    pub state: EntryState,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for submitting a patient to the waitlist.
///
/// Missing text fields deserialize as empty strings so the handler can
/// report them as validation errors rather than body-parse failures.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SubmitWaitlistEntry {
    #[serde(default)]
    pub affiliation_id: String,
    #[serde(default)]
    #[validate(length(max = 60))]
    pub name: String,
    #[validate(length(max = 60))]
    pub area: Option<String>,
}

/// Row returned by the submit upsert: the entry plus whether it was inserted.
#[derive(Debug, Clone, FromRow)]
pub struct SubmittedEntry {
    #[sqlx(flatten)]
    pub entry: WaitlistEntry,
    pub created: bool,
}

impl SubmittedEntry {
    pub fn outcome(&self) -> SubmitOutcome {
        SubmitOutcome::from_created(self.created)
    }
}

/// Result of a conditional state transition on an existing entry.
#[derive(Debug, Clone)]
pub enum Transition {
    /// The precondition held and the entry now has the new state.
    Applied(WaitlistEntry),
    /// The precondition did not hold; the entry is unchanged.
    NotApplied(WaitlistEntry),
}

impl Transition {
    pub fn applied(&self) -> bool {
        matches!(self, Transition::Applied(_))
    }

    pub fn entry(&self) -> &WaitlistEntry {
        match self {
            Transition::Applied(entry) | Transition::NotApplied(entry) => entry,
        }
    }
}

/// The active queue: FIFO entries plus the number still waiting.
#[derive(Debug, Clone, Serialize)]
pub struct ActiveWaitlist {
    pub entries: Vec<WaitlistEntry>,
    pub waiting_count: i64,
}

impl ActiveWaitlist {
    /// Build from entries already ordered by admission time.
    pub fn from_entries(entries: Vec<WaitlistEntry>) -> Self {
        let waiting_count = entries
            .iter()
            .filter(|e| e.state == EntryState::Waiting)
            .count() as i64;
        Self {
            entries,
            waiting_count,
        }
    }
}

/// Query parameters for the history search (`?q=&limit=`).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HistoryQuery {
    pub q: Option<String>,
    /// Unparseable values fall back to the default limit.
    #[serde(default, deserialize_with = "lenient_limit")]
    pub limit: Option<i64>,
}

fn lenient_limit<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.and_then(|value| value.trim().parse().ok()))
}

/// A removed entry joined with its registry record, if any.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct HistoryEntry {
    pub id: DbId,
    pub affiliation_id: String,
    /// Registry name when registered, else the waitlist's copy.
    pub name: String,
    pub area: String,
    pub patient_id: Option<DbId>,
    pub created_at: Timestamp,
    pub removed_at: Timestamp,
}
