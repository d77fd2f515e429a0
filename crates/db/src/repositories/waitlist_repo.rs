//! Repository for the `waitlist_entries` table.
//!
//! Uses `EntryState` from `waitroom_core::waitlist` for every status
//! literal. Transitions are conditional updates
//! (`WHERE status_id = <expected>`), never read-modify-write.

use sqlx::PgPool;
use waitroom_core::search::{
    clamp_limit, contains_pattern, normalize_query, DEFAULT_HISTORY_LIMIT, MAX_HISTORY_LIMIT,
};
use waitroom_core::types::DbId;
use waitroom_core::waitlist::{EntryState, DEFAULT_AREA};

use crate::models::waitlist::{
    ActiveWaitlist, HistoryEntry, HistoryQuery, SubmitWaitlistEntry, SubmittedEntry, Transition,
    WaitlistEntry,
};

/// Column list for `waitlist_entries` queries.
const COLUMNS: &str = "id, affiliation_id, name, area, status_id, created_at, updated_at";

/// Provides the waitlist lifecycle operations.
pub struct WaitlistRepo;

impl WaitlistRepo {
    /// Create an entry in `Waiting`, or reactivate the existing one.
    ///
    /// On reactivation the name is overwritten, the area is overwritten
    /// only when one is given, the state is forced to `Waiting` whatever it
    /// was, and `created_at` is kept. A concurrent create for the same
    /// affiliation number resolves inside the statement: the loser becomes
    /// a reactivation instead of a unique-violation error.
    pub async fn submit(
        pool: &PgPool,
        input: &SubmitWaitlistEntry,
    ) -> Result<SubmittedEntry, sqlx::Error> {
        let query = format!(
            "INSERT INTO waitlist_entries (affiliation_id, name, area, status_id) \
             VALUES ($1, $2, COALESCE($3, $4), $5) \
             ON CONFLICT ON CONSTRAINT uq_waitlist_entries_affiliation_id DO UPDATE SET \
                 name = EXCLUDED.name, \
                 area = COALESCE($3, waitlist_entries.area), \
                 status_id = EXCLUDED.status_id \
             RETURNING {COLUMNS}, (xmax = 0) AS created"
        );
        sqlx::query_as::<_, SubmittedEntry>(&query)
            .bind(&input.affiliation_id)
            .bind(&input.name)
            .bind(&input.area)
            .bind(DEFAULT_AREA)
            .bind(EntryState::Waiting.id())
            .fetch_one(pool)
            .await
    }

    /// Find an entry by internal ID.
    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<WaitlistEntry>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM waitlist_entries WHERE id = $1");
        sqlx::query_as::<_, WaitlistEntry>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find an entry by affiliation number.
    pub async fn find_by_affiliation_id(
        pool: &PgPool,
        affiliation_id: &str,
    ) -> Result<Option<WaitlistEntry>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM waitlist_entries WHERE affiliation_id = $1");
        sqlx::query_as::<_, WaitlistEntry>(&query)
            .bind(affiliation_id)
            .fetch_optional(pool)
            .await
    }

    /// List every entry regardless of state, by ID.
    pub async fn list(pool: &PgPool) -> Result<Vec<WaitlistEntry>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM waitlist_entries ORDER BY id ASC");
        sqlx::query_as::<_, WaitlistEntry>(&query)
            .fetch_all(pool)
            .await
    }

    /// The active queue in first-come-first-served order.
    ///
    /// Ordered by original admission time, never by reactivation time.
    /// The waiting count is derived from the same result set so the two
    /// always agree.
    pub async fn list_active(pool: &PgPool) -> Result<ActiveWaitlist, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM waitlist_entries \
             WHERE status_id IN ($1, $2) \
             ORDER BY created_at ASC, id ASC"
        );
        let entries = sqlx::query_as::<_, WaitlistEntry>(&query)
            .bind(EntryState::Waiting.id())
            .bind(EntryState::Attending.id())
            .fetch_all(pool)
            .await?;
        Ok(ActiveWaitlist::from_entries(entries))
    }

    /// Move an entry from `Waiting` to `Attending`.
    ///
    /// Returns `None` if no entry has this ID. If the entry exists but is
    /// not waiting, returns `NotApplied` with the unchanged row. Of two
    /// concurrent calls on a waiting entry exactly one is `Applied`.
    pub async fn attend(pool: &PgPool, id: DbId) -> Result<Option<Transition>, sqlx::Error> {
        let query = format!(
            "UPDATE waitlist_entries SET status_id = $2 \
             WHERE id = $1 AND status_id = $3 \
             RETURNING {COLUMNS}"
        );
        let updated = sqlx::query_as::<_, WaitlistEntry>(&query)
            .bind(id)
            .bind(EntryState::Attending.id())
            .bind(EntryState::Waiting.id())
            .fetch_optional(pool)
            .await?;

        match updated {
            Some(entry) => Ok(Some(Transition::Applied(entry))),
            None => Ok(Self::find_by_id(pool, id).await?.map(Transition::NotApplied)),
        }
    }

    /// Move the entry for an affiliation number from `Waiting` to `Attending`.
    ///
    /// Returns the updated row, or `None` when there is no waiting entry
    /// for that number (including when there is no entry at all).
    pub async fn mark_attending(
        pool: &PgPool,
        affiliation_id: &str,
    ) -> Result<Option<WaitlistEntry>, sqlx::Error> {
        let query = format!(
            "UPDATE waitlist_entries SET status_id = $2 \
             WHERE affiliation_id = $1 AND status_id = $3 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, WaitlistEntry>(&query)
            .bind(affiliation_id)
            .bind(EntryState::Attending.id())
            .bind(EntryState::Waiting.id())
            .fetch_optional(pool)
            .await
    }

    /// Move an entry to `Removed` from any state.
    ///
    /// An entry that is already removed is returned untouched, so its
    /// `updated_at` (the removal time shown in history) is not rewritten.
    /// Returns `None` if no entry has this ID.
    pub async fn remove(pool: &PgPool, id: DbId) -> Result<Option<WaitlistEntry>, sqlx::Error> {
        let query = format!(
            "UPDATE waitlist_entries SET status_id = $2 \
             WHERE id = $1 AND status_id <> $2 \
             RETURNING {COLUMNS}"
        );
        let updated = sqlx::query_as::<_, WaitlistEntry>(&query)
            .bind(id)
            .bind(EntryState::Removed.id())
            .fetch_optional(pool)
            .await?;

        match updated {
            Some(entry) => Ok(Some(entry)),
            None => Self::find_by_id(pool, id).await,
        }
    }

    /// Move the entry for an affiliation number to `Removed`, only if it is
    /// currently `Attending`.
    ///
    /// Returns `None` when there is no attending entry for that number.
    pub async fn remove_attending(
        pool: &PgPool,
        affiliation_id: &str,
    ) -> Result<Option<WaitlistEntry>, sqlx::Error> {
        let query = format!(
            "UPDATE waitlist_entries SET status_id = $2 \
             WHERE affiliation_id = $1 AND status_id = $3 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, WaitlistEntry>(&query)
            .bind(affiliation_id)
            .bind(EntryState::Removed.id())
            .bind(EntryState::Attending.id())
            .fetch_optional(pool)
            .await
    }

    /// Search removed entries by affiliation number or name.
    ///
    /// Case-insensitive substring match against the affiliation number,
    /// the registry name and the waitlist's own name copy. Queries shorter
    /// than two characters return nothing. Most recently removed first.
    pub async fn search_history(
        pool: &PgPool,
        params: &HistoryQuery,
    ) -> Result<Vec<HistoryEntry>, sqlx::Error> {
        let Some(query_text) = normalize_query(params.q.as_deref()) else {
            return Ok(Vec::new());
        };
        let pattern = contains_pattern(query_text);
        let limit = clamp_limit(params.limit, DEFAULT_HISTORY_LIMIT, MAX_HISTORY_LIMIT);

        let sql = "\
            SELECT w.id, w.affiliation_id, COALESCE(p.name, w.name) AS name, w.area, \
                   p.id AS patient_id, w.created_at, w.updated_at AS removed_at \
            FROM waitlist_entries w \
            LEFT JOIN patients p ON p.affiliation_id = w.affiliation_id \
            WHERE w.status_id = $1 \
              AND (w.affiliation_id ILIKE $2 OR p.name ILIKE $2 OR w.name ILIKE $2) \
            ORDER BY w.updated_at DESC, w.id DESC \
            LIMIT $3";

        sqlx::query_as::<_, HistoryEntry>(sql)
            .bind(EntryState::Removed.id())
            .bind(&pattern)
            .bind(limit)
            .fetch_all(pool)
            .await
    }
}
