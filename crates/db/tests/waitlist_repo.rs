//! Integration tests for the waitlist lifecycle.
//!
//! Exercises the state machine, the create-or-reactivate upsert, FIFO
//! ordering of the active queue, history search and the concurrent paths.

use assert_matches::assert_matches;
use chrono::NaiveDate;
use sqlx::PgPool;
use waitroom_core::waitlist::{EntryState, SubmitOutcome, DEFAULT_AREA};
use waitroom_db::models::patient::CreatePatient;
use waitroom_db::models::waitlist::{HistoryQuery, SubmitWaitlistEntry, Transition};
use waitroom_db::repositories::{PatientRepo, WaitlistRepo};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn submission(affiliation_id: &str, name: &str, area: Option<&str>) -> SubmitWaitlistEntry {
    SubmitWaitlistEntry {
        affiliation_id: affiliation_id.to_string(),
        name: name.to_string(),
        area: area.map(str::to_string),
    }
}

fn history(q: &str) -> HistoryQuery {
    HistoryQuery {
        q: Some(q.to_string()),
        limit: None,
    }
}

// ---------------------------------------------------------------------------
// Submit
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_submit_creates_waiting_entry(pool: PgPool) {
    let submitted = WaitlistRepo::submit(&pool, &submission("aff-001", "X", Some("triage")))
        .await
        .unwrap();

    assert_eq!(submitted.outcome(), SubmitOutcome::Created);
    assert_eq!(submitted.entry.state, EntryState::Waiting);
    assert_eq!(submitted.entry.area, "triage");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_second_submit_reactivates_same_row(pool: PgPool) {
    let first = WaitlistRepo::submit(&pool, &submission("aff-001", "X", Some("triage")))
        .await
        .unwrap();
    let second = WaitlistRepo::submit(&pool, &submission("aff-001", "Y", Some("lab")))
        .await
        .unwrap();

    assert_eq!(second.outcome(), SubmitOutcome::Reactivated);
    assert_eq!(second.entry.id, first.entry.id);
    assert_eq!(second.entry.name, "Y");
    assert_eq!(second.entry.area, "lab");
    assert_eq!(second.entry.state, EntryState::Waiting);
    assert_eq!(second.entry.created_at, first.entry.created_at);

    assert_eq!(WaitlistRepo::list(&pool).await.unwrap().len(), 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_submit_reactivates_removed_and_attending(pool: PgPool) {
    let id = WaitlistRepo::submit(&pool, &submission("aff-001", "X", None))
        .await
        .unwrap()
        .entry
        .id;

    WaitlistRepo::attend(&pool, id).await.unwrap();
    let again = WaitlistRepo::submit(&pool, &submission("aff-001", "X", None))
        .await
        .unwrap();
    assert_eq!(again.entry.state, EntryState::Waiting);

    WaitlistRepo::remove(&pool, id).await.unwrap();
    let again = WaitlistRepo::submit(&pool, &submission("aff-001", "X", None))
        .await
        .unwrap();
    assert_eq!(again.outcome(), SubmitOutcome::Reactivated);
    assert_eq!(again.entry.state, EntryState::Waiting);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_submit_without_area_defaults_then_keeps(pool: PgPool) {
    let created = WaitlistRepo::submit(&pool, &submission("aff-001", "X", None))
        .await
        .unwrap();
    assert_eq!(created.entry.area, DEFAULT_AREA);

    WaitlistRepo::submit(&pool, &submission("aff-001", "X", Some("lab")))
        .await
        .unwrap();
    let kept = WaitlistRepo::submit(&pool, &submission("aff-001", "X", None))
        .await
        .unwrap();
    assert_eq!(kept.entry.area, "lab");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_concurrent_submits_never_duplicate(pool: PgPool) {
    let a = submission("aff-777", "A", Some("triage"));
    let b = submission("aff-777", "B", Some("lab"));

    let (ra, rb) = tokio::join!(WaitlistRepo::submit(&pool, &a), WaitlistRepo::submit(&pool, &b));
    let (ra, rb) = (ra.unwrap(), rb.unwrap());

    assert_eq!(ra.entry.id, rb.entry.id);
    let mut outcomes = [ra.outcome(), rb.outcome()];
    outcomes.sort_by_key(|o| *o == SubmitOutcome::Reactivated);
    assert_eq!(outcomes, [SubmitOutcome::Created, SubmitOutcome::Reactivated]);

    assert_eq!(WaitlistRepo::list(&pool).await.unwrap().len(), 1);
}

// ---------------------------------------------------------------------------
// Attend
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_attend_twice_applies_once(pool: PgPool) {
    let id = WaitlistRepo::submit(&pool, &submission("aff-001", "X", None))
        .await
        .unwrap()
        .entry
        .id;

    let first = WaitlistRepo::attend(&pool, id).await.unwrap().unwrap();
    let entry = assert_matches!(first, Transition::Applied(e) => e);
    assert_eq!(entry.state, EntryState::Attending);

    let second = WaitlistRepo::attend(&pool, id).await.unwrap().unwrap();
    let entry = assert_matches!(second, Transition::NotApplied(e) => e);
    assert_eq!(entry.state, EntryState::Attending);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_attend_removed_entry_not_applied(pool: PgPool) {
    let id = WaitlistRepo::submit(&pool, &submission("aff-001", "X", None))
        .await
        .unwrap()
        .entry
        .id;
    WaitlistRepo::remove(&pool, id).await.unwrap();

    let result = WaitlistRepo::attend(&pool, id).await.unwrap().unwrap();
    assert!(!result.applied());
    assert_eq!(result.entry().state, EntryState::Removed);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_attend_nonexistent_returns_none(pool: PgPool) {
    assert!(WaitlistRepo::attend(&pool, 999_999).await.unwrap().is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_concurrent_attend_applies_exactly_once(pool: PgPool) {
    let id = WaitlistRepo::submit(&pool, &submission("aff-001", "X", None))
        .await
        .unwrap()
        .entry
        .id;

    let (ra, rb) = tokio::join!(WaitlistRepo::attend(&pool, id), WaitlistRepo::attend(&pool, id));
    let applied = [ra.unwrap().unwrap(), rb.unwrap().unwrap()]
        .iter()
        .filter(|t| t.applied())
        .count();
    assert_eq!(applied, 1);
}

// ---------------------------------------------------------------------------
// Mark / remove
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_mark_attending_by_affiliation(pool: PgPool) {
    WaitlistRepo::submit(&pool, &submission("aff-001", "X", None))
        .await
        .unwrap();

    let marked = WaitlistRepo::mark_attending(&pool, "aff-001").await.unwrap();
    assert_eq!(marked.unwrap().state, EntryState::Attending);

    // Already attending, and unknown numbers, are non-fatal misses.
    assert!(WaitlistRepo::mark_attending(&pool, "aff-001").await.unwrap().is_none());
    assert!(WaitlistRepo::mark_attending(&pool, "ghost").await.unwrap().is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_remove_by_id_from_any_state(pool: PgPool) {
    let id = WaitlistRepo::submit(&pool, &submission("aff-001", "X", None))
        .await
        .unwrap()
        .entry
        .id;

    let removed = WaitlistRepo::remove(&pool, id).await.unwrap().unwrap();
    assert_eq!(removed.state, EntryState::Removed);

    // Removing again still succeeds.
    let removed = WaitlistRepo::remove(&pool, id).await.unwrap().unwrap();
    assert_eq!(removed.state, EntryState::Removed);

    assert!(WaitlistRepo::remove(&pool, 999_999).await.unwrap().is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_re_remove_keeps_removal_time_and_history_order(pool: PgPool) {
    let a = WaitlistRepo::submit(&pool, &submission("hist-a", "Hist A", None))
        .await
        .unwrap()
        .entry;
    let b = WaitlistRepo::submit(&pool, &submission("hist-b", "Hist B", None))
        .await
        .unwrap()
        .entry;

    let first_removal = WaitlistRepo::remove(&pool, a.id).await.unwrap().unwrap();
    tokio::time::sleep(std::time::Duration::from_millis(20)).await;
    WaitlistRepo::remove(&pool, b.id).await.unwrap();
    tokio::time::sleep(std::time::Duration::from_millis(20)).await;

    // Removing an already-removed entry succeeds without touching the row.
    let again = WaitlistRepo::remove(&pool, a.id).await.unwrap().unwrap();
    assert_eq!(again.state, EntryState::Removed);
    assert_eq!(again.updated_at, first_removal.updated_at);

    let hits = WaitlistRepo::search_history(&pool, &history("hist"))
        .await
        .unwrap();
    let order: Vec<_> = hits.iter().map(|h| h.id).collect();
    assert_eq!(order, [b.id, a.id]);
    assert_eq!(hits[1].removed_at, first_removal.updated_at);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_remove_by_affiliation_requires_attending(pool: PgPool) {
    let id = WaitlistRepo::submit(&pool, &submission("aff-001", "X", None))
        .await
        .unwrap()
        .entry
        .id;

    assert!(WaitlistRepo::remove_attending(&pool, "aff-001")
        .await
        .unwrap()
        .is_none());
    let still = WaitlistRepo::find_by_id(&pool, id).await.unwrap().unwrap();
    assert_eq!(still.state, EntryState::Waiting);

    WaitlistRepo::attend(&pool, id).await.unwrap();
    let removed = WaitlistRepo::remove_attending(&pool, "aff-001")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(removed.state, EntryState::Removed);
}

// ---------------------------------------------------------------------------
// Active queue
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_list_active_is_fifo_and_excludes_removed(pool: PgPool) {
    let a = WaitlistRepo::submit(&pool, &submission("aff-a", "A", None))
        .await
        .unwrap()
        .entry;
    let b = WaitlistRepo::submit(&pool, &submission("aff-b", "B", None))
        .await
        .unwrap()
        .entry;
    let c = WaitlistRepo::submit(&pool, &submission("aff-c", "C", None))
        .await
        .unwrap()
        .entry;

    WaitlistRepo::attend(&pool, b.id).await.unwrap();
    WaitlistRepo::remove(&pool, c.id).await.unwrap();

    let active = WaitlistRepo::list_active(&pool).await.unwrap();
    let ids: Vec<i64> = active.entries.iter().map(|e| e.id).collect();
    assert_eq!(ids, [a.id, b.id]);
    assert_eq!(active.waiting_count, 1);
    assert!(active.entries.iter().all(|e| e.state.is_active()));
    assert!(active
        .entries
        .windows(2)
        .all(|w| w[0].created_at <= w[1].created_at));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_reactivation_keeps_original_queue_position(pool: PgPool) {
    let a = WaitlistRepo::submit(&pool, &submission("aff-a", "A", None))
        .await
        .unwrap()
        .entry;
    let b = WaitlistRepo::submit(&pool, &submission("aff-b", "B", None))
        .await
        .unwrap()
        .entry;

    WaitlistRepo::remove(&pool, a.id).await.unwrap();
    WaitlistRepo::submit(&pool, &submission("aff-a", "A", None))
        .await
        .unwrap();

    let active = WaitlistRepo::list_active(&pool).await.unwrap();
    let ids: Vec<i64> = active.entries.iter().map(|e| e.id).collect();
    assert_eq!(ids, [a.id, b.id]);
    assert_eq!(active.waiting_count, 2);
}

// ---------------------------------------------------------------------------
// History search
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_history_only_contains_removed(pool: PgPool) {
    let id = WaitlistRepo::submit(&pool, &submission("aff-001", "X", None))
        .await
        .unwrap()
        .entry
        .id;

    assert!(WaitlistRepo::search_history(&pool, &history("aff-001"))
        .await
        .unwrap()
        .is_empty());

    WaitlistRepo::attend(&pool, id).await.unwrap();
    WaitlistRepo::remove_attending(&pool, "aff-001").await.unwrap();

    let hits = WaitlistRepo::search_history(&pool, &history("aff-001"))
        .await
        .unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].id, id);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_history_matches_registry_name_case_insensitively(pool: PgPool) {
    PatientRepo::register(
        &pool,
        &CreatePatient {
            name: "María López".to_string(),
            affiliation_id: "aff-010".to_string(),
            birth_date: NaiveDate::from_ymd_opt(1985, 1, 2).unwrap(),
            sex: "F".to_string(),
            blood_type: "A+".to_string(),
            accepts_donations: false,
            address: "Calle 5".to_string(),
            phone: "5550002".to_string(),
            emergency_contact: None,
            conditions: None,
            allergies: None,
            prior_surgeries: None,
            current_medications: None,
        },
    )
    .await
    .unwrap();

    // Waitlist copy of the name differs from the registry record.
    let id = WaitlistRepo::submit(&pool, &submission("aff-010", "M. Lopez", None))
        .await
        .unwrap()
        .entry
        .id;
    WaitlistRepo::remove(&pool, id).await.unwrap();

    let hits = WaitlistRepo::search_history(&pool, &history("MAR"))
        .await
        .unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].name, "María López");
    assert!(hits[0].patient_id.is_some());

    // The waitlist's own copy is searchable too.
    let hits = WaitlistRepo::search_history(&pool, &history("m. lo"))
        .await
        .unwrap();
    assert_eq!(hits.len(), 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_history_unregistered_falls_back_to_waitlist_name(pool: PgPool) {
    let id = WaitlistRepo::submit(&pool, &submission("walk-1", "Walk In", None))
        .await
        .unwrap()
        .entry
        .id;
    WaitlistRepo::remove(&pool, id).await.unwrap();

    let hits = WaitlistRepo::search_history(&pool, &history("walk"))
        .await
        .unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].name, "Walk In");
    assert!(hits[0].patient_id.is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_history_short_query_and_limit(pool: PgPool) {
    for i in 0..5 {
        let id = WaitlistRepo::submit(&pool, &submission(&format!("h-{i}"), "Hist", None))
            .await
            .unwrap()
            .entry
            .id;
        WaitlistRepo::remove(&pool, id).await.unwrap();
    }

    assert!(WaitlistRepo::search_history(&pool, &history("h"))
        .await
        .unwrap()
        .is_empty());

    let limited = WaitlistRepo::search_history(
        &pool,
        &HistoryQuery {
            q: Some("hist".to_string()),
            limit: Some(3),
        },
    )
    .await
    .unwrap();
    assert_eq!(limited.len(), 3);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_history_wildcards_match_literally(pool: PgPool) {
    let id = WaitlistRepo::submit(&pool, &submission("aff-001", "Plain", None))
        .await
        .unwrap()
        .entry
        .id;
    WaitlistRepo::remove(&pool, id).await.unwrap();

    assert!(WaitlistRepo::search_history(&pool, &history("%%"))
        .await
        .unwrap()
        .is_empty());
    assert!(WaitlistRepo::search_history(&pool, &history("__"))
        .await
        .unwrap()
        .is_empty());
}
