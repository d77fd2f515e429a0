//! Handlers for the `/waitlist` resource.
//!
//! Every state change is a single conditional statement in
//! [`WaitlistRepo`]; handlers only translate the outcome to HTTP.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;
use waitroom_core::error::CoreError;
use waitroom_core::identity::{normalize_affiliation_id, require_non_blank};
use waitroom_core::types::DbId;
use waitroom_core::waitlist::{normalize_area, EntryState, SubmitOutcome};
use waitroom_db::models::waitlist::{
    ActiveWaitlist, HistoryEntry, HistoryQuery, SubmitWaitlistEntry, Transition, WaitlistEntry,
};
use waitroom_db::repositories::WaitlistRepo;

use crate::error::{AppError, AppResult};
use crate::extract::{ApiPath, ApiQuery, ValidatedJson};
use crate::response::DataResponse;
use crate::state::AppState;

/// Response body for a submission.
#[derive(Debug, Serialize)]
pub struct SubmitResponse {
    pub id: DbId,
    pub outcome: SubmitOutcome,
    pub entry: WaitlistEntry,
}

/// Response body for an attend request.
#[derive(Debug, Serialize)]
pub struct AttendResponse {
    /// `false` when the entry was not `Waiting`; nothing changed.
    pub applied: bool,
    pub state: EntryState,
    pub entry: WaitlistEntry,
}

/// Response body for marking by affiliation number.
#[derive(Debug, Serialize)]
pub struct MarkResponse {
    pub applied: bool,
}

fn entry_not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "WaitlistEntry",
        id,
    })
}

/// POST /api/v1/waitlist
///
/// Creates an entry (201) or reactivates the existing one for the same
/// affiliation number (200). Either way the entry ends up `Waiting`.
pub async fn submit(
    State(state): State<AppState>,
    ValidatedJson(mut input): ValidatedJson<SubmitWaitlistEntry>,
) -> AppResult<(StatusCode, Json<DataResponse<SubmitResponse>>)> {
    input.affiliation_id = normalize_affiliation_id(&input.affiliation_id)?;
    input.name = require_non_blank("name", &input.name)?;
    input.area = normalize_area(input.area.as_deref());

    let submitted = WaitlistRepo::submit(&state.pool, &input).await?;
    let outcome = submitted.outcome();
    let entry = submitted.entry;

    tracing::info!(
        entry_id = entry.id,
        affiliation_id = %entry.affiliation_id,
        area = %entry.area,
        ?outcome,
        "Waitlist entry submitted"
    );

    let status = match outcome {
        SubmitOutcome::Created => StatusCode::CREATED,
        SubmitOutcome::Reactivated => StatusCode::OK,
    };
    let data = SubmitResponse {
        id: entry.id,
        outcome,
        entry,
    };
    Ok((status, Json(DataResponse { data })))
}

/// GET /api/v1/waitlist
pub async fn list(
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<WaitlistEntry>>>> {
    let entries = WaitlistRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: entries }))
}

/// GET /api/v1/waitlist/active
pub async fn list_active(
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<ActiveWaitlist>>> {
    let active = WaitlistRepo::list_active(&state.pool).await?;
    Ok(Json(DataResponse { data: active }))
}

/// GET /api/v1/waitlist/history?q=&limit=
pub async fn search_history(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<HistoryQuery>,
) -> AppResult<Json<DataResponse<Vec<HistoryEntry>>>> {
    let results = WaitlistRepo::search_history(&state.pool, &params).await?;
    Ok(Json(DataResponse { data: results }))
}

/// GET /api/v1/waitlist/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<DbId>,
) -> AppResult<Json<DataResponse<WaitlistEntry>>> {
    let entry = WaitlistRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| entry_not_found(id))?;
    Ok(Json(DataResponse { data: entry }))
}

/// PUT /api/v1/waitlist/{id}/attend
///
/// An entry that is not `Waiting` is left alone and reported with
/// `applied: false`, not as an error.
pub async fn attend(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<DbId>,
) -> AppResult<Json<DataResponse<AttendResponse>>> {
    let transition = WaitlistRepo::attend(&state.pool, id)
        .await?
        .ok_or_else(|| entry_not_found(id))?;

    let applied = transition.applied();
    let entry = match transition {
        Transition::Applied(entry) => {
            tracing::info!(entry_id = id, "Waitlist entry attending");
            entry
        }
        Transition::NotApplied(entry) => {
            tracing::debug!(entry_id = id, state = %entry.state, "Attend not applied");
            entry
        }
    };

    let data = AttendResponse {
        applied,
        state: entry.state,
        entry,
    };
    Ok(Json(DataResponse { data }))
}

/// PUT /api/v1/waitlist/{id}/remove
pub async fn remove(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<DbId>,
) -> AppResult<Json<DataResponse<WaitlistEntry>>> {
    let entry = WaitlistRepo::remove(&state.pool, id)
        .await?
        .ok_or_else(|| entry_not_found(id))?;
    tracing::info!(entry_id = id, "Waitlist entry removed");
    Ok(Json(DataResponse { data: entry }))
}

/// PUT /api/v1/waitlist/affiliation/{affiliation_id}/remove
///
/// Only an `Attending` entry can be removed this way; anything else is 404.
pub async fn remove_by_affiliation(
    State(state): State<AppState>,
    ApiPath(affiliation_id): ApiPath<String>,
) -> AppResult<Json<DataResponse<WaitlistEntry>>> {
    let affiliation_id = affiliation_id.trim();
    let entry = WaitlistRepo::remove_attending(&state.pool, affiliation_id)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::NotFoundByKey {
                entity: "Attending waitlist entry",
                key: affiliation_id.to_string(),
            })
        })?;
    tracing::info!(
        entry_id = entry.id,
        affiliation_id = %entry.affiliation_id,
        "Waitlist entry removed by affiliation number"
    );
    Ok(Json(DataResponse { data: entry }))
}

/// PUT /api/v1/waitlist/affiliation/{affiliation_id}/attend
///
/// Never reports a missing or non-waiting entry as an error.
pub async fn mark_attending(
    State(state): State<AppState>,
    ApiPath(affiliation_id): ApiPath<String>,
) -> AppResult<Json<DataResponse<MarkResponse>>> {
    let affiliation_id = affiliation_id.trim();
    let marked = WaitlistRepo::mark_attending(&state.pool, affiliation_id).await?;

    match &marked {
        Some(entry) => tracing::info!(
            entry_id = entry.id,
            %affiliation_id,
            "Waitlist entry marked attending"
        ),
        None => tracing::debug!(%affiliation_id, "Mark attending not applied"),
    }

    let data = MarkResponse {
        applied: marked.is_some(),
    };
    Ok(Json(DataResponse { data }))
}
