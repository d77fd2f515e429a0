//! Handlers for consultation records.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use waitroom_core::error::CoreError;
use waitroom_core::identity::require_non_blank;
use waitroom_core::types::DbId;
use waitroom_db::models::consultation::{
    Consultation, ConsultationSummary, CreateConsultation, UpdateConsultation,
};
use waitroom_db::repositories::{ConsultationRepo, PatientRepo};

use crate::error::{AppError, AppResult};
use crate::extract::{ApiPath, ValidatedJson};
use crate::response::DataResponse;
use crate::state::AppState;

async fn ensure_patient_exists(state: &AppState, patient_id: DbId) -> AppResult<()> {
    PatientRepo::find_by_id(&state.pool, patient_id)
        .await?
        .map(|_| ())
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Patient",
            id: patient_id,
        }))
}

fn consultation_not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "Consultation",
        id,
    })
}

/// POST /api/v1/consultations
pub async fn create(
    State(state): State<AppState>,
    ValidatedJson(mut input): ValidatedJson<CreateConsultation>,
) -> AppResult<(StatusCode, Json<DataResponse<Consultation>>)> {
    input.reason = require_non_blank("reason", &input.reason)?;
    ensure_patient_exists(&state, input.patient_id).await?;

    let consultation = ConsultationRepo::create(&state.pool, &input).await?;
    tracing::info!(
        consultation_id = consultation.id,
        patient_id = consultation.patient_id,
        "Consultation recorded"
    );
    Ok((
        StatusCode::CREATED,
        Json(DataResponse { data: consultation }),
    ))
}

/// GET /api/v1/patients/{id}/consultations
pub async fn list_by_patient(
    State(state): State<AppState>,
    ApiPath(patient_id): ApiPath<DbId>,
) -> AppResult<Json<DataResponse<Vec<ConsultationSummary>>>> {
    ensure_patient_exists(&state, patient_id).await?;
    let summaries = ConsultationRepo::list_by_patient(&state.pool, patient_id).await?;
    Ok(Json(DataResponse { data: summaries }))
}

/// GET /api/v1/consultations/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<DbId>,
) -> AppResult<Json<DataResponse<Consultation>>> {
    let consultation = ConsultationRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| consultation_not_found(id))?;
    Ok(Json(DataResponse { data: consultation }))
}

/// PUT /api/v1/consultations/{id}
pub async fn update(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<DbId>,
    ValidatedJson(mut input): ValidatedJson<UpdateConsultation>,
) -> AppResult<Json<DataResponse<Consultation>>> {
    if let Some(reason) = input.reason.as_deref() {
        input.reason = Some(require_non_blank("reason", reason)?);
    }
    let consultation = ConsultationRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| consultation_not_found(id))?;
    Ok(Json(DataResponse { data: consultation }))
}

/// DELETE /api/v1/consultations/{id}
pub async fn delete(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<DbId>,
) -> AppResult<StatusCode> {
    if ConsultationRepo::delete(&state.pool, id).await? {
        tracing::info!(consultation_id = id, "Consultation deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(consultation_not_found(id))
    }
}
