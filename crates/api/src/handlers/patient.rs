//! Handlers for the `/patients` resource.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use waitroom_core::error::CoreError;
use waitroom_core::identity::{
    duplicate_affiliation_message, normalize_affiliation_id, require_non_blank,
};
use waitroom_core::types::DbId;
use waitroom_db::models::patient::{CreatePatient, Patient, PatientExists, RegisterOutcome};
use waitroom_db::repositories::PatientRepo;

use crate::error::{AppError, AppResult};
use crate::extract::{ApiPath, ValidatedJson};
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /api/v1/patients
///
/// Registers a patient under a unique affiliation number. A number that is
/// already registered (including by a concurrent request) yields 409 naming
/// the existing holder.
pub async fn register(
    State(state): State<AppState>,
    ValidatedJson(mut input): ValidatedJson<CreatePatient>,
) -> AppResult<(StatusCode, Json<DataResponse<Patient>>)> {
    input.affiliation_id = normalize_affiliation_id(&input.affiliation_id)?;
    input.name = require_non_blank("name", &input.name)?;

    match PatientRepo::register(&state.pool, &input).await? {
        RegisterOutcome::Registered(patient) => {
            tracing::info!(
                patient_id = patient.id,
                affiliation_id = %patient.affiliation_id,
                "Patient registered"
            );
            Ok((StatusCode::CREATED, Json(DataResponse { data: patient })))
        }
        RegisterOutcome::Duplicate(existing) => {
            tracing::debug!(
                affiliation_id = %existing.affiliation_id,
                "Registration rejected, affiliation number taken"
            );
            Err(AppError::Core(CoreError::Conflict(
                duplicate_affiliation_message(&existing.affiliation_id, &existing.name),
            )))
        }
    }
}

/// GET /api/v1/patients
pub async fn list(State(state): State<AppState>) -> AppResult<Json<DataResponse<Vec<Patient>>>> {
    let patients = PatientRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: patients }))
}

/// GET /api/v1/patients/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<DbId>,
) -> AppResult<Json<DataResponse<Patient>>> {
    let patient = PatientRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Patient",
            id,
        }))?;
    Ok(Json(DataResponse { data: patient }))
}

/// GET /api/v1/patients/exists/{affiliation_id}
pub async fn exists(
    State(state): State<AppState>,
    ApiPath(affiliation_id): ApiPath<String>,
) -> AppResult<Json<DataResponse<PatientExists>>> {
    let result = PatientRepo::exists(&state.pool, affiliation_id.trim()).await?;
    Ok(Json(DataResponse { data: result }))
}
