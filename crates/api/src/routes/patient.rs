//! Route definitions for the `/patients` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::{consultation, patient};
use crate::state::AppState;

/// Routes mounted at `/patients`.
///
/// ```text
/// GET    /                             -> list
/// POST   /                             -> register
/// GET    /{id}                         -> get_by_id
/// GET    /{id}/consultations           -> consultation::list_by_patient
/// GET    /exists/{affiliation_id}      -> exists
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(patient::list).post(patient::register))
        .route("/{id}", get(patient::get_by_id))
        .route("/{id}/consultations", get(consultation::list_by_patient))
        .route("/exists/{affiliation_id}", get(patient::exists))
}
