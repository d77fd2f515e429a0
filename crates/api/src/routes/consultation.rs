//! Route definitions for the `/consultations` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::consultation;
use crate::state::AppState;

/// Routes mounted at `/consultations`.
///
/// ```text
/// POST   /        -> create
/// GET    /{id}    -> get_by_id
/// PUT    /{id}    -> update
/// DELETE /{id}    -> delete
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/", post(consultation::create)).route(
        "/{id}",
        get(consultation::get_by_id)
            .put(consultation::update)
            .delete(consultation::delete),
    )
}
