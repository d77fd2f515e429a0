//! Route definitions for the `/waitlist` resource.

use axum::routing::{get, put};
use axum::Router;

use crate::handlers::waitlist;
use crate::state::AppState;

/// Routes mounted at `/waitlist`.
///
/// ```text
/// GET    /                                     -> list
/// POST   /                                     -> submit
/// GET    /active                               -> list_active
/// GET    /history                              -> search_history
/// GET    /{id}                                 -> get_by_id
/// PUT    /{id}/attend                          -> attend
/// PUT    /{id}/remove                          -> remove
/// PUT    /affiliation/{affiliation_id}/attend  -> mark_attending
/// PUT    /affiliation/{affiliation_id}/remove  -> remove_by_affiliation
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(waitlist::list).post(waitlist::submit))
        .route("/active", get(waitlist::list_active))
        .route("/history", get(waitlist::search_history))
        .route("/{id}", get(waitlist::get_by_id))
        .route("/{id}/attend", put(waitlist::attend))
        .route("/{id}/remove", put(waitlist::remove))
        .route(
            "/affiliation/{affiliation_id}/attend",
            put(waitlist::mark_attending),
        )
        .route(
            "/affiliation/{affiliation_id}/remove",
            put(waitlist::remove_by_affiliation),
        )
}
