pub mod consultation;
pub mod health;
pub mod patient;
pub mod waitlist;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /patients                                        register, list
/// /patients/{id}                                   get
/// /patients/{id}/consultations                     list consultation summaries
/// /patients/exists/{affiliation_id}                existence check
///
/// /waitlist                                        submit, list all
/// /waitlist/active                                 active queue + waiting count
/// /waitlist/history?q=&limit=                      search removed entries
/// /waitlist/{id}                                   get
/// /waitlist/{id}/attend                            attend (PUT)
/// /waitlist/{id}/remove                            remove (PUT)
/// /waitlist/affiliation/{affiliation_id}/attend    mark attending (PUT)
/// /waitlist/affiliation/{affiliation_id}/remove    remove attending (PUT)
///
/// /consultations                                   create
/// /consultations/{id}                              get, update, delete
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/patients", patient::router())
        .nest("/waitlist", waitlist::router())
        .nest("/consultations", consultation::router())
}
