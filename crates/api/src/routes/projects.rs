//! Route definitions for the `/projects` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::projects;
use crate::state::AppState;

/// Routes mounted at `/projects`.
///
/// ```text
/// GET    /                          -> list
/// POST   /                          -> create
/// GET    /supervisors               -> supervisors
/// GET    /lecturer-dashboard        -> lecturer_dashboard
/// GET    /{id}                      -> get_by_id
/// PUT    /{id}                      -> update
/// DELETE /{id}                      -> delete
/// POST   /{id}/updates              -> add_update
/// GET    /{id}/analytics            -> analytics
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(projects::list).post(projects::create))
        .route("/supervisors", get(projects::supervisors))
        .route("/lecturer-dashboard", get(projects::lecturer_dashboard))
        .route(
            "/{id}",
            get(projects::get_by_id)
                .put(projects::update)
                .delete(projects::delete),
        )
        .route("/{id}/updates", post(projects::add_update))
        .route("/{id}/analytics", get(projects::analytics))
}
