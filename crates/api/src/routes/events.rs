//! Route definitions for the `/events` resource, including enrollment and
//! certificate issuance for a single event.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{certificates, enrollment, events};
use crate::state::AppState;

/// Routes mounted at `/events`.
///
/// ```text
/// GET    /                              -> list
/// POST   /                              -> create
/// GET    /mine                          -> my_events
/// GET    /stats                         -> stats
/// GET    /{id}                          -> get_by_id
/// PUT    /{id}                          -> update
/// GET    /{id}/participants             -> participants
/// POST   /{id}/enrollment               -> enroll
/// DELETE /{id}/enrollment               -> unenroll
/// GET    /{id}/certificate-templates    -> list_templates
/// POST   /{id}/certificate-templates    -> issue
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(events::list).post(events::create))
        .route("/mine", get(events::my_events))
        .route("/stats", get(events::stats))
        .route("/{id}", get(events::get_by_id).put(events::update))
        .route("/{id}/participants", get(events::participants))
        .route(
            "/{id}/enrollment",
            post(enrollment::enroll).delete(enrollment::unenroll),
        )
        .route(
            "/{id}/certificate-templates",
            get(certificates::list_templates).post(certificates::issue),
        )
}
