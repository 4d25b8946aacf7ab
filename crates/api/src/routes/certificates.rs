use axum::routing::get;
use axum::Router;

use crate::handlers::certificates;
use crate::state::AppState;

/// Routes mounted at `/certificates`. Issuance lives under `/events/{id}`.
///
/// ```text
/// GET    /mine                      -> mine
/// GET    /{id}/document             -> document
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/mine", get(certificates::mine))
        .route("/{id}/document", get(certificates::document))
}
