use axum::routing::post;
use axum::Router;

use crate::handlers::prediction;
use crate::state::AppState;

/// Routes mounted at `/prediction`.
///
/// ```text
/// POST   /predict                   -> predict
/// POST   /recommend                 -> recommend
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/predict", post(prediction::predict))
        .route("/recommend", post(prediction::recommend))
}
