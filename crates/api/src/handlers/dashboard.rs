use axum::extract::State;
use axum::Json;
use serde::Serialize;
use unievent_core::profile::{missing_fields, profile_incomplete, required_fields};
use unievent_core::roles::Role;
use unievent_db::repositories::ProfileRepo;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct DashboardStatus {
    pub role: Role,
    pub profile_incomplete: bool,
    pub missing_fields: Vec<&'static str>,
}

/// GET /api/v1/dashboard
///
/// A missing profile row reports every required field as missing.
pub async fn status(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<DashboardStatus>> {
    let profile = ProfileRepo::find(&state.pool, user.user_id, user.role).await?;
    let view = profile.as_ref().map(|p| p.view());

    Ok(Json(DashboardStatus {
        role: user.role,
        profile_incomplete: profile_incomplete(user.role, view.as_ref()),
        missing_fields: match view.as_ref() {
            Some(view) => missing_fields(view),
            None => required_fields(user.role).to_vec(),
        },
    }))
}
