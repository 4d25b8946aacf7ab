//! Dashboard reports, rebuilt from live counts on every request.

use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::{Datelike, Utc};
use unievent_core::error::CoreError;
use unievent_core::report::{admin_report, university_report};
use unievent_core::roles::Role;
use unievent_db::repositories::{ProfileRepo, ReportRepo};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// GET /api/v1/reports
///
/// Admins get the system-wide report. Everyone else gets the report for
/// the university named on their profile.
pub async fn report(State(state): State<AppState>, user: AuthUser) -> AppResult<Response> {
    let now = Utc::now();

    if user.is(Role::Admin) {
        let snapshot = ReportRepo::admin_snapshot(&state.pool, now.year()).await?;
        return Ok(Json(admin_report(&snapshot, now)).into_response());
    }

    let profile = ProfileRepo::find(&state.pool, user.user_id, user.role)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Profile",
            id: user.user_id,
        }))?;
    let university = profile
        .university_name()
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .ok_or_else(|| {
            AppError::Core(CoreError::Validation(
                "Set your university on your profile to view its report".into(),
            ))
        })?
        .to_string();

    let snapshot = ReportRepo::university_snapshot(&state.pool, &university, now.year()).await?;
    tracing::debug!(user_id = user.user_id, %university, "University report built");
    Ok(Json(university_report(&university, &snapshot, now)).into_response())
}
