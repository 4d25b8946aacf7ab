//! Enroll in and withdraw from events.
//!
//! The rules themselves run inside [`EnrollmentRepo`] under the event row
//! lock; these handlers only map the outcome to HTTP.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use unievent_core::types::DbId;
use unievent_db::models::enrollment::Enrollment;
use unievent_db::repositories::EnrollmentRepo;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// POST /api/v1/events/{id}/enrollment
pub async fn enroll(
    State(state): State<AppState>,
    user: AuthUser,
    Path(event_id): Path<DbId>,
) -> AppResult<(StatusCode, Json<Enrollment>)> {
    let enrollment = EnrollmentRepo::enroll(&state.pool, user.user_id, event_id).await?;
    Ok((StatusCode::CREATED, Json(enrollment)))
}

/// DELETE /api/v1/events/{id}/enrollment
pub async fn unenroll(
    State(state): State<AppState>,
    user: AuthUser,
    Path(event_id): Path<DbId>,
) -> AppResult<StatusCode> {
    EnrollmentRepo::unenroll(&state.pool, user.user_id, event_id, Utc::now()).await?;
    Ok(StatusCode::NO_CONTENT)
}
