//! Role-based access control extractors.
//!
//! Each extractor wraps [`AuthUser`] and rejects callers whose role is not
//! in its allow list.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use unievent_core::error::CoreError;
use unievent_core::roles::Role;

use super::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

async fn require(
    parts: &mut Parts,
    state: &AppState,
    allowed: &[Role],
    message: &str,
) -> Result<AuthUser, AppError> {
    let user = AuthUser::from_request_parts(parts, state).await?;
    if !allowed.contains(&user.role) {
        tracing::debug!(user_id = user.user_id, role = %user.role, "Role check rejected");
        return Err(AppError::Core(CoreError::Forbidden(message.into())));
    }
    Ok(user)
}

/// Requires the `student` role.
pub struct RequireStudent(pub AuthUser);

impl FromRequestParts<AppState> for RequireStudent {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        require(parts, state, &[Role::Student], "Student role required")
            .await
            .map(RequireStudent)
    }
}

/// Requires the `lecturer` role.
pub struct RequireLecturer(pub AuthUser);

impl FromRequestParts<AppState> for RequireLecturer {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        require(parts, state, &[Role::Lecturer], "Lecturer role required")
            .await
            .map(RequireLecturer)
    }
}

/// Requires a role that may organize events: lecturer, university or admin.
pub struct RequireOrganizer(pub AuthUser);

impl FromRequestParts<AppState> for RequireOrganizer {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        require(
            parts,
            state,
            &[Role::Lecturer, Role::University, Role::Admin],
            "Lecturer, University or Admin role required",
        )
        .await
        .map(RequireOrganizer)
    }
}
