//! Handlers for `/profile`: the account fields plus the role-specific
//! profile row.

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use unievent_core::error::CoreError;
use unievent_core::profile::StudentLevel;
use unievent_core::roles::Role;
use unievent_core::types::DbId;
use unievent_core::validation::{require_non_blank, validate_input};
use unievent_db::models::profile::{
    RoleProfile, UpdateLecturerProfile, UpdateStudentProfile, UpdateUniversityProfile,
};
use unievent_db::models::user::{UpdateUser, User, UserResponse};
use unievent_db::repositories::{ProfileRepo, UserRepo};
use unievent_db::is_unique_violation;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::handlers::auth::normalize_email;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

const MAX_GPA: f64 = 4.0;

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    /// Role-specific fields. Interpreted against the caller's role, unknown
    /// keys are ignored.
    pub profile: Option<serde_json::Value>,
}

#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub user: UserResponse,
    #[serde(flatten)]
    pub profile: RoleProfile,
}

/// GET /api/v1/profile
///
/// Creates an empty profile row first if the user has none.
pub async fn get(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ProfileResponse>> {
    let account = find_user(&state, user.user_id).await?;
    let profile = ProfileRepo::ensure(&state.pool, user.user_id, user.role).await?;
    Ok(Json(ProfileResponse {
        user: UserResponse::from(&account),
        profile,
    }))
}

/// PATCH /api/v1/profile
pub async fn update(
    State(state): State<AppState>,
    user: AuthUser,
    Json(input): Json<UpdateProfileRequest>,
) -> AppResult<Json<ProfileResponse>> {
    validate_input(&input)?;

    let patch = UpdateUser {
        name: input.name.map(|n| n.trim().to_string()),
        email: input.email.as_deref().map(normalize_email),
    };
    if let Some(name) = &patch.name {
        require_non_blank("name", name)?;
    }
    if let Some(email) = &patch.email {
        if let Some(existing) = UserRepo::find_by_email(&state.pool, email).await? {
            if existing.id != user.user_id {
                return Err(AppError::Core(CoreError::Conflict(
                    "Email is already in use".into(),
                )));
            }
        }
    }

    let account = match UserRepo::update(&state.pool, user.user_id, &patch).await {
        Ok(Some(account)) => account,
        Ok(None) => {
            return Err(AppError::Core(CoreError::NotFound {
                entity: "User",
                id: user.user_id,
            }))
        }
        Err(e) if is_unique_violation(&e, "uq_users_email") => {
            return Err(AppError::Core(CoreError::Conflict(
                "Email is already in use".into(),
            )))
        }
        Err(e) => return Err(e.into()),
    };

    // Make sure there is a row to update.
    let current = ProfileRepo::ensure(&state.pool, user.user_id, user.role).await?;
    let profile = match input.profile {
        Some(fields) => apply_profile_patch(&state, user, fields).await?,
        None => current,
    };

    tracing::info!(user_id = user.user_id, role = %user.role, "Profile updated");
    Ok(Json(ProfileResponse {
        user: UserResponse::from(&account),
        profile,
    }))
}

async fn apply_profile_patch(
    state: &AppState,
    user: AuthUser,
    fields: serde_json::Value,
) -> AppResult<RoleProfile> {
    let missing = || {
        AppError::Core(CoreError::NotFound {
            entity: "Profile",
            id: user.user_id,
        })
    };

    match user.role {
        Role::Student => {
            let patch: UpdateStudentProfile = parse_patch(fields)?;
            check_student_patch(&patch)?;
            ProfileRepo::update_student(&state.pool, user.user_id, &patch)
                .await?
                .map(RoleProfile::Student)
                .ok_or_else(missing)
        }
        Role::Lecturer => {
            let patch: UpdateLecturerProfile = parse_patch(fields)?;
            ProfileRepo::update_lecturer(&state.pool, user.user_id, &patch)
                .await?
                .map(RoleProfile::Lecturer)
                .ok_or_else(missing)
        }
        Role::University => {
            let patch: UpdateUniversityProfile = parse_patch(fields)?;
            ProfileRepo::update_university(&state.pool, user.user_id, &patch)
                .await?
                .map(RoleProfile::University)
                .ok_or_else(missing)
        }
        Role::Admin => Err(AppError::BadRequest(
            "Admin accounts have no profile fields".into(),
        )),
    }
}

fn parse_patch<T: serde::de::DeserializeOwned>(fields: serde_json::Value) -> AppResult<T> {
    serde_json::from_value(fields)
        .map_err(|e| AppError::Core(CoreError::Validation(format!("profile: {e}"))))
}

fn check_student_patch(patch: &UpdateStudentProfile) -> Result<(), CoreError> {
    if let Some(level) = &patch.level {
        StudentLevel::parse(level)?;
    }
    if let Some(gpa) = patch.gpa {
        if !(0.0..=MAX_GPA).contains(&gpa) {
            return Err(CoreError::Validation(format!(
                "gpa must be between 0 and {MAX_GPA}"
            )));
        }
    }
    Ok(())
}

async fn find_user(state: &AppState, id: DbId) -> AppResult<User> {
    UserRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "User", id }))
}
