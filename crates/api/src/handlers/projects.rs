//! Handlers for the `/projects` resource and its progress log.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use unievent_core::error::CoreError;
use unievent_core::project::{
    check_manual_status, common_challenges, days_remaining, is_overdue, normalize_completed, progress_timeline,
    resource_requests, unresolved_resources, update_frequency, validate_schedule, LabelCount,
    ProjectPriority, ProjectStats, ProjectStatus, ProjectType, TimelinePoint, UpdateFrequency,
    UpdateRecord, MAX_PROGRESS, MIN_PROGRESS,
};
use unievent_core::roles::Role;
use unievent_core::types::{Date, DbId, Timestamp};
use unievent_core::validation::validate_input;
use unievent_db::models::project::{
    CreateProject, CreateProjectUpdate, Project, ProjectUpdate, UpdateProject,
};
use unievent_db::models::user::UserSummary;
use unievent_db::repositories::{ProjectRepo, UserRepo};
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::{RequireLecturer, RequireStudent};
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Validate)]
pub struct CreateProjectRequest {
    #[validate(length(min = 1, max = 255))]
    pub title: String,
    #[validate(length(min = 1))]
    pub description: String,
    #[serde(default)]
    pub project_type: ProjectType,
    pub priority: ProjectPriority,
    pub start_date: Date,
    pub expected_end_date: Date,
    pub supervisor_id: DbId,
}

#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateProjectRequest {
    #[validate(length(min = 1, max = 255))]
    pub title: Option<String>,
    #[validate(length(min = 1))]
    pub description: Option<String>,
    pub status: Option<ProjectStatus>,
    pub priority: Option<ProjectPriority>,
    pub expected_end_date: Option<Date>,
    pub actual_end_date: Option<Date>,
    #[validate(range(min = 0, max = 100))]
    pub score: Option<i32>,
    #[validate(range(min = 0, max = 5))]
    pub rating: Option<i32>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct ProgressUpdateRequest {
    #[validate(length(min = 1))]
    pub progress_description: String,
    #[validate(range(min = MIN_PROGRESS, max = MAX_PROGRESS))]
    pub progress_percentage: i32,
    pub milestones_completed: Option<String>,
    pub challenges_faced: Option<String>,
    pub resources_needed: Option<String>,
    pub accepted_resources: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ProjectDetail {
    pub project: Project,
    pub updates: Vec<ProjectUpdate>,
    pub unresolved_resources: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct ProgressRecorded {
    pub project: Project,
    pub update: ProjectUpdate,
}

#[derive(Debug, Serialize)]
pub struct SupervisedProject {
    #[serde(flatten)]
    pub project: Project,
    pub days_remaining: i64,
    pub is_overdue: bool,
}

#[derive(Debug, Serialize)]
pub struct LecturerDashboard {
    pub projects: Vec<SupervisedProject>,
    pub stats: ProjectStats,
}

#[derive(Debug, Serialize)]
pub struct ProjectAnalytics {
    pub project: Project,
    pub update_frequency: UpdateFrequency,
    pub progress_timeline: Vec<TimelinePoint>,
    pub common_challenges: Vec<LabelCount>,
    pub resource_requests: Vec<LabelCount>,
    pub unresolved_resources: Vec<String>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/projects
///
/// Students see their own projects, lecturers the ones they supervise,
/// university and admin accounts see all.
pub async fn list(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<DataResponse<Vec<Project>>>> {
    let projects = match user.role {
        Role::Student => ProjectRepo::list_for_student(&state.pool, user.user_id).await?,
        Role::Lecturer => ProjectRepo::list_for_supervisor(&state.pool, user.user_id).await?,
        Role::University | Role::Admin => ProjectRepo::list_all(&state.pool).await?,
    };
    let now = Utc::now();
    let data = projects
        .into_iter()
        .map(|p| normalize(p, now))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Json(DataResponse { data }))
}

/// POST /api/v1/projects
///
/// Students create their own projects; the supervisor must be a lecturer.
pub async fn create(
    State(state): State<AppState>,
    RequireStudent(user): RequireStudent,
    Json(input): Json<CreateProjectRequest>,
) -> AppResult<(StatusCode, Json<Project>)> {
    validate_input(&input)?;
    validate_schedule(input.start_date, input.expected_end_date)?;

    if !UserRepo::has_role(&state.pool, input.supervisor_id, Role::Lecturer).await? {
        return Err(AppError::Core(CoreError::Validation(
            "supervisor_id must refer to a lecturer".into(),
        )));
    }

    let project = ProjectRepo::create(
        &state.pool,
        &CreateProject {
            title: input.title.trim().to_string(),
            description: input.description,
            project_type: input.project_type.as_str().to_string(),
            priority: input.priority.as_str().to_string(),
            start_date: input.start_date,
            expected_end_date: input.expected_end_date,
            student_id: user.user_id,
            supervisor_id: input.supervisor_id,
        },
    )
    .await?;

    tracing::info!(
        project_id = project.id,
        student_id = user.user_id,
        supervisor_id = input.supervisor_id,
        "Project created"
    );
    Ok((StatusCode::CREATED, Json(project)))
}

/// GET /api/v1/projects/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<ProjectDetail>> {
    let project = find_visible_project(&state, &user, id).await?;
    let updates = ProjectRepo::list_updates(&state.pool, id).await?;
    let records: Vec<UpdateRecord<'_>> = updates.iter().map(ProjectUpdate::as_record).collect();
    let unresolved = unresolved_resources(&records);

    Ok(Json(ProjectDetail {
        project: normalize(project, Utc::now())?,
        unresolved_resources: unresolved,
        updates,
    }))
}

/// PUT /api/v1/projects/{id}
///
/// Participants may edit. Score and rating are reserved for the
/// supervisor. A completed project keeps its status, and `planning` or
/// `in_progress` are only accepted when they match the recorded progress.
/// Marking a project completed stamps today as its end date unless one is
/// already set.
pub async fn update(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateProjectRequest>,
) -> AppResult<Json<Project>> {
    validate_input(&input)?;
    let existing = find_project(&state, id).await?;
    if !existing.involves(user.user_id) && !user.is(Role::Admin) {
        return Err(forbidden());
    }
    if (input.score.is_some() || input.rating.is_some())
        && existing.supervisor_id != Some(user.user_id)
        && !user.is(Role::Admin)
    {
        return Err(AppError::Core(CoreError::Forbidden(
            "Only the supervisor can score or rate a project".into(),
        )));
    }
    if let Some(expected) = input.expected_end_date {
        validate_schedule(existing.start_date, expected)?;
    }
    if let Some(actual) = input.actual_end_date {
        if actual <= existing.start_date {
            return Err(AppError::Core(CoreError::Validation(
                "actual_end_date must be after start_date".into(),
            )));
        }
    }

    let status = input
        .status
        .map(|requested| {
            check_manual_status(existing.status()?, requested, existing.progress_percentage)
        })
        .transpose()?;

    let actual_end_date = match (status, input.actual_end_date, existing.actual_end_date) {
        (Some(ProjectStatus::Completed), None, None) => Some(Utc::now().date_naive()),
        (_, given, _) => given,
    };

    let patch = UpdateProject {
        title: input.title.map(|t| t.trim().to_string()),
        description: input.description,
        status: status.map(|s| s.as_str().to_string()),
        priority: input.priority.map(|p| p.as_str().to_string()),
        expected_end_date: input.expected_end_date,
        actual_end_date,
        score: input.score,
        rating: input.rating,
    };
    let project = ProjectRepo::update(&state.pool, id, &patch)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Project",
            id,
        }))?;

    tracing::info!(project_id = id, user_id = user.user_id, "Project updated");
    Ok(Json(normalize(project, Utc::now())?))
}

/// DELETE /api/v1/projects/{id}
///
/// Soft delete by the owning student or an admin.
pub async fn delete(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let existing = find_project(&state, id).await?;
    if existing.student_id != Some(user.user_id) && !user.is(Role::Admin) {
        return Err(forbidden());
    }
    ProjectRepo::soft_delete(&state.pool, id).await?;
    tracing::info!(project_id = id, user_id = user.user_id, "Project deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/projects/{id}/updates
///
/// Appends to the progress log and moves the project to the derived status.
pub async fn add_update(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<ProgressUpdateRequest>,
) -> AppResult<(StatusCode, Json<ProgressRecorded>)> {
    validate_input(&input)?;
    let existing = find_project(&state, id).await?;
    if !existing.involves(user.user_id) && !user.is(Role::Admin) {
        return Err(forbidden());
    }

    let (project, update) = ProjectRepo::record_progress(
        &state.pool,
        id,
        user.user_id,
        &CreateProjectUpdate {
            progress_description: input.progress_description,
            progress_percentage: input.progress_percentage,
            milestones_completed: input.milestones_completed,
            challenges_faced: input.challenges_faced,
            resources_needed: input.resources_needed,
            accepted_resources: input.accepted_resources,
        },
        Utc::now(),
    )
    .await?;

    Ok((StatusCode::CREATED, Json(ProgressRecorded { project, update })))
}

/// GET /api/v1/projects/supervisors
pub async fn supervisors(
    State(state): State<AppState>,
    _user: AuthUser,
) -> AppResult<Json<DataResponse<Vec<UserSummary>>>> {
    let data = UserRepo::list_by_role(&state.pool, Role::Lecturer).await?;
    Ok(Json(DataResponse { data }))
}

/// GET /api/v1/projects/lecturer-dashboard
pub async fn lecturer_dashboard(
    State(state): State<AppState>,
    RequireLecturer(user): RequireLecturer,
) -> AppResult<Json<LecturerDashboard>> {
    let now = Utc::now();
    let mut stats = ProjectStats::default();
    let mut projects = Vec::new();

    for project in ProjectRepo::list_for_supervisor(&state.pool, user.user_id).await? {
        let project = normalize(project, now)?;
        let status = project.status()?;
        let overdue = is_overdue(status, project.expected_end_date, now);
        stats.record(status, overdue);
        projects.push(SupervisedProject {
            days_remaining: days_remaining(project.expected_end_date, now),
            is_overdue: overdue,
            project,
        });
    }

    Ok(Json(LecturerDashboard { projects, stats }))
}

/// GET /api/v1/projects/{id}/analytics
pub async fn analytics(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<ProjectAnalytics>> {
    let project = find_visible_project(&state, &user, id).await?;
    let updates = ProjectRepo::list_updates(&state.pool, id).await?;
    let records: Vec<UpdateRecord<'_>> = updates.iter().map(ProjectUpdate::as_record).collect();

    Ok(Json(ProjectAnalytics {
        project: normalize(project, Utc::now())?,
        update_frequency: update_frequency(&records),
        progress_timeline: progress_timeline(&records),
        common_challenges: common_challenges(&records),
        resource_requests: resource_requests(&records),
        unresolved_resources: unresolved_resources(&records),
    }))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn forbidden() -> AppError {
    AppError::Core(CoreError::Forbidden(
        "You are not a participant of this project".into(),
    ))
}

/// Completed projects always read as 100% with an end date.
fn normalize(mut project: Project, now: Timestamp) -> Result<Project, CoreError> {
    let (progress, end) = normalize_completed(
        project.status()?,
        project.progress_percentage,
        project.actual_end_date,
        now,
    );
    project.progress_percentage = progress;
    project.actual_end_date = end;
    Ok(project)
}

async fn find_project(state: &AppState, id: DbId) -> AppResult<Project> {
    ProjectRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Project",
            id,
        }))
}

/// Participants, university accounts and admins may read any project.
async fn find_visible_project(state: &AppState, user: &AuthUser, id: DbId) -> AppResult<Project> {
    let project = find_project(state, id).await?;
    match user.role {
        Role::University | Role::Admin => Ok(project),
        Role::Student | Role::Lecturer if project.involves(user.user_id) => Ok(project),
        Role::Student | Role::Lecturer => Err(forbidden()),
    }
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, TimeZone};

    use super::*;

    fn project(status: &str, progress: i32, end: Option<Date>) -> Project {
        let created = Utc.with_ymd_and_hms(2025, 3, 1, 9, 0, 0).unwrap();
        Project {
            id: 1,
            title: "Smart Campus".into(),
            description: "IoT".into(),
            project_type: "individual".into(),
            status: status.into(),
            priority: "high".into(),
            start_date: NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
            expected_end_date: NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
            actual_end_date: end,
            progress_percentage: progress,
            score: 0,
            rating: 0,
            student_id: Some(2),
            student_name: Some("Aina".into()),
            supervisor_id: Some(3),
            supervisor_name: Some("Dr. Lim".into()),
            created_at: created,
            updated_at: created,
        }
    }

    #[test]
    fn completed_projects_read_as_finished() {
        let now = Utc.with_ymd_and_hms(2025, 5, 20, 9, 0, 0).unwrap();
        let p = normalize(project("completed", 80, None), now).unwrap();
        assert_eq!(p.progress_percentage, 100);
        assert_eq!(p.actual_end_date, Some(now.date_naive()));
    }

    #[test]
    fn in_progress_projects_are_untouched() {
        let now = Utc.with_ymd_and_hms(2025, 5, 20, 9, 0, 0).unwrap();
        let p = normalize(project("in_progress", 40, None), now).unwrap();
        assert_eq!(p.progress_percentage, 40);
        assert_eq!(p.actual_end_date, None);
    }

    #[test]
    fn progress_request_is_range_checked() {
        let too_far = ProgressUpdateRequest {
            progress_description: "done and more".into(),
            progress_percentage: 120,
            milestones_completed: None,
            challenges_faced: None,
            resources_needed: None,
            accepted_resources: None,
        };
        assert!(validate_input(&too_far).is_err());
    }
}
