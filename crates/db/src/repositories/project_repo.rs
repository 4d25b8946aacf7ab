//! Repository for `projects` and their `project_updates` log.

use sqlx::PgPool;
use unievent_core::error::CoreError;
use unievent_core::project::{apply_progress_update, ProjectStatus};
use unievent_core::types::{Date, DbId, Timestamp};

use crate::error::RepoError;
use crate::models::project::{
    CreateProject, CreateProjectUpdate, Project, ProjectUpdate, UpdateProject,
};

/// Project columns, with student and supervisor names joined in. Queries
/// select `FROM {source} p {JOINS}`.
const COLUMNS: &str = "p.id, p.title, p.description, p.project_type, p.status, p.priority, \
    p.start_date, p.expected_end_date, p.actual_end_date, p.progress_percentage, p.score, \
    p.rating, p.student_id, s.name AS student_name, p.supervisor_id, v.name AS supervisor_name, \
    p.created_at, p.updated_at";

const JOINS: &str = "LEFT JOIN users s ON s.id = p.student_id \
                     LEFT JOIN users v ON v.id = p.supervisor_id";

const UPDATE_COLUMNS: &str = "pu.id, pu.project_id, pu.progress_description, \
    pu.progress_percentage, pu.milestones_completed, pu.challenges_faced, pu.resources_needed, \
    pu.accepted_resources, pu.updated_by, u.name AS updated_by_name, pu.created_at";

#[derive(sqlx::FromRow)]
struct LockedProject {
    status: String,
    actual_end_date: Option<Date>,
}

pub struct ProjectRepo;

impl ProjectRepo {
    /// Create a project in `planning` with zero progress.
    pub async fn create(pool: &PgPool, input: &CreateProject) -> Result<Project, sqlx::Error> {
        let query = format!(
            "WITH p AS (
                INSERT INTO projects (title, description, project_type, priority,
                    start_date, expected_end_date, student_id, supervisor_id)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
                RETURNING *
             )
             SELECT {COLUMNS} FROM p {JOINS}"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(&input.title)
            .bind(&input.description)
            .bind(&input.project_type)
            .bind(&input.priority)
            .bind(input.start_date)
            .bind(input.expected_end_date)
            .bind(input.student_id)
            .bind(input.supervisor_id)
            .fetch_one(pool)
            .await
    }

    /// Find a live project. Soft-deleted projects are invisible.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Project>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM projects p {JOINS}
             WHERE p.id = $1 AND p.deleted_at IS NULL"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// All live projects, newest first.
    pub async fn list_all(pool: &PgPool) -> Result<Vec<Project>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM projects p {JOINS}
             WHERE p.deleted_at IS NULL
             ORDER BY p.created_at DESC, p.id DESC"
        );
        sqlx::query_as::<_, Project>(&query).fetch_all(pool).await
    }

    pub async fn list_for_student(
        pool: &PgPool,
        student_id: DbId,
    ) -> Result<Vec<Project>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM projects p {JOINS}
             WHERE p.student_id = $1 AND p.deleted_at IS NULL
             ORDER BY p.created_at DESC, p.id DESC"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(student_id)
            .fetch_all(pool)
            .await
    }

    pub async fn list_for_supervisor(
        pool: &PgPool,
        supervisor_id: DbId,
    ) -> Result<Vec<Project>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM projects p {JOINS}
             WHERE p.supervisor_id = $1 AND p.deleted_at IS NULL
             ORDER BY p.created_at DESC, p.id DESC"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(supervisor_id)
            .fetch_all(pool)
            .await
    }

    /// Apply a patch. Returns `None` if the project does not exist.
    ///
    /// A completed project keeps its status whatever the patch carries.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateProject,
    ) -> Result<Option<Project>, sqlx::Error> {
        let query = format!(
            "WITH p AS (
                UPDATE projects SET
                    title = COALESCE($2, title),
                    description = COALESCE($3, description),
                    status = CASE WHEN status = 'completed' THEN status
                                  ELSE COALESCE($4, status) END,
                    priority = COALESCE($5, priority),
                    expected_end_date = COALESCE($6, expected_end_date),
                    actual_end_date = COALESCE($7, actual_end_date),
                    score = COALESCE($8, score),
                    rating = COALESCE($9, rating)
                WHERE id = $1 AND deleted_at IS NULL
                RETURNING *
             )
             SELECT {COLUMNS} FROM p {JOINS}"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(&input.status)
            .bind(&input.priority)
            .bind(input.expected_end_date)
            .bind(input.actual_end_date)
            .bind(input.score)
            .bind(input.rating)
            .fetch_optional(pool)
            .await
    }

    /// Soft-delete a project. Returns `true` if a live row was marked.
    pub async fn soft_delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE projects SET deleted_at = NOW() WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Append a progress update and move the project to the derived status.
    ///
    /// The project row is locked for the duration so concurrent updates
    /// apply in order and `actual_end_date` is stamped at most once.
    pub async fn record_progress(
        pool: &PgPool,
        project_id: DbId,
        updated_by: DbId,
        input: &CreateProjectUpdate,
        now: Timestamp,
    ) -> Result<(Project, ProjectUpdate), RepoError> {
        let mut tx = pool.begin().await?;

        let locked = sqlx::query_as::<_, LockedProject>(
            "SELECT status, actual_end_date FROM projects
             WHERE id = $1 AND deleted_at IS NULL FOR UPDATE",
        )
        .bind(project_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Project",
            id: project_id,
        })?;

        let previous = ProjectStatus::parse(&locked.status)?;
        let transition = apply_progress_update(
            input.progress_percentage,
            previous,
            locked.actual_end_date,
            now,
        )?;

        let query = format!(
            "WITH pu AS (
                INSERT INTO project_updates (project_id, progress_description,
                    progress_percentage, milestones_completed, challenges_faced,
                    resources_needed, accepted_resources, updated_by)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
                RETURNING *
             )
             SELECT {UPDATE_COLUMNS} FROM pu LEFT JOIN users u ON u.id = pu.updated_by"
        );
        let update = sqlx::query_as::<_, ProjectUpdate>(&query)
            .bind(project_id)
            .bind(&input.progress_description)
            .bind(input.progress_percentage)
            .bind(&input.milestones_completed)
            .bind(&input.challenges_faced)
            .bind(&input.resources_needed)
            .bind(&input.accepted_resources)
            .bind(updated_by)
            .fetch_one(&mut *tx)
            .await?;

        let query = format!(
            "WITH p AS (
                UPDATE projects SET
                    progress_percentage = $2,
                    status = $3,
                    actual_end_date = $4
                WHERE id = $1
                RETURNING *
             )
             SELECT {COLUMNS} FROM p {JOINS}"
        );
        let project = sqlx::query_as::<_, Project>(&query)
            .bind(project_id)
            .bind(input.progress_percentage)
            .bind(transition.status.as_str())
            .bind(transition.actual_end_date)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;

        tracing::info!(
            project_id,
            updated_by,
            progress = input.progress_percentage,
            from = %previous,
            to = %transition.status,
            "Project progress recorded"
        );
        Ok((project, update))
    }

    /// A project's progress log, oldest first.
    pub async fn list_updates(
        pool: &PgPool,
        project_id: DbId,
    ) -> Result<Vec<ProjectUpdate>, sqlx::Error> {
        let query = format!(
            "SELECT {UPDATE_COLUMNS} FROM project_updates pu
             LEFT JOIN users u ON u.id = pu.updated_by
             WHERE pu.project_id = $1
             ORDER BY pu.created_at, pu.id"
        );
        sqlx::query_as::<_, ProjectUpdate>(&query)
            .bind(project_id)
            .fetch_all(pool)
            .await
    }
}
