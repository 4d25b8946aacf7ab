//! Project and progress-update models.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use unievent_core::error::CoreError;
use unievent_core::project::{ProjectStatus, UpdateRecord};
use unievent_core::types::{Date, DbId, Timestamp};

/// A live (not soft-deleted) project row with participant names joined in.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Project {
    pub id: DbId,
    pub title: String,
    pub description: String,
    pub project_type: String,
    pub status: String,
    pub priority: String,
    pub start_date: Date,
    pub expected_end_date: Date,
    pub actual_end_date: Option<Date>,
    pub progress_percentage: i32,
    pub score: i32,
    pub rating: i32,
    pub student_id: Option<DbId>,
    pub student_name: Option<String>,
    pub supervisor_id: Option<DbId>,
    pub supervisor_name: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Project {
    pub fn status(&self) -> Result<ProjectStatus, CoreError> {
        ProjectStatus::parse(&self.status)
    }

    /// Whether `user_id` is the owning student or the supervisor.
    pub fn involves(&self, user_id: DbId) -> bool {
        self.student_id == Some(user_id) || self.supervisor_id == Some(user_id)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateProject {
    pub title: String,
    pub description: String,
    pub project_type: String,
    pub priority: String,
    pub start_date: Date,
    pub expected_end_date: Date,
    pub student_id: DbId,
    pub supervisor_id: DbId,
}

/// Patch for a project. `None` leaves the column unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateProject {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<String>,
    pub priority: Option<String>,
    pub expected_end_date: Option<Date>,
    pub actual_end_date: Option<Date>,
    pub score: Option<i32>,
    pub rating: Option<i32>,
}

/// One entry of a project's append-only progress log.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ProjectUpdate {
    pub id: DbId,
    pub project_id: DbId,
    pub progress_description: String,
    pub progress_percentage: i32,
    pub milestones_completed: Option<String>,
    pub challenges_faced: Option<String>,
    pub resources_needed: Option<String>,
    pub accepted_resources: Option<String>,
    pub updated_by: DbId,
    pub updated_by_name: Option<String>,
    pub created_at: Timestamp,
}

impl ProjectUpdate {
    pub fn as_record(&self) -> UpdateRecord<'_> {
        UpdateRecord {
            created_at: self.created_at,
            progress_percentage: self.progress_percentage,
            progress_description: &self.progress_description,
            challenges_faced: self.challenges_faced.as_deref(),
            resources_needed: self.resources_needed.as_deref(),
            accepted_resources: self.accepted_resources.as_deref(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateProjectUpdate {
    pub progress_description: String,
    pub progress_percentage: i32,
    pub milestones_completed: Option<String>,
    pub challenges_faced: Option<String>,
    pub resources_needed: Option<String>,
    pub accepted_resources: Option<String>,
}
