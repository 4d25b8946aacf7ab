#![allow(dead_code)]

use chrono::{Duration, NaiveTime, Utc};
use sqlx::PgPool;
use unievent_core::roles::Role;
use unievent_core::types::{Date, DbId};
use unievent_db::models::event::CreateEvent;
use unievent_db::models::project::{CreateProject, CreateProjectUpdate};
use unievent_db::models::user::CreateUser;
use unievent_db::repositories::{ProfileRepo, UserRepo};

/// Create a user with an empty role profile. The display name is the
/// local part of `email`.
pub async fn user(pool: &PgPool, email: &str, role: Role) -> DbId {
    let user = UserRepo::create(
        pool,
        &CreateUser {
            name: email.split('@').next().unwrap_or("user").to_string(),
            email: email.to_string(),
            password_hash: "not-a-real-hash".to_string(),
            role: role.as_str().to_string(),
        },
    )
    .await
    .unwrap();
    ProfileRepo::create_empty(pool, user.id, role).await.unwrap();
    user.id
}

pub fn internal_event(creator_id: DbId, date: Date, max: i32) -> CreateEvent {
    CreateEvent {
        title: "Pitch Day".to_string(),
        description: "Present your startup".to_string(),
        event_date: date,
        event_time: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
        location: "Main Hall".to_string(),
        max_participants: Some(max),
        status: "Upcoming".to_string(),
        event_type: "Competition".to_string(),
        category: "Pitching".to_string(),
        is_external: false,
        registration_url: None,
        organizer_name: None,
        organizer_website: None,
        creator_id,
    }
}

pub fn next_week() -> Date {
    Utc::now().date_naive() + Duration::days(7)
}

pub fn new_project(student_id: DbId, supervisor_id: DbId) -> CreateProject {
    let today = Utc::now().date_naive();
    CreateProject {
        title: "Smart Campus".to_string(),
        description: "IoT sensors".to_string(),
        project_type: "individual".to_string(),
        priority: "high".to_string(),
        start_date: today,
        expected_end_date: today + Duration::days(60),
        student_id,
        supervisor_id,
    }
}

pub fn progress_step(progress: i32) -> CreateProjectUpdate {
    CreateProjectUpdate {
        progress_description: format!("reached {progress}"),
        progress_percentage: progress,
        milestones_completed: None,
        challenges_faced: Some("time, budget".to_string()),
        resources_needed: None,
        accepted_resources: None,
    }
}
