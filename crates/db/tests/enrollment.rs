//! Integration tests for enrollment rules against a real database.
//!
//! Require `DATABASE_URL`; run with `cargo test -- --ignored`.

mod common;

use assert_matches::assert_matches;
use chrono::Utc;
use sqlx::PgPool;
use unievent_core::enrollment::EnrollmentRejection;
use unievent_core::error::CoreError;
use unievent_core::roles::Role;
use unievent_db::repositories::{EnrollmentRepo, EventRepo};
use unievent_db::RepoError;

use common::{internal_event, next_week, user};

#[sqlx::test(migrations = "../../db/migrations")]
#[ignore = "requires DATABASE_URL"]
async fn enrolling_twice_is_rejected_and_count_is_unchanged(pool: PgPool) {
    let organizer = user(&pool, "org@example.com", Role::Lecturer).await;
    let student = user(&pool, "stu@example.com", Role::Student).await;
    let event = EventRepo::create(&pool, &internal_event(organizer, next_week(), 10))
        .await
        .unwrap();

    EnrollmentRepo::enroll(&pool, student, event.id).await.unwrap();
    let second = EnrollmentRepo::enroll(&pool, student, event.id).await;

    assert_matches!(
        second,
        Err(RepoError::Core(CoreError::Enrollment(
            EnrollmentRejection::AlreadyEnrolled
        )))
    );
    let reloaded = EventRepo::find_by_id(&pool, event.id).await.unwrap().unwrap();
    assert_eq!(reloaded.enrolled_count, 1);
    assert_eq!(EnrollmentRepo::count_for_user(&pool, student).await.unwrap(), 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
#[ignore = "requires DATABASE_URL"]
async fn full_event_rejects_the_next_student(pool: PgPool) {
    let organizer = user(&pool, "org@example.com", Role::Lecturer).await;
    let first = user(&pool, "a@example.com", Role::Student).await;
    let second = user(&pool, "b@example.com", Role::Student).await;
    let event = EventRepo::create(&pool, &internal_event(organizer, next_week(), 1))
        .await
        .unwrap();

    EnrollmentRepo::enroll(&pool, first, event.id).await.unwrap();
    assert_matches!(
        EnrollmentRepo::enroll(&pool, second, event.id).await,
        Err(RepoError::Core(CoreError::Enrollment(EnrollmentRejection::EventFull)))
    );

    let reloaded = EventRepo::find_by_id(&pool, event.id).await.unwrap().unwrap();
    assert_eq!(reloaded.enrolled_count, 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
#[ignore = "requires DATABASE_URL"]
async fn unenroll_is_blocked_once_the_event_starts(pool: PgPool) {
    let organizer = user(&pool, "org@example.com", Role::Lecturer).await;
    let student = user(&pool, "stu@example.com", Role::Student).await;
    let today = Utc::now().date_naive();
    let event = EventRepo::create(&pool, &internal_event(organizer, today, 5))
        .await
        .unwrap();
    EnrollmentRepo::enroll(&pool, student, event.id).await.unwrap();

    assert_matches!(
        EnrollmentRepo::unenroll(&pool, student, event.id, Utc::now()).await,
        Err(RepoError::Core(CoreError::Enrollment(
            EnrollmentRejection::EventNotUpcoming
        )))
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
#[ignore = "requires DATABASE_URL"]
async fn unenroll_from_upcoming_event_removes_the_row(pool: PgPool) {
    let organizer = user(&pool, "org@example.com", Role::Lecturer).await;
    let student = user(&pool, "stu@example.com", Role::Student).await;
    let event = EventRepo::create(&pool, &internal_event(organizer, next_week(), 5))
        .await
        .unwrap();
    EnrollmentRepo::enroll(&pool, student, event.id).await.unwrap();

    EnrollmentRepo::unenroll(&pool, student, event.id, Utc::now())
        .await
        .unwrap();
    assert!(!EnrollmentRepo::is_enrolled(&pool, student, event.id).await.unwrap());

    assert_matches!(
        EnrollmentRepo::unenroll(&pool, student, event.id, Utc::now()).await,
        Err(RepoError::Core(CoreError::Enrollment(EnrollmentRejection::NotEnrolled)))
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
#[ignore = "requires DATABASE_URL"]
async fn enrolling_in_missing_event_is_not_found(pool: PgPool) {
    let student = user(&pool, "stu@example.com", Role::Student).await;
    assert_matches!(
        EnrollmentRepo::enroll(&pool, student, 999_999).await,
        Err(RepoError::Core(CoreError::NotFound { entity: "Event", .. }))
    );
}
