//! Integration tests for persisted event status: reconciliation and edits.
//!
//! Require `DATABASE_URL`; run with `cargo test -- --ignored`.

mod common;

use chrono::{Duration, Utc};
use sqlx::PgPool;
use unievent_core::event_status::EventStatus;
use unievent_core::roles::Role;
use unievent_db::models::event::UpdateEvent;
use unievent_db::repositories::EventRepo;

use common::{internal_event, next_week, user};

#[sqlx::test(migrations = "../../db/migrations")]
#[ignore = "requires DATABASE_URL"]
async fn reconcile_moves_past_events_and_keeps_completed(pool: PgPool) {
    let organizer = user(&pool, "org@example.com", Role::Lecturer).await;
    let today = Utc::now().date_naive();

    let past = EventRepo::create(
        &pool,
        &internal_event(organizer, today - Duration::days(2), 5),
    )
    .await
    .unwrap();
    let mut finished = internal_event(organizer, today + Duration::days(3), 5);
    finished.status = "Completed".to_string();
    let finished = EventRepo::create(&pool, &finished).await.unwrap();

    let changed = EventRepo::reconcile_statuses(&pool, today).await.unwrap();
    assert_eq!(changed, 1);

    let past = EventRepo::find_by_id(&pool, past.id).await.unwrap().unwrap();
    assert_eq!(past.status, "Completed");
    let finished = EventRepo::find_by_id(&pool, finished.id).await.unwrap().unwrap();
    assert_eq!(finished.status, "Completed");

    assert_eq!(EventRepo::reconcile_statuses(&pool, today).await.unwrap(), 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
#[ignore = "requires DATABASE_URL"]
async fn editing_a_completed_event_keeps_it_completed(pool: PgPool) {
    let organizer = user(&pool, "org@example.com", Role::Lecturer).await;
    let mut finished = internal_event(organizer, next_week(), 5);
    finished.status = "Completed".to_string();
    let finished = EventRepo::create(&pool, &finished).await.unwrap();

    let patch = UpdateEvent {
        title: Some("Pitch Day (rerun)".to_string()),
        status: Some("Upcoming".to_string()),
        ..Default::default()
    };
    let updated = EventRepo::update(&pool, finished.id, &patch)
        .await
        .unwrap()
        .unwrap();

    assert_eq!(updated.title, "Pitch Day (rerun)");
    assert_eq!(updated.status, "Completed");
    assert_eq!(
        updated.current_status(Utc::now()).unwrap(),
        EventStatus::Completed
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
#[ignore = "requires DATABASE_URL"]
async fn open_event_status_can_be_edited(pool: PgPool) {
    let organizer = user(&pool, "org@example.com", Role::Lecturer).await;
    let event = EventRepo::create(&pool, &internal_event(organizer, next_week(), 5))
        .await
        .unwrap();

    let patch = UpdateEvent {
        status: Some("Completed".to_string()),
        ..Default::default()
    };
    let updated = EventRepo::update(&pool, event.id, &patch)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.status, "Completed");
}
