//! Repository for the `enrollments` table.
//!
//! Enroll and unenroll lock the event row before checking the rules, so
//! two concurrent requests for the last seat are serialized and capacity
//! never overshoots.

use sqlx::PgPool;
use unievent_core::enrollment::{can_enroll, can_unenroll, EnrollmentRejection, EventCapacity};
use unievent_core::error::CoreError;
use unievent_core::event_status::{derive_event_status, EventStatus};
use unievent_core::types::{Date, DbId, Timestamp};

use crate::error::RepoError;
use crate::is_unique_violation;
use crate::models::enrollment::{EnrolledUser, Enrollment};

const COLUMNS: &str = "id, user_id, event_id, created_at";

/// The unique constraint that makes a second enrollment impossible.
pub const UQ_ENROLLMENTS_USER_EVENT: &str = "uq_enrollments_user_event";

/// Event fields read under the row lock.
#[derive(sqlx::FromRow)]
struct LockedEvent {
    status: String,
    event_date: Date,
    is_external: bool,
    max_participants: Option<i32>,
}

pub struct EnrollmentRepo;

impl EnrollmentRepo {
    /// Enroll `user_id` in `event_id`.
    ///
    /// Fails with `NotFound` for an unknown event, or with the guard's
    /// rejection. A unique violation that slips past the pre-check is
    /// reported as `AlreadyEnrolled`.
    pub async fn enroll(
        pool: &PgPool,
        user_id: DbId,
        event_id: DbId,
    ) -> Result<Enrollment, RepoError> {
        let mut tx = pool.begin().await?;

        let event = Self::lock_event(&mut tx, event_id).await?;

        let (already_enrolled, enrolled_count): (bool, i64) = sqlx::query_as(
            "SELECT COALESCE(BOOL_OR(user_id = $2), false), COUNT(*)
             FROM enrollments WHERE event_id = $1",
        )
        .bind(event_id)
        .bind(user_id)
        .fetch_one(&mut *tx)
        .await?;

        let capacity = EventCapacity {
            is_external: event.is_external,
            max_participants: event.max_participants,
        };
        can_enroll(&capacity, already_enrolled, enrolled_count).map_err(CoreError::from)?;

        let query = format!(
            "INSERT INTO enrollments (user_id, event_id) VALUES ($1, $2) RETURNING {COLUMNS}"
        );
        let enrollment = sqlx::query_as::<_, Enrollment>(&query)
            .bind(user_id)
            .bind(event_id)
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| {
                if is_unique_violation(&e, UQ_ENROLLMENTS_USER_EVENT) {
                    RepoError::Core(EnrollmentRejection::AlreadyEnrolled.into())
                } else {
                    RepoError::Database(e)
                }
            })?;

        tx.commit().await?;
        tracing::info!(user_id, event_id, "User enrolled in event");
        Ok(enrollment)
    }

    /// Withdraw `user_id` from `event_id`. Only allowed while the event is
    /// upcoming as of `now`.
    pub async fn unenroll(
        pool: &PgPool,
        user_id: DbId,
        event_id: DbId,
        now: Timestamp,
    ) -> Result<(), RepoError> {
        let mut tx = pool.begin().await?;

        let event = Self::lock_event(&mut tx, event_id).await?;
        let status = derive_event_status(EventStatus::parse(&event.status)?, event.event_date, now);

        let enrolled: (bool,) = sqlx::query_as(
            "SELECT EXISTS(SELECT 1 FROM enrollments WHERE user_id = $1 AND event_id = $2)",
        )
        .bind(user_id)
        .bind(event_id)
        .fetch_one(&mut *tx)
        .await?;

        can_unenroll(status, enrolled.0).map_err(CoreError::from)?;

        sqlx::query("DELETE FROM enrollments WHERE user_id = $1 AND event_id = $2")
            .bind(user_id)
            .bind(event_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        tracing::info!(user_id, event_id, "User unenrolled from event");
        Ok(())
    }

    async fn lock_event(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        event_id: DbId,
    ) -> Result<LockedEvent, RepoError> {
        sqlx::query_as::<_, LockedEvent>(
            "SELECT status, event_date, is_external, max_participants
             FROM events WHERE id = $1 FOR UPDATE",
        )
        .bind(event_id)
        .fetch_optional(&mut **tx)
        .await?
        .ok_or(RepoError::Core(CoreError::NotFound {
            entity: "Event",
            id: event_id,
        }))
    }

    pub async fn is_enrolled(
        pool: &PgPool,
        user_id: DbId,
        event_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let row: (bool,) = sqlx::query_as(
            "SELECT EXISTS(SELECT 1 FROM enrollments WHERE user_id = $1 AND event_id = $2)",
        )
        .bind(user_id)
        .bind(event_id)
        .fetch_one(pool)
        .await?;
        Ok(row.0)
    }

    /// Which of `event_ids` the user is enrolled in.
    pub async fn enrolled_event_ids(
        pool: &PgPool,
        user_id: DbId,
        event_ids: &[DbId],
    ) -> Result<Vec<DbId>, sqlx::Error> {
        let rows: Vec<(DbId,)> = sqlx::query_as(
            "SELECT event_id FROM enrollments WHERE user_id = $1 AND event_id = ANY($2)",
        )
        .bind(user_id)
        .bind(event_ids)
        .fetch_all(pool)
        .await?;
        Ok(rows.into_iter().map(|r| r.0).collect())
    }

    pub async fn count_for_user(pool: &PgPool, user_id: DbId) -> Result<i64, sqlx::Error> {
        let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM enrollments WHERE user_id = $1")
            .bind(user_id)
            .fetch_one(pool)
            .await?;
        Ok(row.0)
    }

    /// Users enrolled in an event, earliest enrollment first.
    pub async fn list_users(pool: &PgPool, event_id: DbId) -> Result<Vec<EnrolledUser>, sqlx::Error> {
        sqlx::query_as::<_, EnrolledUser>(
            "SELECT u.id AS user_id, u.name, u.email, u.role, x.created_at AS enrolled_at
             FROM enrollments x
             JOIN users u ON u.id = x.user_id
             WHERE x.event_id = $1
             ORDER BY x.created_at, x.id",
        )
        .bind(event_id)
        .fetch_all(pool)
        .await
    }
}
