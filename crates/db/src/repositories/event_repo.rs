//! Repository for the `events` table.

use sqlx::PgPool;
use unievent_core::event_status::{EventCategory, EVENT_COMPLETED};
use unievent_core::types::{Date, DbId};

use crate::models::event::{CreateEvent, Event, UpdateEvent};

/// Column list shared across queries. Every query aliases `events` as `e`.
const COLUMNS: &str = "e.id, e.title, e.description, e.event_date, e.event_time, e.location, \
    e.max_participants, e.status, e.event_type, e.category, e.is_external, e.registration_url, \
    e.organizer_name, e.organizer_website, e.creator_id, \
    (SELECT COUNT(*) FROM enrollments en WHERE en.event_id = e.id) AS enrolled_count, \
    e.created_at, e.updated_at";

/// SQL for the date-derived status of a non-completed event, given today as `$1`.
const DERIVED_STATUS_SQL: &str = "CASE WHEN event_date = $1 THEN 'Ongoing' \
                                       WHEN event_date > $1 THEN 'Upcoming' \
                                       ELSE 'Completed' END";

pub struct EventRepo;

impl EventRepo {
    pub async fn create(pool: &PgPool, input: &CreateEvent) -> Result<Event, sqlx::Error> {
        let query = format!(
            "INSERT INTO events AS e (title, description, event_date, event_time, location,
                max_participants, status, event_type, category, is_external, registration_url,
                organizer_name, organizer_website, creator_id)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Event>(&query)
            .bind(&input.title)
            .bind(&input.description)
            .bind(input.event_date)
            .bind(input.event_time)
            .bind(&input.location)
            .bind(input.max_participants)
            .bind(&input.status)
            .bind(&input.event_type)
            .bind(&input.category)
            .bind(input.is_external)
            .bind(&input.registration_url)
            .bind(&input.organizer_name)
            .bind(&input.organizer_website)
            .bind(input.creator_id)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Event>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM events e WHERE e.id = $1");
        sqlx::query_as::<_, Event>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// One page of events, newest first.
    pub async fn list(pool: &PgPool, limit: i64, offset: i64) -> Result<Vec<Event>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM events e
             ORDER BY e.created_at DESC, e.id DESC
             LIMIT $1 OFFSET $2"
        );
        sqlx::query_as::<_, Event>(&query)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM events")
            .fetch_one(pool)
            .await?;
        Ok(row.0)
    }

    /// Events created by `creator_id`, soonest first.
    pub async fn list_by_creator(
        pool: &PgPool,
        creator_id: DbId,
    ) -> Result<Vec<Event>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM events e
             WHERE e.creator_id = $1
             ORDER BY e.event_date, e.event_time"
        );
        sqlx::query_as::<_, Event>(&query)
            .bind(creator_id)
            .fetch_all(pool)
            .await
    }

    /// Events `user_id` is enrolled in, soonest first.
    pub async fn list_enrolled(pool: &PgPool, user_id: DbId) -> Result<Vec<Event>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM events e
             JOIN enrollments x ON x.event_id = e.id
             WHERE x.user_id = $1
             ORDER BY e.event_date, e.event_time"
        );
        sqlx::query_as::<_, Event>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// Apply a patch. Returns `None` if the event does not exist.
    ///
    /// A stored `Completed` status is never overwritten.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateEvent,
    ) -> Result<Option<Event>, sqlx::Error> {
        let query = format!(
            "UPDATE events AS e SET
                title = COALESCE($2, title),
                description = COALESCE($3, description),
                event_date = COALESCE($4, event_date),
                event_time = COALESCE($5, event_time),
                location = COALESCE($6, location),
                max_participants = CASE WHEN is_external THEN NULL
                                        ELSE COALESCE($7, max_participants) END,
                status = CASE WHEN status = '{EVENT_COMPLETED}' THEN status
                              ELSE COALESCE($8, status) END,
                event_type = COALESCE($9, event_type),
                category = COALESCE($10, category),
                registration_url = COALESCE($11, registration_url),
                organizer_name = COALESCE($12, organizer_name),
                organizer_website = COALESCE($13, organizer_website)
             WHERE e.id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Event>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(input.event_date)
            .bind(input.event_time)
            .bind(&input.location)
            .bind(input.max_participants)
            .bind(&input.status)
            .bind(&input.event_type)
            .bind(&input.category)
            .bind(&input.registration_url)
            .bind(&input.organizer_name)
            .bind(&input.organizer_website)
            .fetch_optional(pool)
            .await
    }

    /// Persist date-derived statuses for every non-completed event.
    ///
    /// Completed rows are never touched, so completion stays sticky.
    /// Returns the number of rows whose status changed.
    pub async fn reconcile_statuses(pool: &PgPool, today: Date) -> Result<u64, sqlx::Error> {
        let query = format!(
            "UPDATE events SET status = {DERIVED_STATUS_SQL}
             WHERE status <> '{EVENT_COMPLETED}'
               AND status <> {DERIVED_STATUS_SQL}"
        );
        let result = sqlx::query(&query).bind(today).execute(pool).await?;
        Ok(result.rows_affected())
    }

    /// Upcoming events of `category` that still have room (or are external),
    /// soonest first.
    pub async fn list_recommendable(
        pool: &PgPool,
        category: EventCategory,
        today: Date,
        limit: i64,
    ) -> Result<Vec<Event>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM events e
             WHERE e.category = $1
               AND e.status <> '{EVENT_COMPLETED}'
               AND e.event_date > $2
               AND (e.is_external
                    OR e.max_participants IS NULL
                    OR (SELECT COUNT(*) FROM enrollments en WHERE en.event_id = e.id)
                        < e.max_participants)
             ORDER BY e.event_date, e.event_time
             LIMIT $3"
        );
        sqlx::query_as::<_, Event>(&query)
            .bind(category.as_str())
            .bind(today)
            .bind(limit)
            .fetch_all(pool)
            .await
    }

    /// Events that are upcoming as of `today`.
    pub async fn count_upcoming(pool: &PgPool, today: Date) -> Result<i64, sqlx::Error> {
        let query = format!(
            "SELECT COUNT(*) FROM events WHERE status <> '{EVENT_COMPLETED}' AND event_date > $1"
        );
        let row: (i64,) = sqlx::query_as(&query).bind(today).fetch_one(pool).await?;
        Ok(row.0)
    }

    pub async fn count_by_creator(pool: &PgPool, creator_id: DbId) -> Result<i64, sqlx::Error> {
        let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM events WHERE creator_id = $1")
            .bind(creator_id)
            .fetch_one(pool)
            .await?;
        Ok(row.0)
    }

    /// The most recently created events.
    pub async fn recent(pool: &PgPool, limit: i64) -> Result<Vec<Event>, sqlx::Error> {
        Self::list(pool, limit, 0).await
    }
}
