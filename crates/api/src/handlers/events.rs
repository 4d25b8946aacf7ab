//! Handlers for the `/events` resource.
//!
//! Responses carry the status derived for the current day, never the raw
//! stored column; the background reconciler persists it separately.

use std::collections::HashSet;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::{NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use unievent_core::error::CoreError;
use unievent_core::event_status::{
    edited_event_status, initial_event_status, EventCategory, EventStatus, EventType,
};
use unievent_core::roles::Role;
use unievent_core::types::{Date, DbId, Timestamp};
use unievent_core::validation::{require_non_blank, validate_input};
use unievent_db::models::enrollment::EnrolledUser;
use unievent_db::models::event::{CreateEvent, Event, UpdateEvent};
use unievent_db::repositories::{EnrollmentRepo, EventRepo};
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireOrganizer;
use crate::query::PaginationParams;
use crate::response::{DataResponse, PageResponse};
use crate::state::AppState;

/// How many events the dashboard's "recent" strip shows.
const RECENT_EVENTS: i64 = 3;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Validate)]
pub struct CreateEventRequest {
    #[validate(length(min = 1, max = 255))]
    pub title: String,
    #[validate(length(min = 1))]
    pub description: String,
    pub event_date: Date,
    pub event_time: NaiveTime,
    #[validate(length(min = 1, max = 255))]
    pub location: String,
    #[validate(range(min = 1))]
    pub max_participants: Option<i32>,
    pub event_type: EventType,
    pub category: EventCategory,
    #[serde(default)]
    pub is_external: bool,
    #[validate(url)]
    pub registration_url: Option<String>,
    #[validate(length(max = 255))]
    pub organizer_name: Option<String>,
    #[validate(url)]
    pub organizer_website: Option<String>,
}

#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateEventRequest {
    #[validate(length(min = 1, max = 255))]
    pub title: Option<String>,
    #[validate(length(min = 1))]
    pub description: Option<String>,
    pub event_date: Option<Date>,
    pub event_time: Option<NaiveTime>,
    #[validate(length(min = 1, max = 255))]
    pub location: Option<String>,
    #[validate(range(min = 1))]
    pub max_participants: Option<i32>,
    pub status: Option<EventStatus>,
    pub event_type: Option<EventType>,
    pub category: Option<EventCategory>,
    #[validate(url)]
    pub registration_url: Option<String>,
    #[validate(length(max = 255))]
    pub organizer_name: Option<String>,
    #[validate(url)]
    pub organizer_website: Option<String>,
}

/// An event as returned to clients.
#[derive(Debug, Serialize)]
pub struct EventView {
    pub id: DbId,
    pub title: String,
    pub description: String,
    pub event_date: Date,
    pub event_time: NaiveTime,
    pub location: String,
    pub max_participants: Option<i32>,
    pub status: EventStatus,
    pub event_type: String,
    pub category: String,
    pub is_external: bool,
    pub registration_url: Option<String>,
    pub organizer_name: Option<String>,
    pub organizer_website: Option<String>,
    pub creator_id: DbId,
    /// `None` for external events, which do not track attendance.
    pub enrolled_count: Option<i64>,
    pub spots_remaining: Option<i64>,
    pub is_enrolled: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl EventView {
    pub fn project(event: Event, now: Timestamp, is_enrolled: bool) -> Result<Self, CoreError> {
        let status = event.current_status(now)?;
        let capacity = event.capacity();
        let enrolled_count = (!event.is_external).then_some(event.enrolled_count);
        Ok(Self {
            spots_remaining: capacity.spots_remaining(event.enrolled_count),
            id: event.id,
            title: event.title,
            description: event.description,
            event_date: event.event_date,
            event_time: event.event_time,
            location: event.location,
            max_participants: event.max_participants,
            status,
            event_type: event.event_type,
            category: event.category,
            is_external: event.is_external,
            registration_url: event.registration_url,
            organizer_name: event.organizer_name,
            organizer_website: event.organizer_website,
            creator_id: event.creator_id,
            enrolled_count,
            is_enrolled,
            created_at: event.created_at,
            updated_at: event.updated_at,
        })
    }
}

#[derive(Debug, Serialize)]
pub struct MyEvents {
    pub organized: Vec<EventView>,
    pub enrolled: Vec<EventView>,
}

#[derive(Debug, Serialize)]
pub struct EventStats {
    pub total_events: i64,
    pub upcoming_events: i64,
    pub my_events: i64,
    pub enrolled_events: i64,
    pub recent_events: Vec<EventView>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/events
pub async fn create(
    State(state): State<AppState>,
    RequireOrganizer(user): RequireOrganizer,
    Json(input): Json<CreateEventRequest>,
) -> AppResult<(StatusCode, Json<EventView>)> {
    validate_input(&input)?;
    require_non_blank("title", &input.title)?;

    let max_participants = if input.is_external {
        match input.registration_url.as_deref() {
            Some(url) if !url.trim().is_empty() => {}
            _ => {
                return Err(AppError::Core(CoreError::Validation(
                    "registration_url is required for external events".into(),
                )))
            }
        }
        None
    } else {
        Some(input.max_participants.ok_or_else(|| {
            AppError::Core(CoreError::Validation(
                "max_participants is required for internal events".into(),
            ))
        })?)
    };

    let now = Utc::now();
    let status = initial_event_status(input.event_date, now);

    let event = EventRepo::create(
        &state.pool,
        &CreateEvent {
            title: input.title.trim().to_string(),
            description: input.description,
            event_date: input.event_date,
            event_time: input.event_time,
            location: input.location,
            max_participants,
            status: status.as_str().to_string(),
            event_type: input.event_type.as_str().to_string(),
            category: input.category.as_str().to_string(),
            is_external: input.is_external,
            registration_url: input.registration_url,
            organizer_name: input.organizer_name,
            organizer_website: input.organizer_website,
            creator_id: user.user_id,
        },
    )
    .await?;

    tracing::info!(event_id = event.id, creator_id = user.user_id, %status, "Event created");
    Ok((StatusCode::CREATED, Json(EventView::project(event, now, false)?)))
}

/// GET /api/v1/events
///
/// Newest first, with the caller's enrollment flag on each row.
pub async fn list(
    State(state): State<AppState>,
    user: AuthUser,
    Query(params): Query<PaginationParams>,
) -> AppResult<Json<PageResponse<EventView>>> {
    let (limit, offset) = (params.limit(), params.offset());
    let events = EventRepo::list(&state.pool, limit, offset).await?;
    let total = EventRepo::count(&state.pool).await?;

    let ids: Vec<DbId> = events.iter().map(|e| e.id).collect();
    let enrolled: HashSet<DbId> = EnrollmentRepo::enrolled_event_ids(&state.pool, user.user_id, &ids)
        .await?
        .into_iter()
        .collect();

    let now = Utc::now();
    let data = events
        .into_iter()
        .map(|e| {
            let is_enrolled = enrolled.contains(&e.id);
            EventView::project(e, now, is_enrolled)
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Json(PageResponse {
        data,
        total,
        limit,
        offset,
    }))
}

/// GET /api/v1/events/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<EventView>> {
    let event = find_event(&state, id).await?;
    let is_enrolled = EnrollmentRepo::is_enrolled(&state.pool, user.user_id, id).await?;
    Ok(Json(EventView::project(event, Utc::now(), is_enrolled)?))
}

/// PUT /api/v1/events/{id}
///
/// Only the creator may edit. An explicit `status` is stored as given
/// unless the event is already completed, in which case it stays
/// completed and any other requested status is rejected.
pub async fn update(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateEventRequest>,
) -> AppResult<Json<EventView>> {
    validate_input(&input)?;
    let existing = find_event(&state, id).await?;
    if existing.creator_id != user.user_id {
        return Err(AppError::Core(CoreError::Forbidden(
            "Only the event creator can edit this event".into(),
        )));
    }
    let status = edited_event_status(existing.current_status(Utc::now())?, input.status)?;

    let patch = UpdateEvent {
        title: input.title.map(|t| t.trim().to_string()),
        description: input.description,
        event_date: input.event_date,
        event_time: input.event_time,
        location: input.location,
        max_participants: input.max_participants,
        status: status.map(|s| s.as_str().to_string()),
        event_type: input.event_type.map(|t| t.as_str().to_string()),
        category: input.category.map(|c| c.as_str().to_string()),
        registration_url: input.registration_url,
        organizer_name: input.organizer_name,
        organizer_website: input.organizer_website,
    };

    let event = EventRepo::update(&state.pool, id, &patch)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Event", id }))?;
    let is_enrolled = EnrollmentRepo::is_enrolled(&state.pool, user.user_id, id).await?;

    tracing::info!(event_id = id, user_id = user.user_id, "Event updated");
    Ok(Json(EventView::project(event, Utc::now(), is_enrolled)?))
}

/// GET /api/v1/events/mine
///
/// Events the caller organizes and events the caller is enrolled in.
pub async fn my_events(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<MyEvents>> {
    let now = Utc::now();
    let organized = EventRepo::list_by_creator(&state.pool, user.user_id).await?;
    let enrolled = EventRepo::list_enrolled(&state.pool, user.user_id).await?;
    let enrolled_ids: HashSet<DbId> = enrolled.iter().map(|e| e.id).collect();

    let organized = organized
        .into_iter()
        .map(|e| {
            let is_enrolled = enrolled_ids.contains(&e.id);
            EventView::project(e, now, is_enrolled)
        })
        .collect::<Result<Vec<_>, _>>()?;
    let enrolled = enrolled
        .into_iter()
        .map(|e| EventView::project(e, now, true))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Json(MyEvents {
        organized,
        enrolled,
    }))
}

/// GET /api/v1/events/{id}/participants
///
/// Visible to the creator and to admins.
pub async fn participants(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<EnrolledUser>>>> {
    let event = find_event(&state, id).await?;
    if event.creator_id != user.user_id && !user.is(Role::Admin) {
        return Err(AppError::Core(CoreError::Forbidden(
            "Only the event creator can view participants".into(),
        )));
    }
    let users = EnrollmentRepo::list_users(&state.pool, id).await?;
    Ok(Json(DataResponse { data: users }))
}

/// GET /api/v1/events/stats
pub async fn stats(State(state): State<AppState>, user: AuthUser) -> AppResult<Json<EventStats>> {
    let now = Utc::now();
    let today = now.date_naive();

    let total_events = EventRepo::count(&state.pool).await?;
    let upcoming_events = EventRepo::count_upcoming(&state.pool, today).await?;
    let my_events = EventRepo::count_by_creator(&state.pool, user.user_id).await?;
    let enrolled_events = EnrollmentRepo::count_for_user(&state.pool, user.user_id).await?;

    let recent = EventRepo::recent(&state.pool, RECENT_EVENTS).await?;
    let ids: Vec<DbId> = recent.iter().map(|e| e.id).collect();
    let enrolled: HashSet<DbId> = EnrollmentRepo::enrolled_event_ids(&state.pool, user.user_id, &ids)
        .await?
        .into_iter()
        .collect();
    let recent_events = recent
        .into_iter()
        .map(|e| {
            let is_enrolled = enrolled.contains(&e.id);
            EventView::project(e, now, is_enrolled)
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Json(EventStats {
        total_events,
        upcoming_events,
        my_events,
        enrolled_events,
        recent_events,
    }))
}

pub(crate) async fn find_event(state: &AppState, id: DbId) -> AppResult<Event> {
    EventRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Event", id }))
}
