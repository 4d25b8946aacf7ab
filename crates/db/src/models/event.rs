//! Event entity model and DTOs.

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use unievent_core::enrollment::EventCapacity;
use unievent_core::error::CoreError;
use unievent_core::event_status::{derive_event_status, EventStatus};
use unievent_core::types::{Date, DbId, Timestamp};

/// An event row with its live enrollment count.
///
/// `enrolled_count` is computed by the query, never stored.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Event {
    pub id: DbId,
    pub title: String,
    pub description: String,
    pub event_date: Date,
    pub event_time: NaiveTime,
    pub location: String,
    pub max_participants: Option<i32>,
    pub status: String,
    pub event_type: String,
    pub category: String,
    pub is_external: bool,
    pub registration_url: Option<String>,
    pub organizer_name: Option<String>,
    pub organizer_website: Option<String>,
    pub creator_id: DbId,
    pub enrolled_count: i64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Event {
    pub fn capacity(&self) -> EventCapacity {
        EventCapacity {
            is_external: self.is_external,
            max_participants: self.max_participants,
        }
    }

    pub fn stored_status(&self) -> Result<EventStatus, CoreError> {
        EventStatus::parse(&self.status)
    }

    /// Status as of `now`, without writing anything back.
    pub fn current_status(&self, now: Timestamp) -> Result<EventStatus, CoreError> {
        Ok(derive_event_status(
            self.stored_status()?,
            self.event_date,
            now,
        ))
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateEvent {
    pub title: String,
    pub description: String,
    pub event_date: Date,
    pub event_time: NaiveTime,
    pub location: String,
    pub max_participants: Option<i32>,
    pub status: String,
    pub event_type: String,
    pub category: String,
    pub is_external: bool,
    pub registration_url: Option<String>,
    pub organizer_name: Option<String>,
    pub organizer_website: Option<String>,
    pub creator_id: DbId,
}

/// Patch for an event. `None` leaves the column unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateEvent {
    pub title: Option<String>,
    pub description: Option<String>,
    pub event_date: Option<Date>,
    pub event_time: Option<NaiveTime>,
    pub location: Option<String>,
    pub max_participants: Option<i32>,
    pub status: Option<String>,
    pub event_type: Option<String>,
    pub category: Option<String>,
    pub registration_url: Option<String>,
    pub organizer_name: Option<String>,
    pub organizer_website: Option<String>,
}
