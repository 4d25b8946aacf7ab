//! Enrollment join rows.

use serde::Serialize;
use sqlx::FromRow;
use unievent_core::types::{DbId, Timestamp};

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Enrollment {
    pub id: DbId,
    pub user_id: DbId,
    pub event_id: DbId,
    pub created_at: Timestamp,
}

/// A user enrolled in an event, as shown to the organizer.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct EnrolledUser {
    pub user_id: DbId,
    pub name: String,
    pub email: String,
    pub role: String,
    pub enrolled_at: Timestamp,
}
