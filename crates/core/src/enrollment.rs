//! Enrollment rules checked before any enrollment row is written or removed.
//!
//! The database unique constraint on `(user_id, event_id)` stays the
//! authority for duplicates; [`can_enroll`] only provides the friendly
//! rejection when the duplicate is already visible.

use crate::event_status::EventStatus;

/// Why an enroll or unenroll request was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum EnrollmentRejection {
    #[error("You are already enrolled in this event.")]
    AlreadyEnrolled,

    #[error("This event is already full.")]
    EventFull,

    #[error("You are not enrolled in this event.")]
    NotEnrolled,

    #[error("Cannot unenroll from an ongoing or completed event.")]
    EventNotUpcoming,
}

impl EnrollmentRejection {
    /// Stable machine-readable code for API responses.
    pub fn code(self) -> &'static str {
        match self {
            EnrollmentRejection::AlreadyEnrolled => "ALREADY_ENROLLED",
            EnrollmentRejection::EventFull => "EVENT_FULL",
            EnrollmentRejection::NotEnrolled => "NOT_ENROLLED",
            EnrollmentRejection::EventNotUpcoming => "EVENT_NOT_UPCOMING",
        }
    }
}

/// The capacity-relevant facts of an event.
#[derive(Debug, Clone, Copy)]
pub struct EventCapacity {
    pub is_external: bool,
    /// `None` for external events.
    pub max_participants: Option<i32>,
}

impl EventCapacity {
    /// Whether `enrolled_count` already fills the event.
    ///
    /// External events and events without a limit are never full.
    pub fn is_full(&self, enrolled_count: i64) -> bool {
        if self.is_external {
            return false;
        }
        match self.max_participants {
            Some(max) => enrolled_count >= i64::from(max),
            None => false,
        }
    }

    /// Remaining seats, or `None` when capacity is not tracked.
    pub fn spots_remaining(&self, enrolled_count: i64) -> Option<i64> {
        if self.is_external {
            return None;
        }
        self.max_participants
            .map(|max| (i64::from(max) - enrolled_count).max(0))
    }
}

/// Check whether a user may enroll.
///
/// Order matters: the duplicate check wins over the capacity check so a
/// user already holding the last seat is told they are enrolled, not that
/// the event is full.
pub fn can_enroll(
    capacity: &EventCapacity,
    already_enrolled: bool,
    enrolled_count: i64,
) -> Result<(), EnrollmentRejection> {
    if already_enrolled {
        return Err(EnrollmentRejection::AlreadyEnrolled);
    }
    if capacity.is_full(enrolled_count) {
        return Err(EnrollmentRejection::EventFull);
    }
    Ok(())
}

/// Check whether a user may withdraw. Only `Upcoming` events allow it.
pub fn can_unenroll(status: EventStatus, enrolled: bool) -> Result<(), EnrollmentRejection> {
    if !enrolled {
        return Err(EnrollmentRejection::NotEnrolled);
    }
    if status != EventStatus::Upcoming {
        return Err(EnrollmentRejection::EventNotUpcoming);
    }
    Ok(())
}
