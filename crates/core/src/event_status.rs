//! Event lifecycle status derivation and event classification enums.
//!
//! An event's status follows its calendar day: future days are `Upcoming`,
//! the day itself is `Ongoing`, past days are `Completed`. `Completed` is
//! sticky: once stored, derivation never moves the event back.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::{Date, Timestamp};

// ---------------------------------------------------------------------------
// Status
// ---------------------------------------------------------------------------

pub const EVENT_UPCOMING: &str = "Upcoming";
pub const EVENT_ONGOING: &str = "Ongoing";
pub const EVENT_COMPLETED: &str = "Completed";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventStatus {
    Upcoming,
    Ongoing,
    Completed,
}

impl EventStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            EventStatus::Upcoming => EVENT_UPCOMING,
            EventStatus::Ongoing => EVENT_ONGOING,
            EventStatus::Completed => EVENT_COMPLETED,
        }
    }

    pub fn parse(value: &str) -> Result<Self, CoreError> {
        match value {
            EVENT_UPCOMING => Ok(EventStatus::Upcoming),
            EVENT_ONGOING => Ok(EventStatus::Ongoing),
            EVENT_COMPLETED => Ok(EventStatus::Completed),
            other => Err(CoreError::Validation(format!(
                "Invalid event status '{other}'. Must be one of: Upcoming, Ongoing, Completed"
            ))),
        }
    }
}

impl fmt::Display for EventStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Status for a freshly created event, from its date alone.
pub fn initial_event_status(event_date: Date, now: Timestamp) -> EventStatus {
    let today = now.date_naive();
    if event_date == today {
        EventStatus::Ongoing
    } else if event_date > today {
        EventStatus::Upcoming
    } else {
        EventStatus::Completed
    }
}

/// Current status of an event given what is stored and the current time.
///
/// Both sides are compared as UTC calendar days. A stored `Completed` is
/// returned unchanged regardless of the date.
pub fn derive_event_status(stored: EventStatus, event_date: Date, now: Timestamp) -> EventStatus {
    if stored == EventStatus::Completed {
        return EventStatus::Completed;
    }
    initial_event_status(event_date, now)
}

/// Status to persist when an event is edited.
///
/// `current` is the event's status as of the edit. A completed event
/// stays completed: an explicit request for any other status is rejected,
/// and an edit without a status pins `Completed` so a later date change
/// cannot reopen it.
pub fn edited_event_status(
    current: EventStatus,
    requested: Option<EventStatus>,
) -> Result<Option<EventStatus>, CoreError> {
    match (current, requested) {
        (EventStatus::Completed, None | Some(EventStatus::Completed)) => {
            Ok(Some(EventStatus::Completed))
        }
        (EventStatus::Completed, Some(other)) => Err(CoreError::Validation(format!(
            "A completed event cannot move back to {other}"
        ))),
        (_, requested) => Ok(requested),
    }
}

// ---------------------------------------------------------------------------
// Type and category
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventType {
    #[default]
    Workshop,
    Competition,
    Seminar,
}

impl EventType {
    pub fn as_str(self) -> &'static str {
        match self {
            EventType::Workshop => "Workshop",
            EventType::Competition => "Competition",
            EventType::Seminar => "Seminar",
        }
    }
}

/// Event category. Also the label space of the recommendation model.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventCategory {
    Pitching,
    Finance,
    Marketing,
    Leadership,
    #[default]
    Networking,
}

impl EventCategory {
    pub const ALL: [EventCategory; 5] = [
        EventCategory::Pitching,
        EventCategory::Finance,
        EventCategory::Marketing,
        EventCategory::Leadership,
        EventCategory::Networking,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            EventCategory::Pitching => "Pitching",
            EventCategory::Finance => "Finance",
            EventCategory::Marketing => "Marketing",
            EventCategory::Leadership => "Leadership",
            EventCategory::Networking => "Networking",
        }
    }

    /// Parse a category name, ignoring case and surrounding whitespace.
    pub fn parse(value: &str) -> Option<Self> {
        let trimmed = value.trim();
        Self::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(trimmed))
    }
}
