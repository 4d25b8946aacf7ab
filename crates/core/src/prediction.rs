//! Request and response shapes for the external student-success model.
//!
//! The model is served over HTTP by a separate service. This module only
//! validates what we send and interprets what comes back; the transport
//! lives in the api crate.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::enrollment::EventCapacity;
use crate::error::CoreError;
use crate::event_status::EventCategory;
use crate::validation::validate_input;

/// How many matching events a recommendation lists.
pub const MAX_RECOMMENDED_EVENTS: i64 = 3;

pub const EXTERNAL_EVENT_AVAILABILITY: &str = "External Event";

/// Student features the model is trained on.
///
/// The `joined_*` keys keep the capitalised category names the model expects
/// on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct StudentFeatures {
    #[validate(range(min = 0.0, max = 4.0))]
    pub gpa: f64,
    #[validate(range(min = 1, max = 5))]
    pub year: i32,
    #[validate(range(min = 0))]
    pub cert_count: i32,
    #[validate(range(min = 0.0, max = 100.0))]
    pub project_score: f64,
    #[validate(range(min = 0.0, max = 5.0))]
    pub mentor_rating: f64,
    #[validate(range(min = 0))]
    pub major: i32,
    #[serde(rename = "joined_Pitching")]
    pub joined_pitching: bool,
    #[serde(rename = "joined_Marketing")]
    pub joined_marketing: bool,
    #[serde(rename = "joined_Finance")]
    pub joined_finance: bool,
    #[serde(rename = "joined_Leadership")]
    pub joined_leadership: bool,
    #[serde(rename = "joined_Networking")]
    pub joined_networking: bool,
}

impl StudentFeatures {
    /// Range-check every feature before it leaves the process.
    pub fn check(&self) -> Result<(), CoreError> {
        validate_input(self)?;
        if !self.gpa.is_finite()
            || !self.project_score.is_finite()
            || !self.mentor_rating.is_finite()
        {
            return Err(CoreError::Validation(
                "numeric features must be finite".to_string(),
            ));
        }
        Ok(())
    }
}

/// What the `/recommend_event` endpoint answers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelRecommendation {
    pub improvement_percentage: f64,
    pub new_success_probability: f64,
    pub recommended_event: String,
    pub status: String,
}

impl ModelRecommendation {
    /// The recommended category, if the model named one we know.
    pub fn category(&self) -> Option<EventCategory> {
        EventCategory::parse(&self.recommended_event)
    }
}

/// Availability label shown next to a recommended event.
pub fn availability_text(capacity: &EventCapacity, enrolled_count: i64) -> String {
    match capacity.spots_remaining(enrolled_count) {
        Some(n) => format!("{n} spots remaining"),
        None if capacity.is_external => EXTERNAL_EVENT_AVAILABILITY.to_string(),
        None => "Open".to_string(),
    }
}
