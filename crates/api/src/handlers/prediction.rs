//! Proxy to the external student-success model.

use axum::extract::State;
use axum::Json;
use chrono::{NaiveTime, Utc};
use serde::Serialize;
use unievent_core::error::CoreError;
use unievent_core::prediction::{
    availability_text, ModelRecommendation, StudentFeatures, MAX_RECOMMENDED_EVENTS,
};
use unievent_core::types::{Date, DbId};
use unievent_db::models::event::Event;
use unievent_db::repositories::EventRepo;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct RecommendedEvent {
    pub id: DbId,
    pub title: String,
    pub event_date: Date,
    pub event_time: NaiveTime,
    pub location: String,
    pub is_external: bool,
    pub registration_url: Option<String>,
    pub availability: String,
}

impl From<Event> for RecommendedEvent {
    fn from(event: Event) -> Self {
        let availability = availability_text(&event.capacity(), event.enrolled_count);
        Self {
            id: event.id,
            title: event.title,
            event_date: event.event_date,
            event_time: event.event_time,
            location: event.location,
            is_external: event.is_external,
            registration_url: event.registration_url,
            availability,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RecommendationResponse {
    #[serde(flatten)]
    pub recommendation: ModelRecommendation,
    /// Upcoming events in the recommended category. Empty when the model
    /// names a category we do not run events for.
    pub events: Vec<RecommendedEvent>,
}

/// POST /api/v1/prediction/predict
///
/// Returns the model's class probabilities as the model sent them.
pub async fn predict(
    State(state): State<AppState>,
    user: AuthUser,
    Json(features): Json<StudentFeatures>,
) -> AppResult<Json<serde_json::Value>> {
    features.check()?;
    let prediction = state.ml.predict(&features).await.map_err(CoreError::from)?;
    tracing::info!(user_id = user.user_id, "Prediction served");
    Ok(Json(prediction))
}

/// POST /api/v1/prediction/recommend
pub async fn recommend(
    State(state): State<AppState>,
    user: AuthUser,
    Json(features): Json<StudentFeatures>,
) -> AppResult<Json<RecommendationResponse>> {
    features.check()?;
    let recommendation = state
        .ml
        .recommend(&features)
        .await
        .map_err(CoreError::from)?;

    let events = match recommendation.category() {
        Some(category) => EventRepo::list_recommendable(
            &state.pool,
            category,
            Utc::now().date_naive(),
            MAX_RECOMMENDED_EVENTS,
        )
        .await?
        .into_iter()
        .map(RecommendedEvent::from)
        .collect(),
        None => {
            tracing::warn!(
                recommended = %recommendation.recommended_event,
                "Model recommended an unknown event category"
            );
            Vec::new()
        }
    };

    tracing::info!(
        user_id = user.user_id,
        recommended = %recommendation.recommended_event,
        matches = events.len(),
        "Recommendation served"
    );
    Ok(Json(RecommendationResponse {
        recommendation,
        events,
    }))
}
