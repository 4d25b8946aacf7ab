//! HTTP client for the external student-success model.
//!
//! The model exposes two JSON endpoints, `POST /predict` and
//! `POST /recommend_event`, both taking [`StudentFeatures`]. Requests are
//! sent once with a fixed timeout; there is no retry.

use std::time::Duration;

use serde::de::DeserializeOwned;
use unievent_core::error::CoreError;
use unievent_core::prediction::{ModelRecommendation, StudentFeatures};

use crate::config::MlConfig;

/// Errors talking to the prediction service.
#[derive(Debug, thiserror::Error)]
pub enum PredictionError {
    /// Transport failure, timeout, or a body that is not the expected JSON.
    #[error("Prediction request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The service answered with a non-2xx status.
    #[error("Prediction service returned {status}: {body}")]
    HttpStatus { status: u16, body: String },
}

impl From<PredictionError> for CoreError {
    fn from(err: PredictionError) -> Self {
        CoreError::UpstreamUnavailable(err.to_string())
    }
}

#[derive(Debug, Clone)]
pub struct MlClient {
    client: reqwest::Client,
    base_url: String,
}

impl MlClient {
    pub fn new(config: &MlConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            client,
            base_url: config.base_url.clone(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Class probabilities for the given student, passed through verbatim.
    pub async fn predict(
        &self,
        features: &StudentFeatures,
    ) -> Result<serde_json::Value, PredictionError> {
        self.post("predict", features).await
    }

    /// The event category the model expects to help this student most.
    pub async fn recommend(
        &self,
        features: &StudentFeatures,
    ) -> Result<ModelRecommendation, PredictionError> {
        self.post("recommend_event", features).await
    }

    async fn post<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        features: &StudentFeatures,
    ) -> Result<T, PredictionError> {
        let url = format!("{}/{endpoint}", self.base_url);
        tracing::debug!(%url, "Calling prediction service");

        let response = self.client.post(&url).json(features).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            tracing::warn!(%url, status = status.as_u16(), "Prediction service error");
            return Err(PredictionError::HttpStatus {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response.json::<T>().await?)
    }
}
