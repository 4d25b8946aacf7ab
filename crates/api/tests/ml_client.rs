//! The prediction proxy against a mock model service.

mod common;

use assert_matches::assert_matches;
use axum::http::StatusCode;
use common::{body_json, build_offline_app, post_json, token_for};
use serde_json::json;
use unievent_api::config::MlConfig;
use unievent_api::ml::{MlClient, PredictionError};
use unievent_core::prediction::StudentFeatures;
use unievent_core::roles::Role;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn features() -> StudentFeatures {
    StudentFeatures {
        gpa: 3.2,
        year: 3,
        cert_count: 2,
        project_score: 81.0,
        mentor_rating: 4.5,
        major: 1,
        joined_pitching: true,
        joined_marketing: false,
        joined_finance: true,
        joined_leadership: false,
        joined_networking: false,
    }
}

fn client(server: &MockServer) -> MlClient {
    MlClient::new(&MlConfig {
        base_url: server.uri(),
        timeout_secs: 5,
    })
    .unwrap()
}

#[tokio::test]
async fn predict_passes_the_model_answer_through() {
    let server = MockServer::start().await;
    let answer = json!({"Low": 0.1, "Medium": 0.3, "High": 0.6});
    Mock::given(method("POST"))
        .and(path("/predict"))
        .and(body_partial_json(json!({"gpa": 3.2, "joined_Pitching": true})))
        .respond_with(ResponseTemplate::new(200).set_body_json(&answer))
        .expect(1)
        .mount(&server)
        .await;

    let result = client(&server).predict(&features()).await.unwrap();
    assert_eq!(result, answer);
}

#[tokio::test]
async fn recommend_parses_the_model_answer() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/recommend_event"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "improvement_percentage": 12.5,
            "new_success_probability": 0.74,
            "recommended_event": "Leadership",
            "status": "success"
        })))
        .mount(&server)
        .await;

    let rec = client(&server).recommend(&features()).await.unwrap();
    assert_eq!(rec.recommended_event, "Leadership");
    assert!(rec.category().is_some());
}

#[tokio::test]
async fn server_error_becomes_http_status_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/predict"))
        .respond_with(ResponseTemplate::new(500).set_body_string("model not loaded"))
        .mount(&server)
        .await;

    let err = client(&server).predict(&features()).await.unwrap_err();
    assert_matches!(
        err,
        PredictionError::HttpStatus { status: 500, ref body } if body == "model not loaded"
    );
}

#[tokio::test]
async fn predict_endpoint_proxies_through_the_router() {
    let server = MockServer::start().await;
    let answer = json!({"Low": 0.2, "Medium": 0.5, "High": 0.3});
    Mock::given(method("POST"))
        .and(path("/predict"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&answer))
        .mount(&server)
        .await;

    let token = token_for(11, Role::Student);
    let response = post_json(
        build_offline_app(&server.uri()),
        "/api/v1/prediction/predict",
        Some(&token),
        serde_json::to_value(features()).unwrap(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, answer);
}

#[tokio::test]
async fn invalid_features_never_reach_the_model() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let mut bad = features();
    bad.gpa = 4.7;
    let token = token_for(11, Role::Student);
    let response = post_json(
        build_offline_app(&server.uri()),
        "/api/v1/prediction/predict",
        Some(&token),
        serde_json::to_value(bad).unwrap(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn unreachable_model_is_502() {
    let token = token_for(11, Role::Student);
    let response = post_json(
        build_offline_app("http://127.0.0.1:1"),
        "/api/v1/prediction/predict",
        Some(&token),
        serde_json::to_value(features()).unwrap(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    assert_eq!(body_json(response).await["code"], "UPSTREAM_UNAVAILABLE");
}
