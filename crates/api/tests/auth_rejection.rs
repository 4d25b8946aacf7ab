//! Requests rejected by the auth and role extractors. None of these reach
//! the database.

mod common;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use common::{body_json, build_offline_app, get, get_authed, post_json, token_for};
use serde_json::json;
use tower::ServiceExt;
use unievent_api::auth::jwt::{generate_access_token, JwtConfig};
use unievent_core::roles::Role;

const NO_ML: &str = "http://127.0.0.1:1";

#[tokio::test]
async fn missing_token_is_401() {
    for uri in [
        "/api/v1/auth/me",
        "/api/v1/events",
        "/api/v1/projects",
        "/api/v1/profile",
        "/api/v1/reports",
        "/api/v1/certificates/mine",
    ] {
        let response = get(build_offline_app(NO_ML), uri).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "{uri}");
        let json = body_json(response).await;
        assert_eq!(json["code"], "UNAUTHORIZED");
    }
}

#[tokio::test]
async fn garbage_token_is_401() {
    let response = get_authed(build_offline_app(NO_ML), "/api/v1/events", "not.a.jwt").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn non_bearer_scheme_is_401() {
    let request = Request::builder()
        .uri("/api/v1/events")
        .header(header::AUTHORIZATION, "Basic dXNlcjpwYXNz")
        .body(Body::empty())
        .unwrap();
    let response = build_offline_app(NO_ML).oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn token_signed_with_another_secret_is_401() {
    let foreign = JwtConfig {
        secret: "someone-else".to_string(),
        access_token_expiry_mins: 5,
    };
    let token = generate_access_token(1, "admin", &foreign).unwrap();
    let response = get_authed(build_offline_app(NO_ML), "/api/v1/reports", &token).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn students_cannot_create_events() {
    let token = token_for(7, Role::Student);
    let response = post_json(
        build_offline_app(NO_ML),
        "/api/v1/events",
        Some(&token),
        json!({}),
    )
    .await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(body_json(response).await["code"], "FORBIDDEN");
}

#[tokio::test]
async fn lecturers_cannot_create_projects() {
    let token = token_for(3, Role::Lecturer);
    let response = post_json(
        build_offline_app(NO_ML),
        "/api/v1/projects",
        Some(&token),
        json!({}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn only_students_list_their_certificates() {
    let token = token_for(3, Role::University);
    let response = get_authed(
        build_offline_app(NO_ML),
        "/api/v1/certificates/mine",
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn lecturer_dashboard_is_lecturer_only() {
    let token = token_for(9, Role::Student);
    let response = get_authed(
        build_offline_app(NO_ML),
        "/api/v1/projects/lecturer-dashboard",
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}
