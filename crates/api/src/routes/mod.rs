pub mod auth;
pub mod certificates;
pub mod dashboard;
pub mod events;
pub mod health;
pub mod prediction;
pub mod profile;
pub mod projects;
pub mod reports;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/register                                   register (public)
/// /auth/login                                      login (public)
/// /auth/me                                         current user
///
/// /events                                          list, create (organizers)
/// /events/mine                                     organized + enrolled
/// /events/stats                                    dashboard counts
/// /events/{id}                                     get, update (creator)
/// /events/{id}/participants                        enrolled users (creator, admin)
/// /events/{id}/enrollment                          enroll (POST), unenroll (DELETE)
/// /events/{id}/certificate-templates               issue (POST), list (GET)
///
/// /certificates/mine                               caller's certificates (students)
/// /certificates/{id}/document                      render hand-off (owner)
///
/// /projects                                        list (role-scoped), create (students)
/// /projects/supervisors                            lecturers to pick from
/// /projects/lecturer-dashboard                     supervised projects + stats
/// /projects/{id}                                   get, update, delete
/// /projects/{id}/updates                           record progress (POST)
/// /projects/{id}/analytics                         progress analytics
///
/// /profile                                         get, update (PATCH)
/// /dashboard                                       profile completeness
/// /reports                                         admin or university report
///
/// /prediction/predict                              success probabilities
/// /prediction/recommend                            recommended category + events
/// ```
///
/// Everything except registration and login requires a bearer token.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/events", events::router())
        .nest("/certificates", certificates::router())
        .nest("/projects", projects::router())
        .nest("/profile", profile::router())
        .nest("/dashboard", dashboard::router())
        .nest("/reports", reports::router())
        .nest("/prediction", prediction::router())
}
