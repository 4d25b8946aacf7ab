//! HTTP service for the university events platform.
//!
//! Exposes config, state, error handling and routes as a library so the
//! binary entrypoint and the integration tests build the same router.

pub mod auth;
pub mod background;
pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod ml;
pub mod query;
pub mod response;
pub mod router;
pub mod routes;
pub mod state;
