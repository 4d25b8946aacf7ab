//! Authentication and authorization extractors.
//!
//! - [`auth::AuthUser`] -- the caller, from a JWT Bearer token.
//! - [`rbac`] -- per-role wrappers that reject other roles with 403.

pub mod auth;
pub mod rbac;
