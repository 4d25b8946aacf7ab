//! Domain logic for the university events platform.
//!
//! Everything in this crate is pure: no database, no HTTP. The `db` and
//! `api` crates load rows, call into these functions, and persist or render
//! the results.

pub mod certificate;
pub mod enrollment;
pub mod error;
pub mod event_status;
pub mod prediction;
pub mod profile;
pub mod project;
pub mod report;
pub mod roles;
pub mod types;
pub mod validation;
