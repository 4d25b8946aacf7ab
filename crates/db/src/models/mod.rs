//! Row structs and DTOs.
//!
//! Each submodule holds a `FromRow` entity matching its table plus the
//! `Deserialize` create/update DTOs the repositories accept.

pub mod certificate;
pub mod enrollment;
pub mod event;
pub mod profile;
pub mod project;
pub mod user;
