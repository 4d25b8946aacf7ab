pub mod auth;
pub mod certificates;
pub mod dashboard;
pub mod enrollment;
pub mod events;
pub mod prediction;
pub mod profile;
pub mod projects;
pub mod reports;
