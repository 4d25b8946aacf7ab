//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept `&PgPool` as the first argument.

pub mod certificate_repo;
pub mod enrollment_repo;
pub mod event_repo;
pub mod profile_repo;
pub mod project_repo;
pub mod report_repo;
pub mod user_repo;

pub use certificate_repo::CertificateRepo;
pub use enrollment_repo::EnrollmentRepo;
pub use event_repo::EventRepo;
pub use profile_repo::ProfileRepo;
pub use project_repo::ProjectRepo;
pub use report_repo::ReportRepo;
pub use user_repo::UserRepo;
