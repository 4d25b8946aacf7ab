//! Role-specific profile rows and the [`RoleProfile`] enum that wraps them.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use unievent_core::profile::ProfileView;
use unievent_core::roles::Role;
use unievent_core::types::{DbId, Timestamp};

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct StudentProfile {
    pub id: DbId,
    pub user_id: DbId,
    pub matric_no: Option<String>,
    pub year: Option<i32>,
    pub level: Option<String>,
    pub gpa: Option<f64>,
    pub contact_number: Option<String>,
    pub bio: Option<String>,
    pub faculty: Option<String>,
    pub university: Option<String>,
    pub major: Option<String>,
    pub expected_graduate: Option<i32>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct LecturerProfile {
    pub id: DbId,
    pub user_id: DbId,
    pub specialization: Option<String>,
    pub contact_number: Option<String>,
    pub bio: Option<String>,
    pub linkedin: Option<String>,
    pub university: Option<String>,
    pub faculty: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct UniversityProfile {
    pub id: DbId,
    pub user_id: DbId,
    pub name: Option<String>,
    pub location: Option<String>,
    pub contact_email: Option<String>,
    pub website: Option<String>,
    pub contact_number: Option<String>,
    pub bio: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// The profile belonging to a user, one variant per role.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "role", content = "profile", rename_all = "lowercase")]
pub enum RoleProfile {
    Student(StudentProfile),
    Lecturer(LecturerProfile),
    University(UniversityProfile),
    Admin,
}

impl RoleProfile {
    pub fn role(&self) -> Role {
        match self {
            RoleProfile::Student(_) => Role::Student,
            RoleProfile::Lecturer(_) => Role::Lecturer,
            RoleProfile::University(_) => Role::University,
            RoleProfile::Admin => Role::Admin,
        }
    }

    /// The fields completeness checks look at.
    pub fn view(&self) -> ProfileView<'_> {
        match self {
            RoleProfile::Student(p) => ProfileView::Student {
                matric_no: p.matric_no.as_deref(),
                faculty: p.faculty.as_deref(),
                university: p.university.as_deref(),
            },
            RoleProfile::Lecturer(p) => ProfileView::Lecturer {
                specialization: p.specialization.as_deref(),
                faculty: p.faculty.as_deref(),
                university: p.university.as_deref(),
            },
            RoleProfile::University(p) => ProfileView::University {
                name: p.name.as_deref(),
                location: p.location.as_deref(),
                contact_email: p.contact_email.as_deref(),
            },
            RoleProfile::Admin => ProfileView::Admin,
        }
    }

    /// The university this profile is affiliated with, if filled in.
    pub fn university_name(&self) -> Option<&str> {
        match self {
            RoleProfile::Student(p) => p.university.as_deref(),
            RoleProfile::Lecturer(p) => p.university.as_deref(),
            RoleProfile::University(p) => p.name.as_deref(),
            RoleProfile::Admin => None,
        }
    }
}

/// Patch for a student profile. `None` leaves the column unchanged.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateStudentProfile {
    pub matric_no: Option<String>,
    pub year: Option<i32>,
    pub level: Option<String>,
    pub gpa: Option<f64>,
    pub contact_number: Option<String>,
    pub bio: Option<String>,
    pub faculty: Option<String>,
    pub university: Option<String>,
    pub major: Option<String>,
    pub expected_graduate: Option<i32>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateLecturerProfile {
    pub specialization: Option<String>,
    pub contact_number: Option<String>,
    pub bio: Option<String>,
    pub linkedin: Option<String>,
    pub university: Option<String>,
    pub faculty: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateUniversityProfile {
    pub name: Option<String>,
    pub location: Option<String>,
    pub contact_email: Option<String>,
    pub website: Option<String>,
    pub contact_number: Option<String>,
    pub bio: Option<String>,
}
