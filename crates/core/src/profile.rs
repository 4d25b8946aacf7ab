//! Role profile completeness.
//!
//! Every non-admin account owns exactly one role-specific profile row. The
//! dashboard nags users whose profile lacks the fields their role requires.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::roles::Role;

/// Placeholder some clients write into fields the user has not filled in.
pub const NOT_SET: &str = "Not Set";

pub const STUDENT_REQUIRED_FIELDS: [&str; 3] = ["matric_no", "faculty", "university"];
pub const LECTURER_REQUIRED_FIELDS: [&str; 3] = ["specialization", "faculty", "university"];
pub const UNIVERSITY_REQUIRED_FIELDS: [&str; 3] = ["name", "location", "contact_email"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StudentLevel {
    Undergraduate,
    Postgraduate,
}

impl StudentLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            StudentLevel::Undergraduate => "Undergraduate",
            StudentLevel::Postgraduate => "Postgraduate",
        }
    }

    pub fn parse(value: &str) -> Result<Self, CoreError> {
        match value {
            "Undergraduate" => Ok(StudentLevel::Undergraduate),
            "Postgraduate" => Ok(StudentLevel::Postgraduate),
            other => Err(CoreError::Validation(format!(
                "Invalid level '{other}'. Must be Undergraduate or Postgraduate"
            ))),
        }
    }
}

/// The required fields of a profile, borrowed from whatever row holds them.
#[derive(Debug, Clone, Copy)]
pub enum ProfileView<'a> {
    Student {
        matric_no: Option<&'a str>,
        faculty: Option<&'a str>,
        university: Option<&'a str>,
    },
    Lecturer {
        specialization: Option<&'a str>,
        faculty: Option<&'a str>,
        university: Option<&'a str>,
    },
    University {
        name: Option<&'a str>,
        location: Option<&'a str>,
        contact_email: Option<&'a str>,
    },
    Admin,
}

impl ProfileView<'_> {
    pub fn role(&self) -> Role {
        match self {
            ProfileView::Student { .. } => Role::Student,
            ProfileView::Lecturer { .. } => Role::Lecturer,
            ProfileView::University { .. } => Role::University,
            ProfileView::Admin => Role::Admin,
        }
    }
}

/// Empty, whitespace-only and the `"Not Set"` placeholder all count as unset.
pub fn is_unset(value: Option<&str>) -> bool {
    match value.map(str::trim) {
        None => true,
        Some(v) => v.is_empty() || v == NOT_SET,
    }
}

/// Names of required fields that are still unset.
pub fn missing_fields(view: &ProfileView<'_>) -> Vec<&'static str> {
    let values: [Option<&str>; 3] = match *view {
        ProfileView::Student {
            matric_no,
            faculty,
            university,
        } => [matric_no, faculty, university],
        ProfileView::Lecturer {
            specialization,
            faculty,
            university,
        } => [specialization, faculty, university],
        ProfileView::University {
            name,
            location,
            contact_email,
        } => [name, location, contact_email],
        ProfileView::Admin => return Vec::new(),
    };

    required_fields(view.role())
        .iter()
        .zip(values)
        .filter(|(_, value)| is_unset(*value))
        .map(|(field, _)| *field)
        .collect()
}

pub fn required_fields(role: Role) -> &'static [&'static str] {
    match role {
        Role::Student => &STUDENT_REQUIRED_FIELDS,
        Role::Lecturer => &LECTURER_REQUIRED_FIELDS,
        Role::University => &UNIVERSITY_REQUIRED_FIELDS,
        Role::Admin => &[],
    }
}

/// Whether the dashboard should ask the user to complete their profile.
///
/// `None` means the profile row does not exist yet, which only counts as
/// incomplete for roles that need one.
pub fn profile_incomplete(role: Role, view: Option<&ProfileView<'_>>) -> bool {
    match (role, view) {
        (Role::Admin, _) => false,
        (_, None) => true,
        (_, Some(view)) => !missing_fields(view).is_empty(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn complete_student_profile() {
        let view = ProfileView::Student {
            matric_no: Some("CB21001"),
            faculty: Some("Computing"),
            university: Some("UMP"),
        };
        assert!(!profile_incomplete(Role::Student, Some(&view)));
    }

    #[test]
    fn not_set_counts_as_missing() {
        let view = ProfileView::Lecturer {
            specialization: Some("Not Set"),
            faculty: Some("  "),
            university: Some("UMP"),
        };
        assert_eq!(missing_fields(&view), vec!["specialization", "faculty"]);
        assert!(profile_incomplete(Role::Lecturer, Some(&view)));
    }

    #[test]
    fn missing_row_is_incomplete_except_for_admins() {
        assert!(profile_incomplete(Role::University, None));
        assert!(!profile_incomplete(Role::Admin, None));
    }

    #[test]
    fn university_fields() {
        let view = ProfileView::University {
            name: Some("UMP"),
            location: None,
            contact_email: Some("info@ump.edu.my"),
        };
        assert_eq!(missing_fields(&view), vec!["location"]);
    }

    #[test]
    fn level_parse() {
        assert_eq!(
            StudentLevel::parse("Postgraduate").unwrap(),
            StudentLevel::Postgraduate
        );
        assert!(StudentLevel::parse("PhD").is_err());
    }
}
