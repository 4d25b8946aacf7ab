//! Well-known role names and the closed [`Role`] enum.
//!
//! The names must match the `CHECK` constraint on `users.role` in
//! `20250425000001_create_users_table.sql`.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

pub const ROLE_STUDENT: &str = "student";
pub const ROLE_LECTURER: &str = "lecturer";
pub const ROLE_UNIVERSITY: &str = "university";
pub const ROLE_ADMIN: &str = "admin";

/// Roles that can be chosen at self-registration. Admins are seeded.
pub const REGISTRABLE_ROLES: &[&str] = &[ROLE_STUDENT, ROLE_LECTURER, ROLE_UNIVERSITY];

/// Account role. Every role-dependent branch matches on this exhaustively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Student,
    Lecturer,
    University,
    Admin,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Student => ROLE_STUDENT,
            Role::Lecturer => ROLE_LECTURER,
            Role::University => ROLE_UNIVERSITY,
            Role::Admin => ROLE_ADMIN,
        }
    }

    /// Parse a stored or token-carried role name.
    pub fn parse(value: &str) -> Result<Self, CoreError> {
        match value {
            ROLE_STUDENT => Ok(Role::Student),
            ROLE_LECTURER => Ok(Role::Lecturer),
            ROLE_UNIVERSITY => Ok(Role::University),
            ROLE_ADMIN => Ok(Role::Admin),
            other => Err(CoreError::Validation(format!(
                "Unknown role '{other}'. Must be one of: student, lecturer, university, admin"
            ))),
        }
    }

    /// Parse a role chosen on the registration form (admin excluded).
    pub fn parse_registrable(value: &str) -> Result<Self, CoreError> {
        if !REGISTRABLE_ROLES.contains(&value) {
            return Err(CoreError::Validation(format!(
                "Invalid role '{value}'. Must be one of: {}",
                REGISTRABLE_ROLES.join(", ")
            )));
        }
        Self::parse(value)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_round_trips_every_role() {
        for role in [Role::Student, Role::Lecturer, Role::University, Role::Admin] {
            assert_eq!(Role::parse(role.as_str()).unwrap(), role);
        }
    }

    #[test]
    fn unknown_role_is_rejected() {
        assert!(Role::parse("department_staff").is_err());
        assert!(Role::parse("").is_err());
    }

    #[test]
    fn admin_cannot_self_register() {
        let err = Role::parse_registrable("admin").unwrap_err();
        assert!(err.to_string().contains("Invalid role"));
        assert_eq!(Role::parse_registrable("lecturer").unwrap(), Role::Lecturer);
    }
}
