//! Repository for the role profile tables (`student_profiles`,
//! `lecturer_profiles`, `university_profiles`).

use sqlx::PgPool;
use unievent_core::roles::Role;
use unievent_core::types::DbId;

use crate::models::profile::{
    LecturerProfile, RoleProfile, StudentProfile, UniversityProfile, UpdateLecturerProfile,
    UpdateStudentProfile, UpdateUniversityProfile,
};

const STUDENT_COLUMNS: &str = "id, user_id, matric_no, year, level, gpa, contact_number, bio, \
                               faculty, university, major, expected_graduate, created_at, updated_at";

const LECTURER_COLUMNS: &str = "id, user_id, specialization, contact_number, bio, linkedin, \
                                university, faculty, created_at, updated_at";

const UNIVERSITY_COLUMNS: &str = "id, user_id, name, location, contact_email, website, \
                                  contact_number, bio, created_at, updated_at";

/// Table holding the profile rows for `role`. Admins have none.
fn table_for(role: Role) -> Option<&'static str> {
    match role {
        Role::Student => Some("student_profiles"),
        Role::Lecturer => Some("lecturer_profiles"),
        Role::University => Some("university_profiles"),
        Role::Admin => None,
    }
}

pub struct ProfileRepo;

impl ProfileRepo {
    /// Insert an empty profile row for the user's role.
    ///
    /// Idempotent: an existing row is left untouched.
    pub async fn create_empty(pool: &PgPool, user_id: DbId, role: Role) -> Result<(), sqlx::Error> {
        let Some(table) = table_for(role) else {
            return Ok(());
        };
        let query = format!(
            "INSERT INTO {table} (user_id) VALUES ($1) ON CONFLICT (user_id) DO NOTHING"
        );
        sqlx::query(&query).bind(user_id).execute(pool).await?;
        Ok(())
    }

    /// Load the user's profile. `None` when the row has not been created.
    pub async fn find(
        pool: &PgPool,
        user_id: DbId,
        role: Role,
    ) -> Result<Option<RoleProfile>, sqlx::Error> {
        let profile = match role {
            Role::Student => {
                let query =
                    format!("SELECT {STUDENT_COLUMNS} FROM student_profiles WHERE user_id = $1");
                sqlx::query_as::<_, StudentProfile>(&query)
                    .bind(user_id)
                    .fetch_optional(pool)
                    .await?
                    .map(RoleProfile::Student)
            }
            Role::Lecturer => {
                let query =
                    format!("SELECT {LECTURER_COLUMNS} FROM lecturer_profiles WHERE user_id = $1");
                sqlx::query_as::<_, LecturerProfile>(&query)
                    .bind(user_id)
                    .fetch_optional(pool)
                    .await?
                    .map(RoleProfile::Lecturer)
            }
            Role::University => {
                let query = format!(
                    "SELECT {UNIVERSITY_COLUMNS} FROM university_profiles WHERE user_id = $1"
                );
                sqlx::query_as::<_, UniversityProfile>(&query)
                    .bind(user_id)
                    .fetch_optional(pool)
                    .await?
                    .map(RoleProfile::University)
            }
            Role::Admin => Some(RoleProfile::Admin),
        };
        Ok(profile)
    }

    /// Load the user's profile, creating an empty one first if it is missing.
    ///
    /// Repairs accounts whose profile insert failed at registration.
    pub async fn ensure(
        pool: &PgPool,
        user_id: DbId,
        role: Role,
    ) -> Result<RoleProfile, sqlx::Error> {
        if let Some(profile) = Self::find(pool, user_id, role).await? {
            return Ok(profile);
        }
        tracing::warn!(user_id, role = %role, "Profile missing, creating an empty one");
        Self::create_empty(pool, user_id, role).await?;
        Self::find(pool, user_id, role)
            .await?
            .ok_or(sqlx::Error::RowNotFound)
    }

    pub async fn update_student(
        pool: &PgPool,
        user_id: DbId,
        input: &UpdateStudentProfile,
    ) -> Result<Option<StudentProfile>, sqlx::Error> {
        let query = format!(
            "UPDATE student_profiles SET
                matric_no = COALESCE($2, matric_no),
                year = COALESCE($3, year),
                level = COALESCE($4, level),
                gpa = COALESCE($5, gpa),
                contact_number = COALESCE($6, contact_number),
                bio = COALESCE($7, bio),
                faculty = COALESCE($8, faculty),
                university = COALESCE($9, university),
                major = COALESCE($10, major),
                expected_graduate = COALESCE($11, expected_graduate)
             WHERE user_id = $1
             RETURNING {STUDENT_COLUMNS}"
        );
        sqlx::query_as::<_, StudentProfile>(&query)
            .bind(user_id)
            .bind(&input.matric_no)
            .bind(input.year)
            .bind(&input.level)
            .bind(input.gpa)
            .bind(&input.contact_number)
            .bind(&input.bio)
            .bind(&input.faculty)
            .bind(&input.university)
            .bind(&input.major)
            .bind(input.expected_graduate)
            .fetch_optional(pool)
            .await
    }

    pub async fn update_lecturer(
        pool: &PgPool,
        user_id: DbId,
        input: &UpdateLecturerProfile,
    ) -> Result<Option<LecturerProfile>, sqlx::Error> {
        let query = format!(
            "UPDATE lecturer_profiles SET
                specialization = COALESCE($2, specialization),
                contact_number = COALESCE($3, contact_number),
                bio = COALESCE($4, bio),
                linkedin = COALESCE($5, linkedin),
                university = COALESCE($6, university),
                faculty = COALESCE($7, faculty)
             WHERE user_id = $1
             RETURNING {LECTURER_COLUMNS}"
        );
        sqlx::query_as::<_, LecturerProfile>(&query)
            .bind(user_id)
            .bind(&input.specialization)
            .bind(&input.contact_number)
            .bind(&input.bio)
            .bind(&input.linkedin)
            .bind(&input.university)
            .bind(&input.faculty)
            .fetch_optional(pool)
            .await
    }

    pub async fn update_university(
        pool: &PgPool,
        user_id: DbId,
        input: &UpdateUniversityProfile,
    ) -> Result<Option<UniversityProfile>, sqlx::Error> {
        let query = format!(
            "UPDATE university_profiles SET
                name = COALESCE($2, name),
                location = COALESCE($3, location),
                contact_email = COALESCE($4, contact_email),
                website = COALESCE($5, website),
                contact_number = COALESCE($6, contact_number),
                bio = COALESCE($7, bio)
             WHERE user_id = $1
             RETURNING {UNIVERSITY_COLUMNS}"
        );
        sqlx::query_as::<_, UniversityProfile>(&query)
            .bind(user_id)
            .bind(&input.name)
            .bind(&input.location)
            .bind(&input.contact_email)
            .bind(&input.website)
            .bind(&input.contact_number)
            .bind(&input.bio)
            .fetch_optional(pool)
            .await
    }
}
