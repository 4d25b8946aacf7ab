//! Read-only aggregate queries feeding the dashboard reports.

use sqlx::PgPool;
use unievent_core::report::{AdminSnapshot, UniversitySnapshot};
use unievent_core::roles::{ROLE_STUDENT, ROLE_UNIVERSITY};

/// Label used for grouping rows whose value is missing.
const UNSPECIFIED: &str = "Unspecified";

pub struct ReportRepo;

impl ReportRepo {
    /// Counts for the system-wide report. Monthly rows cover `year`.
    pub async fn admin_snapshot(pool: &PgPool, year: i32) -> Result<AdminSnapshot, sqlx::Error> {
        let (total_users, total_students, total_universities): (i64, i64, i64) = sqlx::query_as(
            "SELECT COUNT(*),
                    COUNT(*) FILTER (WHERE role = $1),
                    COUNT(*) FILTER (WHERE role = $2)
             FROM users",
        )
        .bind(ROLE_STUDENT)
        .bind(ROLE_UNIVERSITY)
        .fetch_one(pool)
        .await?;

        let (total_events,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM events")
            .fetch_one(pool)
            .await?;

        let (total_certificates,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM certificates WHERE deleted_at IS NULL")
                .fetch_one(pool)
                .await?;

        let participation_by_month: Vec<(i32, i64)> = sqlx::query_as(
            "SELECT EXTRACT(MONTH FROM created_at)::INT, COUNT(*)
             FROM enrollments
             WHERE EXTRACT(YEAR FROM created_at)::INT = $1
             GROUP BY 1",
        )
        .bind(year)
        .fetch_all(pool)
        .await?;

        let students_by_university = Self::student_profile_groups(pool, "university").await?;
        let students_by_level = Self::student_profile_groups(pool, "level").await?;

        Ok(AdminSnapshot {
            total_users,
            total_students,
            total_universities,
            total_events,
            total_certificates,
            participation_by_month,
            students_by_university,
            students_by_level,
        })
    }

    /// Counts for one university, matched on the students' profile field.
    pub async fn university_snapshot(
        pool: &PgPool,
        university: &str,
        year: i32,
    ) -> Result<UniversitySnapshot, sqlx::Error> {
        let (total_students,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM student_profiles WHERE university = $1")
                .bind(university)
                .fetch_one(pool)
                .await?;

        let (active_students, total_events): (i64, i64) = sqlx::query_as(
            "SELECT COUNT(DISTINCT x.user_id), COUNT(DISTINCT x.event_id)
             FROM enrollments x
             JOIN student_profiles sp ON sp.user_id = x.user_id
             WHERE sp.university = $1",
        )
        .bind(university)
        .fetch_one(pool)
        .await?;

        let (certificates_awarded,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*)
             FROM certificates c
             JOIN student_profiles sp ON sp.user_id = c.student_id
             WHERE sp.university = $1 AND c.deleted_at IS NULL",
        )
        .bind(university)
        .fetch_one(pool)
        .await?;

        let students_by_faculty: Vec<(String, i64)> = sqlx::query_as(
            "SELECT COALESCE(NULLIF(faculty, ''), $2), COUNT(*)
             FROM student_profiles
             WHERE university = $1
             GROUP BY 1",
        )
        .bind(university)
        .bind(UNSPECIFIED)
        .fetch_all(pool)
        .await?;

        let enrollments_by_month: Vec<(i32, i64)> = sqlx::query_as(
            "SELECT EXTRACT(MONTH FROM x.created_at)::INT, COUNT(*)
             FROM enrollments x
             JOIN student_profiles sp ON sp.user_id = x.user_id
             WHERE sp.university = $1 AND EXTRACT(YEAR FROM x.created_at)::INT = $2
             GROUP BY 1",
        )
        .bind(university)
        .bind(year)
        .fetch_all(pool)
        .await?;

        Ok(UniversitySnapshot {
            total_students,
            active_students,
            total_events,
            certificates_awarded,
            students_by_faculty,
            enrollments_by_month,
        })
    }

    /// Student counts grouped by a `student_profiles` text column.
    ///
    /// `column` is always a literal from this module, never user input.
    async fn student_profile_groups(
        pool: &PgPool,
        column: &'static str,
    ) -> Result<Vec<(String, i64)>, sqlx::Error> {
        let query = format!(
            "SELECT COALESCE(NULLIF({column}, ''), $1), COUNT(*)
             FROM student_profiles
             GROUP BY 1"
        );
        sqlx::query_as(&query).bind(UNSPECIFIED).fetch_all(pool).await
    }
}
