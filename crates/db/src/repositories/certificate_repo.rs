//! Repository for `certificate_templates` and `certificates`.

use sqlx::types::Json;
use sqlx::PgPool;
use unievent_core::certificate::CERT_STATUS_ISSUED;
use unievent_core::types::DbId;

use crate::models::certificate::{
    Certificate, CertificateTemplate, CreateCertificateTemplate, NewCertificate,
};

const TEMPLATE_COLUMNS: &str = "id, event_id, title, subtitle, body_text, \
                                is_participant_template, layout_settings, created_at, updated_at";

const COLUMNS: &str = "id, event_id, student_id, template_id, certificate_number, status, \
                       issue_date, expiry_date, award_level, certificate_data, created_at, updated_at";

pub struct CertificateRepo;

impl CertificateRepo {
    /// Create a template and issue its certificates in one transaction.
    ///
    /// A student who already holds a live certificate of the same kind
    /// (participant or winner) for the event is skipped. The event row is
    /// locked so concurrent issues for one event serialize. Returns the
    /// template and how many rows were actually inserted.
    pub async fn create_template_with_certificates(
        pool: &PgPool,
        event_id: DbId,
        input: &CreateCertificateTemplate,
        certificates: &[NewCertificate],
    ) -> Result<(CertificateTemplate, u64), sqlx::Error> {
        let mut tx = pool.begin().await?;

        sqlx::query("SELECT id FROM events WHERE id = $1 FOR UPDATE")
            .bind(event_id)
            .fetch_optional(&mut *tx)
            .await?;

        let query = format!(
            "INSERT INTO certificate_templates
                (event_id, title, subtitle, body_text, is_participant_template, layout_settings)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {TEMPLATE_COLUMNS}"
        );
        let template = sqlx::query_as::<_, CertificateTemplate>(&query)
            .bind(event_id)
            .bind(&input.title)
            .bind(&input.subtitle)
            .bind(&input.body_text)
            .bind(input.is_participant_template)
            .bind(&input.layout_settings)
            .fetch_one(&mut *tx)
            .await?;

        let mut issued = 0u64;
        for cert in certificates {
            let result = sqlx::query(
                "INSERT INTO certificates (event_id, student_id, template_id,
                    certificate_number, status, issue_date, award_level, certificate_data)
                 SELECT $1, $2, $3, $4, $5, $6, $7, $8
                 WHERE NOT EXISTS (
                    SELECT 1 FROM certificates c
                    JOIN certificate_templates t ON t.id = c.template_id
                    WHERE c.event_id = $1
                      AND c.student_id = $2
                      AND c.deleted_at IS NULL
                      AND t.is_participant_template = $9
                 )",
            )
            .bind(event_id)
            .bind(cert.student_id)
            .bind(template.id)
            .bind(&cert.certificate_number)
            .bind(CERT_STATUS_ISSUED)
            .bind(cert.issue_date)
            .bind(&cert.award_level)
            .bind(Json(&cert.certificate_data))
            .bind(template.is_participant_template)
            .execute(&mut *tx)
            .await?;
            issued += result.rows_affected();
        }

        tx.commit().await?;
        tracing::info!(
            event_id,
            template_id = template.id,
            requested = certificates.len(),
            issued,
            "Certificates issued"
        );
        Ok((template, issued))
    }

    pub async fn list_templates(
        pool: &PgPool,
        event_id: DbId,
    ) -> Result<Vec<CertificateTemplate>, sqlx::Error> {
        let query = format!(
            "SELECT {TEMPLATE_COLUMNS} FROM certificate_templates
             WHERE event_id = $1 ORDER BY created_at, id"
        );
        sqlx::query_as::<_, CertificateTemplate>(&query)
            .bind(event_id)
            .fetch_all(pool)
            .await
    }

    pub async fn find_template(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<CertificateTemplate>, sqlx::Error> {
        let query = format!("SELECT {TEMPLATE_COLUMNS} FROM certificate_templates WHERE id = $1");
        sqlx::query_as::<_, CertificateTemplate>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a certificate that has not been soft-deleted.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Certificate>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM certificates WHERE id = $1 AND deleted_at IS NULL");
        sqlx::query_as::<_, Certificate>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// A student's certificates, newest first.
    pub async fn list_for_student(
        pool: &PgPool,
        student_id: DbId,
    ) -> Result<Vec<Certificate>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM certificates
             WHERE student_id = $1 AND deleted_at IS NULL
             ORDER BY issue_date DESC, id DESC"
        );
        sqlx::query_as::<_, Certificate>(&query)
            .bind(student_id)
            .fetch_all(pool)
            .await
    }
}
