//! Integration tests for certificate issuance against a real database.
//!
//! Require `DATABASE_URL`; run with `cargo test -- --ignored`.

mod common;

use chrono::Utc;
use sqlx::PgPool;
use unievent_core::certificate::{AwardLevel, CertificateData};
use unievent_core::roles::Role;
use unievent_core::types::DbId;
use unievent_db::models::certificate::{CreateCertificateTemplate, NewCertificate};
use unievent_db::repositories::{CertificateRepo, EnrollmentRepo, EventRepo};

use common::{internal_event, next_week, user};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn template(title: &str, is_participant_template: bool) -> CreateCertificateTemplate {
    CreateCertificateTemplate {
        title: title.to_string(),
        subtitle: None,
        body_text: None,
        is_participant_template,
        layout_settings: serde_json::json!({}),
    }
}

fn certificate(student_id: DbId, number: &str, award_level: Option<AwardLevel>) -> NewCertificate {
    NewCertificate {
        student_id,
        certificate_number: number.to_string(),
        issue_date: Utc::now().date_naive(),
        award_level: award_level.map(|level| level.as_str().to_string()),
        certificate_data: CertificateData {
            student_name: format!("student {student_id}"),
            event_name: "Pitch Day".to_string(),
            body_text: "For taking part".to_string(),
            is_winner: award_level.is_some(),
            award_level,
        },
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
#[ignore = "requires DATABASE_URL"]
async fn issuing_a_second_participant_template_skips_existing_holders(pool: PgPool) {
    let organizer = user(&pool, "org@example.com", Role::Lecturer).await;
    let first = user(&pool, "a@example.com", Role::Student).await;
    let second = user(&pool, "b@example.com", Role::Student).await;
    let event = EventRepo::create(&pool, &internal_event(organizer, next_week(), 10))
        .await
        .unwrap();
    EnrollmentRepo::enroll(&pool, first, event.id).await.unwrap();
    EnrollmentRepo::enroll(&pool, second, event.id).await.unwrap();

    let (_, issued) = CertificateRepo::create_template_with_certificates(
        &pool,
        event.id,
        &template("Participation", true),
        &[
            certificate(first, "CERT-A-1", None),
            certificate(second, "CERT-B-1", None),
        ],
    )
    .await
    .unwrap();
    assert_eq!(issued, 2);

    let (again, issued) = CertificateRepo::create_template_with_certificates(
        &pool,
        event.id,
        &template("Participation (reissue)", true),
        &[
            certificate(first, "CERT-A-2", None),
            certificate(second, "CERT-B-2", None),
        ],
    )
    .await
    .unwrap();
    assert_eq!(issued, 0);
    assert_eq!(
        CertificateRepo::list_templates(&pool, event.id).await.unwrap().len(),
        2
    );
    assert!(again.is_participant_template);

    for student in [first, second] {
        let held = CertificateRepo::list_for_student(&pool, student).await.unwrap();
        assert_eq!(held.len(), 1, "student {student}");
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
#[ignore = "requires DATABASE_URL"]
async fn winner_certificate_is_issued_alongside_participation(pool: PgPool) {
    let organizer = user(&pool, "org@example.com", Role::Lecturer).await;
    let student = user(&pool, "a@example.com", Role::Student).await;
    let event = EventRepo::create(&pool, &internal_event(organizer, next_week(), 10))
        .await
        .unwrap();
    EnrollmentRepo::enroll(&pool, student, event.id).await.unwrap();

    CertificateRepo::create_template_with_certificates(
        &pool,
        event.id,
        &template("Participation", true),
        &[certificate(student, "CERT-P-1", None)],
    )
    .await
    .unwrap();

    let (_, issued) = CertificateRepo::create_template_with_certificates(
        &pool,
        event.id,
        &template("Champion", false),
        &[certificate(student, "CERT-W-1", Some(AwardLevel::Gold))],
    )
    .await
    .unwrap();
    assert_eq!(issued, 1);

    let (_, issued) = CertificateRepo::create_template_with_certificates(
        &pool,
        event.id,
        &template("Champion (reissue)", false),
        &[certificate(student, "CERT-W-2", Some(AwardLevel::Silver))],
    )
    .await
    .unwrap();
    assert_eq!(issued, 0);

    let held = CertificateRepo::list_for_student(&pool, student).await.unwrap();
    assert_eq!(held.len(), 2);
    assert_eq!(
        held.iter().filter(|c| c.award_level.as_deref() == Some("gold")).count(),
        1
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
#[ignore = "requires DATABASE_URL"]
async fn soft_deleted_certificate_can_be_reissued(pool: PgPool) {
    let organizer = user(&pool, "org@example.com", Role::Lecturer).await;
    let student = user(&pool, "a@example.com", Role::Student).await;
    let event = EventRepo::create(&pool, &internal_event(organizer, next_week(), 10))
        .await
        .unwrap();
    EnrollmentRepo::enroll(&pool, student, event.id).await.unwrap();

    CertificateRepo::create_template_with_certificates(
        &pool,
        event.id,
        &template("Participation", true),
        &[certificate(student, "CERT-P-1", None)],
    )
    .await
    .unwrap();
    sqlx::query("UPDATE certificates SET deleted_at = NOW() WHERE student_id = $1")
        .bind(student)
        .execute(&pool)
        .await
        .unwrap();

    let (_, issued) = CertificateRepo::create_template_with_certificates(
        &pool,
        event.id,
        &template("Participation", true),
        &[certificate(student, "CERT-P-2", None)],
    )
    .await
    .unwrap();
    assert_eq!(issued, 1);

    let held = CertificateRepo::list_for_student(&pool, student).await.unwrap();
    assert_eq!(held.len(), 1);
    assert_eq!(held[0].certificate_number, "CERT-P-2");
}
