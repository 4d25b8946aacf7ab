//! Certificate templates, batch issuance, and certificate documents.

use std::collections::HashMap;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use unievent_core::certificate::{
    generate_certificate_number, is_valid, plan_recipients, CertificateData, CertificateDocument,
    Recipient, WinnerSelection,
};
use unievent_core::error::CoreError;
use unievent_core::roles::Role;
use unievent_core::types::{DbId, Timestamp};
use unievent_core::validation::require_non_blank;
use unievent_db::models::certificate::{
    Certificate, CertificateTemplate, CreateCertificateTemplate, NewCertificate,
};
use unievent_db::models::enrollment::EnrolledUser;
use unievent_db::models::event::Event;
use unievent_db::repositories::{CertificateRepo, EnrollmentRepo};

use crate::error::{AppError, AppResult};
use crate::handlers::events::find_event;
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireStudent;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct IssueCertificatesRequest {
    #[serde(flatten)]
    pub template: CreateCertificateTemplate,
    /// Winners and their award levels. Ignored for participant templates.
    #[serde(default)]
    pub winners: Vec<WinnerSelection>,
}

#[derive(Debug, Serialize)]
pub struct IssueCertificatesResponse {
    pub template: CertificateTemplate,
    pub recipients: usize,
    /// Rows actually inserted; recipients already holding a certificate
    /// of the same kind for this event are skipped.
    pub issued: u64,
}

#[derive(Debug, Serialize)]
pub struct CertificateView {
    #[serde(flatten)]
    pub certificate: Certificate,
    pub is_valid: bool,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/events/{id}/certificate-templates
///
/// Creates a template and issues its certificates. Participant templates go
/// to every enrolled student; winner templates go to the listed students.
/// Issuing again skips students who already hold that kind of certificate
/// for the event.
pub async fn issue(
    State(state): State<AppState>,
    user: AuthUser,
    Path(event_id): Path<DbId>,
    Json(input): Json<IssueCertificatesRequest>,
) -> AppResult<(StatusCode, Json<IssueCertificatesResponse>)> {
    require_non_blank("title", &input.template.title)?;
    let event = find_event(&state, event_id).await?;
    if event.creator_id != user.user_id {
        return Err(AppError::Core(CoreError::Forbidden(
            "Only the event creator can issue certificates".into(),
        )));
    }

    let students: Vec<EnrolledUser> = EnrollmentRepo::list_users(&state.pool, event_id)
        .await?
        .into_iter()
        .filter(|u| u.role == Role::Student.as_str())
        .collect();
    let student_ids: Vec<DbId> = students.iter().map(|s| s.user_id).collect();

    let recipients = plan_recipients(
        input.template.is_participant_template,
        &student_ids,
        &input.winners,
    )?;

    let names: HashMap<DbId, &str> = students
        .iter()
        .map(|s| (s.user_id, s.name.as_str()))
        .collect();
    let certificates = build_certificates(
        &event,
        &input.template,
        &recipients,
        &names,
        Utc::now(),
    );

    let (template, issued) = CertificateRepo::create_template_with_certificates(
        &state.pool,
        event_id,
        &input.template,
        &certificates,
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(IssueCertificatesResponse {
            template,
            recipients: recipients.len(),
            issued,
        }),
    ))
}

/// GET /api/v1/events/{id}/certificate-templates
pub async fn list_templates(
    State(state): State<AppState>,
    user: AuthUser,
    Path(event_id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<CertificateTemplate>>>> {
    let event = find_event(&state, event_id).await?;
    if event.creator_id != user.user_id && !user.is(Role::Admin) {
        return Err(AppError::Core(CoreError::Forbidden(
            "Only the event creator can view its templates".into(),
        )));
    }
    let data = CertificateRepo::list_templates(&state.pool, event_id).await?;
    Ok(Json(DataResponse { data }))
}

/// GET /api/v1/certificates/mine
pub async fn mine(
    State(state): State<AppState>,
    RequireStudent(user): RequireStudent,
) -> AppResult<Json<DataResponse<Vec<CertificateView>>>> {
    let now = Utc::now();
    let data = CertificateRepo::list_for_student(&state.pool, user.user_id)
        .await?
        .into_iter()
        .map(|certificate| {
            let valid = is_valid(certificate.status()?, certificate.expiry_date, now);
            Ok(CertificateView {
                certificate,
                is_valid: valid,
            })
        })
        .collect::<Result<Vec<_>, CoreError>>()?;
    Ok(Json(DataResponse { data }))
}

/// GET /api/v1/certificates/{id}/document
///
/// Everything a renderer needs to draw the certificate. Only the
/// recipient may fetch it.
pub async fn document(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<CertificateDocument>> {
    let certificate = CertificateRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Certificate",
            id,
        }))?;
    if certificate.student_id != user.user_id {
        return Err(AppError::Core(CoreError::Forbidden(
            "You can only download your own certificates".into(),
        )));
    }

    let template = CertificateRepo::find_template(&state.pool, certificate.template_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "CertificateTemplate",
            id: certificate.template_id,
        }))?;

    tracing::info!(certificate_id = id, user_id = user.user_id, "Certificate document requested");
    Ok(Json(CertificateDocument::new(
        certificate.certificate_number,
        template.title,
        template.subtitle,
        certificate.certificate_data.0,
        certificate.issue_date,
        template.layout_settings,
    )))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn build_certificates(
    event: &Event,
    template: &CreateCertificateTemplate,
    recipients: &[Recipient],
    names: &HashMap<DbId, &str>,
    now: Timestamp,
) -> Vec<NewCertificate> {
    recipients
        .iter()
        .map(|r| NewCertificate {
            student_id: r.student_id,
            certificate_number: generate_certificate_number(event.id, now),
            issue_date: now.date_naive(),
            award_level: r.award_level.map(|a| a.as_str().to_string()),
            certificate_data: CertificateData {
                student_name: names.get(&r.student_id).copied().unwrap_or_default().to_string(),
                event_name: event.title.clone(),
                body_text: template.body_text.clone().unwrap_or_default(),
                is_winner: !template.is_participant_template,
                award_level: r.award_level,
            },
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveTime, TimeZone};
    use unievent_core::certificate::AwardLevel;

    use super::*;

    fn event() -> Event {
        let created = Utc.with_ymd_and_hms(2025, 4, 1, 8, 0, 0).unwrap();
        Event {
            id: 12,
            title: "Pitch Day".into(),
            description: "Startup pitches".into(),
            event_date: created.date_naive(),
            event_time: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            location: "Main Hall".into(),
            max_participants: Some(50),
            status: "Completed".into(),
            event_type: "Competition".into(),
            category: "Pitching".into(),
            is_external: false,
            registration_url: None,
            organizer_name: None,
            organizer_website: None,
            creator_id: 1,
            enrolled_count: 2,
            created_at: created,
            updated_at: created,
        }
    }

    fn template(is_participant_template: bool) -> CreateCertificateTemplate {
        CreateCertificateTemplate {
            title: "Certificate of Achievement".into(),
            subtitle: None,
            body_text: Some("For outstanding work".into()),
            is_participant_template,
            layout_settings: serde_json::Value::Null,
        }
    }

    #[test]
    fn winner_certificates_carry_award_and_names() {
        let now = Utc.with_ymd_and_hms(2025, 5, 2, 10, 30, 0).unwrap();
        let names = HashMap::from([(5, "Aina"), (6, "Ravi")]);
        let recipients = [Recipient {
            student_id: 6,
            award_level: Some(AwardLevel::Gold),
        }];

        let certs = build_certificates(&event(), &template(false), &recipients, &names, now);

        assert_eq!(certs.len(), 1);
        let cert = &certs[0];
        assert_eq!(cert.student_id, 6);
        assert_eq!(cert.award_level.as_deref(), Some("gold"));
        assert_eq!(cert.certificate_data.student_name, "Ravi");
        assert_eq!(cert.certificate_data.event_name, "Pitch Day");
        assert!(cert.certificate_data.is_winner);
        assert!(cert.certificate_number.starts_with("CERT-12-20250502103000-"));
    }

    #[test]
    fn participant_certificates_are_not_winners() {
        let now = Utc.with_ymd_and_hms(2025, 5, 2, 10, 30, 0).unwrap();
        let names = HashMap::from([(5, "Aina")]);
        let recipients = [Recipient {
            student_id: 5,
            award_level: None,
        }];

        let certs = build_certificates(&event(), &template(true), &recipients, &names, now);
        assert!(!certs[0].certificate_data.is_winner);
        assert_eq!(certs[0].award_level, None);
        assert_eq!(certs[0].certificate_data.body_text, "For outstanding work");
    }
}
