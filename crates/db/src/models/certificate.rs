//! Certificate template and issued certificate models.

use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use unievent_core::certificate::{CertificateData, CertificateStatus};
use unievent_core::error::CoreError;
use unievent_core::types::{Date, DbId, Timestamp};

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CertificateTemplate {
    pub id: DbId,
    pub event_id: DbId,
    pub title: String,
    pub subtitle: Option<String>,
    pub body_text: Option<String>,
    pub is_participant_template: bool,
    pub layout_settings: serde_json::Value,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateCertificateTemplate {
    pub title: String,
    pub subtitle: Option<String>,
    pub body_text: Option<String>,
    pub is_participant_template: bool,
    #[serde(default)]
    pub layout_settings: serde_json::Value,
}

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Certificate {
    pub id: DbId,
    pub event_id: DbId,
    pub student_id: DbId,
    pub template_id: DbId,
    pub certificate_number: String,
    pub status: String,
    pub issue_date: Date,
    pub expiry_date: Option<Date>,
    pub award_level: Option<String>,
    pub certificate_data: Json<CertificateData>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Certificate {
    pub fn status(&self) -> Result<CertificateStatus, CoreError> {
        CertificateStatus::parse(&self.status)
    }
}

/// A certificate to insert. The repository skips students who already hold
/// a certificate of the same kind for the event.
#[derive(Debug, Clone)]
pub struct NewCertificate {
    pub student_id: DbId,
    pub certificate_number: String,
    pub issue_date: Date,
    pub award_level: Option<String>,
    pub certificate_data: CertificateData,
}
