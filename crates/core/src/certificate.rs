//! Certificate numbering, validity, recipient planning and the document
//! shape handed to a renderer.

use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::{Date, DbId, Timestamp};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

pub const CERTIFICATE_PREFIX: &str = "CERT";

/// Random alphanumeric characters appended to every certificate number.
pub const RANDOM_SUFFIX_LENGTH: usize = 6;

/// `chrono` format for the timestamp segment of a certificate number.
const NUMBER_TIMESTAMP_FORMAT: &str = "%Y%m%d%H%M%S";

/// `chrono` format for the issue date printed on a certificate.
pub const ISSUE_DATE_FORMAT: &str = "%d/%m/%Y";

pub const CERT_STATUS_ISSUED: &str = "issued";
pub const CERT_STATUS_REVOKED: &str = "revoked";

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CertificateStatus {
    Issued,
    Revoked,
}

impl CertificateStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            CertificateStatus::Issued => CERT_STATUS_ISSUED,
            CertificateStatus::Revoked => CERT_STATUS_REVOKED,
        }
    }

    pub fn parse(value: &str) -> Result<Self, CoreError> {
        match value {
            CERT_STATUS_ISSUED => Ok(CertificateStatus::Issued),
            CERT_STATUS_REVOKED => Ok(CertificateStatus::Revoked),
            other => Err(CoreError::Validation(format!(
                "Invalid certificate status '{other}'"
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AwardLevel {
    Gold,
    Silver,
    Bronze,
}

impl AwardLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            AwardLevel::Gold => "gold",
            AwardLevel::Silver => "silver",
            AwardLevel::Bronze => "bronze",
        }
    }

    pub fn parse(value: &str) -> Result<Self, CoreError> {
        match value {
            "gold" => Ok(AwardLevel::Gold),
            "silver" => Ok(AwardLevel::Silver),
            "bronze" => Ok(AwardLevel::Bronze),
            other => Err(CoreError::Validation(format!(
                "Invalid award level '{other}'. Must be one of: gold, silver, bronze"
            ))),
        }
    }
}

impl fmt::Display for AwardLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Numbering and validity
// ---------------------------------------------------------------------------

/// Build a certificate number: `CERT-{EVENT}-{YYYYMMDDHHMMSS}-{RANDOM}`.
///
/// The whole string is uppercased. The `certificates.certificate_number`
/// unique constraint backs this up if two numbers ever collide.
pub fn generate_certificate_number(event_id: DbId, now: Timestamp) -> String {
    let suffix: String = rand::rng()
        .sample_iter(&rand::distr::Alphanumeric)
        .take(RANDOM_SUFFIX_LENGTH)
        .map(char::from)
        .collect();

    format!(
        "{CERTIFICATE_PREFIX}-{event_id}-{}-{suffix}",
        now.format(NUMBER_TIMESTAMP_FORMAT)
    )
    .to_uppercase()
}

/// A certificate is valid while issued and not past its expiry date.
pub fn is_valid(status: CertificateStatus, expiry_date: Option<Date>, now: Timestamp) -> bool {
    if status != CertificateStatus::Issued {
        return false;
    }
    match expiry_date {
        Some(expiry) => now.date_naive() <= expiry,
        None => true,
    }
}

// ---------------------------------------------------------------------------
// Recipients
// ---------------------------------------------------------------------------

/// A student selected as a winner, with an optional award level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct WinnerSelection {
    pub student_id: DbId,
    pub award_level: Option<AwardLevel>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Recipient {
    pub student_id: DbId,
    pub award_level: Option<AwardLevel>,
}

/// Work out who receives a certificate from a template.
///
/// Participant templates go to every enrolled student. Winner templates go
/// to the selected students, each of whom must be enrolled. Recipients are
/// de-duplicated keeping the first occurrence.
pub fn plan_recipients(
    is_participant_template: bool,
    enrolled_students: &[DbId],
    winners: &[WinnerSelection],
) -> Result<Vec<Recipient>, CoreError> {
    let mut recipients: Vec<Recipient> = Vec::new();

    if is_participant_template {
        for &student_id in enrolled_students {
            if !recipients.iter().any(|r| r.student_id == student_id) {
                recipients.push(Recipient {
                    student_id,
                    award_level: None,
                });
            }
        }
        return Ok(recipients);
    }

    if winners.is_empty() {
        return Err(CoreError::Validation(
            "Select at least one winner for a winner certificate".to_string(),
        ));
    }

    for winner in winners {
        if !enrolled_students.contains(&winner.student_id) {
            return Err(CoreError::Validation(format!(
                "Student {} is not enrolled in this event",
                winner.student_id
            )));
        }
        if !recipients.iter().any(|r| r.student_id == winner.student_id) {
            recipients.push(Recipient {
                student_id: winner.student_id,
                award_level: winner.award_level,
            });
        }
    }
    Ok(recipients)
}

// ---------------------------------------------------------------------------
// Stored snapshot and rendered document
// ---------------------------------------------------------------------------

/// JSON snapshot stored on the certificate row at issue time, so later
/// edits to the user or event do not change an issued certificate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CertificateData {
    pub student_name: String,
    pub event_name: String,
    pub body_text: String,
    pub is_winner: bool,
    pub award_level: Option<AwardLevel>,
}

/// Everything a renderer needs to draw a certificate.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CertificateDocument {
    pub certificate_number: String,
    pub title: String,
    pub subtitle: Option<String>,
    pub recipient_name: String,
    pub event_name: String,
    pub body_text: String,
    pub award_level: Option<AwardLevel>,
    pub issue_date: String,
    pub layout_settings: serde_json::Value,
}

impl CertificateDocument {
    pub fn new(
        certificate_number: String,
        title: String,
        subtitle: Option<String>,
        data: CertificateData,
        issue_date: Date,
        layout_settings: serde_json::Value,
    ) -> Self {
        Self {
            certificate_number,
            title,
            subtitle,
            recipient_name: data.student_name,
            event_name: data.event_name,
            body_text: data.body_text,
            award_level: data.award_level,
            issue_date: issue_date.format(ISSUE_DATE_FORMAT).to_string(),
            layout_settings,
        }
    }
}
