//! Consultation record model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;
use waitroom_core::types::{DbId, Timestamp};

/// A row from the `consultations` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Consultation {
    pub id: DbId,
    pub patient_id: DbId,
    pub consulted_at: Timestamp,
    pub reason: String,
    pub symptoms: Option<String>,
    pub illness_duration: Option<String>,
    pub blood_pressure: Option<String>,
    pub heart_rate: Option<String>,
    pub respiratory_rate: Option<String>,
    pub temperature: Option<String>,
    pub weight: Option<String>,
    pub height: Option<String>,
    pub diagnosis: Option<String>,
    pub prescribed_medications: Option<String>,
    pub notes: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Condensed row for per-patient listings.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ConsultationSummary {
    pub id: DbId,
    pub consulted_at: Timestamp,
    pub reason: String,
    pub diagnosis: Option<String>,
}

/// DTO for creating a consultation.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateConsultation {
    pub patient_id: DbId,
    /// RFC 3339 timestamp.
    pub consulted_at: Timestamp,
    #[validate(length(min = 1))]
    pub reason: String,
    pub symptoms: Option<String>,
    pub illness_duration: Option<String>,
    #[validate(length(max = 20))]
    pub blood_pressure: Option<String>,
    #[validate(length(max = 20))]
    pub heart_rate: Option<String>,
    #[validate(length(max = 20))]
    pub respiratory_rate: Option<String>,
    #[validate(length(max = 20))]
    pub temperature: Option<String>,
    #[validate(length(max = 20))]
    pub weight: Option<String>,
    #[validate(length(max = 20))]
    pub height: Option<String>,
    pub diagnosis: Option<String>,
    pub prescribed_medications: Option<String>,
    pub notes: Option<String>,
}

/// DTO for updating a consultation. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateConsultation {
    pub consulted_at: Option<Timestamp>,
    #[validate(length(min = 1))]
    pub reason: Option<String>,
    pub symptoms: Option<String>,
    pub illness_duration: Option<String>,
    #[validate(length(max = 20))]
    pub blood_pressure: Option<String>,
    #[validate(length(max = 20))]
    pub heart_rate: Option<String>,
    #[validate(length(max = 20))]
    pub respiratory_rate: Option<String>,
    #[validate(length(max = 20))]
    pub temperature: Option<String>,
    #[validate(length(max = 20))]
    pub weight: Option<String>,
    #[validate(length(max = 20))]
    pub height: Option<String>,
    pub diagnosis: Option<String>,
    pub prescribed_medications: Option<String>,
    pub notes: Option<String>,
}
