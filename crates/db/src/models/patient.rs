//! Patient identity model and DTOs.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;
use waitroom_core::types::{DbId, Timestamp};

/// A row from the `patients` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Patient {
    pub id: DbId,
    pub name: String,
    pub affiliation_id: String,
    pub birth_date: NaiveDate,
    pub sex: String,
    pub blood_type: String,
    pub accepts_donations: bool,
    pub address: String,
    pub phone: String,
    pub emergency_contact: Option<String>,
    pub conditions: Option<String>,
    pub allergies: Option<String>,
    pub prior_surgeries: Option<String>,
    pub current_medications: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for registering a new patient.
///
/// `affiliation_id` and `name` are trimmed by the caller before insert.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreatePatient {
    #[validate(length(min = 1, max = 60))]
    pub name: String,
    pub affiliation_id: String,
    /// `YYYY-MM-DD`.
    pub birth_date: NaiveDate,
    #[validate(length(min = 1, max = 10))]
    pub sex: String,
    #[validate(length(min = 1, max = 5))]
    pub blood_type: String,
    pub accepts_donations: bool,
    #[validate(length(min = 1, max = 120))]
    pub address: String,
    #[validate(length(min = 1, max = 15))]
    pub phone: String,
    #[validate(length(max = 15))]
    pub emergency_contact: Option<String>,
    pub conditions: Option<String>,
    pub allergies: Option<String>,
    pub prior_surgeries: Option<String>,
    pub current_medications: Option<String>,
}

/// Result of a registration attempt.
#[derive(Debug, Clone)]
pub enum RegisterOutcome {
    /// A new row was inserted.
    Registered(Patient),
    /// The affiliation number was already taken by this row.
    Duplicate(Patient),
}

/// Answer to "is this affiliation number registered?".
#[derive(Debug, Clone, Serialize)]
pub struct PatientExists {
    pub exists: bool,
    pub id: Option<DbId>,
    pub name: Option<String>,
}

impl From<Option<Patient>> for PatientExists {
    fn from(patient: Option<Patient>) -> Self {
        match patient {
            Some(p) => Self {
                exists: true,
                id: Some(p.id),
                name: Some(p.name),
            },
            None => Self {
                exists: false,
                id: None,
                name: None,
            },
        }
    }
}
