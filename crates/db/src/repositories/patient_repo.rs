//! Repository for the `patients` table (identity registry).

use sqlx::PgPool;
use waitroom_core::types::DbId;

use crate::models::patient::{CreatePatient, Patient, PatientExists, RegisterOutcome};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "\
    id, name, affiliation_id, birth_date, sex, blood_type, accepts_donations, \
    address, phone, emergency_contact, conditions, allergies, prior_surgeries, \
    current_medications, created_at, updated_at";

/// Provides registration and lookup for patient identities.
pub struct PatientRepo;

impl PatientRepo {
    /// Register a patient unless the affiliation number is already taken.
    ///
    /// The insert and the uniqueness check are one statement
    /// (`ON CONFLICT DO NOTHING`), so of two concurrent registrations for
    /// the same number exactly one returns `Registered`. The other reads
    /// back the committed winner and returns `Duplicate`.
    pub async fn register(
        pool: &PgPool,
        input: &CreatePatient,
    ) -> Result<RegisterOutcome, sqlx::Error> {
        let query = format!(
            "INSERT INTO patients (name, affiliation_id, birth_date, sex, blood_type, \
                 accepts_donations, address, phone, emergency_contact, conditions, \
                 allergies, prior_surgeries, current_medications) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13) \
             ON CONFLICT ON CONSTRAINT uq_patients_affiliation_id DO NOTHING \
             RETURNING {COLUMNS}"
        );
        let inserted = sqlx::query_as::<_, Patient>(&query)
            .bind(&input.name)
            .bind(&input.affiliation_id)
            .bind(input.birth_date)
            .bind(&input.sex)
            .bind(&input.blood_type)
            .bind(input.accepts_donations)
            .bind(&input.address)
            .bind(&input.phone)
            .bind(&input.emergency_contact)
            .bind(&input.conditions)
            .bind(&input.allergies)
            .bind(&input.prior_surgeries)
            .bind(&input.current_medications)
            .fetch_optional(pool)
            .await?;

        if let Some(patient) = inserted {
            return Ok(RegisterOutcome::Registered(patient));
        }

        // Patients are never deleted, so the conflicting row is still there.
        let existing = Self::find_by_affiliation_id(pool, &input.affiliation_id)
            .await?
            .ok_or(sqlx::Error::RowNotFound)?;
        Ok(RegisterOutcome::Duplicate(existing))
    }

    /// Find a patient by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Patient>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM patients WHERE id = $1");
        sqlx::query_as::<_, Patient>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a patient by affiliation number (exact match).
    pub async fn find_by_affiliation_id(
        pool: &PgPool,
        affiliation_id: &str,
    ) -> Result<Option<Patient>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM patients WHERE affiliation_id = $1");
        sqlx::query_as::<_, Patient>(&query)
            .bind(affiliation_id)
            .fetch_optional(pool)
            .await
    }

    /// Report whether an affiliation number is registered, and to whom.
    pub async fn exists(pool: &PgPool, affiliation_id: &str) -> Result<PatientExists, sqlx::Error> {
        Ok(Self::find_by_affiliation_id(pool, affiliation_id).await?.into())
    }

    /// List all patients in registration order. Unpaginated.
    pub async fn list(pool: &PgPool) -> Result<Vec<Patient>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM patients ORDER BY id ASC");
        sqlx::query_as::<_, Patient>(&query).fetch_all(pool).await
    }
}
