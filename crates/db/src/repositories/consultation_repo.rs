//! Repository for the `consultations` table.

use sqlx::PgPool;
use waitroom_core::types::DbId;

use crate::models::consultation::{
    Consultation, ConsultationSummary, CreateConsultation, UpdateConsultation,
};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "\
    id, patient_id, consulted_at, reason, symptoms, illness_duration, \
    blood_pressure, heart_rate, respiratory_rate, temperature, weight, height, \
    diagnosis, prescribed_medications, notes, created_at, updated_at";

/// Provides CRUD operations for consultation records.
pub struct ConsultationRepo;

impl ConsultationRepo {
    /// Insert a new consultation, returning the created row.
    pub async fn create(
        pool: &PgPool,
        input: &CreateConsultation,
    ) -> Result<Consultation, sqlx::Error> {
        let query = format!(
            "INSERT INTO consultations (patient_id, consulted_at, reason, symptoms, \
                 illness_duration, blood_pressure, heart_rate, respiratory_rate, \
                 temperature, weight, height, diagnosis, prescribed_medications, notes) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Consultation>(&query)
            .bind(input.patient_id)
            .bind(input.consulted_at)
            .bind(&input.reason)
            .bind(&input.symptoms)
            .bind(&input.illness_duration)
            .bind(&input.blood_pressure)
            .bind(&input.heart_rate)
            .bind(&input.respiratory_rate)
            .bind(&input.temperature)
            .bind(&input.weight)
            .bind(&input.height)
            .bind(&input.diagnosis)
            .bind(&input.prescribed_medications)
            .bind(&input.notes)
            .fetch_one(pool)
            .await
    }

    /// Find a consultation by internal ID.
    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<Consultation>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM consultations WHERE id = $1");
        sqlx::query_as::<_, Consultation>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List a patient's consultations, most recent first.
    pub async fn list_by_patient(
        pool: &PgPool,
        patient_id: DbId,
    ) -> Result<Vec<ConsultationSummary>, sqlx::Error> {
        sqlx::query_as::<_, ConsultationSummary>(
            "SELECT id, consulted_at, reason, diagnosis FROM consultations \
             WHERE patient_id = $1 \
             ORDER BY consulted_at DESC, id DESC",
        )
        .bind(patient_id)
        .fetch_all(pool)
        .await
    }

    /// Update a consultation. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateConsultation,
    ) -> Result<Option<Consultation>, sqlx::Error> {
        let query = format!(
            "UPDATE consultations SET
                consulted_at = COALESCE($2, consulted_at),
                reason = COALESCE($3, reason),
                symptoms = COALESCE($4, symptoms),
                illness_duration = COALESCE($5, illness_duration),
                blood_pressure = COALESCE($6, blood_pressure),
                heart_rate = COALESCE($7, heart_rate),
                respiratory_rate = COALESCE($8, respiratory_rate),
                temperature = COALESCE($9, temperature),
                weight = COALESCE($10, weight),
                height = COALESCE($11, height),
                diagnosis = COALESCE($12, diagnosis),
                prescribed_medications = COALESCE($13, prescribed_medications),
                notes = COALESCE($14, notes)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Consultation>(&query)
            .bind(id)
            .bind(input.consulted_at)
            .bind(&input.reason)
            .bind(&input.symptoms)
            .bind(&input.illness_duration)
            .bind(&input.blood_pressure)
            .bind(&input.heart_rate)
            .bind(&input.respiratory_rate)
            .bind(&input.temperature)
            .bind(&input.weight)
            .bind(&input.height)
            .bind(&input.diagnosis)
            .bind(&input.prescribed_medications)
            .bind(&input.notes)
            .fetch_optional(pool)
            .await
    }

    /// Permanently delete a consultation. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM consultations WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
