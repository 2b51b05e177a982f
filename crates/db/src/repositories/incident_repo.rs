//! Repository for the `incidents` table.

use sqlx::PgPool;

use pointpro_core::maintenance::IncidentSeverity;
use pointpro_core::types::DbId;

use crate::models::incident::{CreateIncident, Incident};

/// Provides CRUD for reported faults. Lifecycle transitions that touch
/// interventions or spaces live in `InterventionRepo`.
pub struct IncidentRepo;

impl IncidentRepo {
    /// Open a new incident against a space.
    pub async fn create(pool: &PgPool, input: &CreateIncident) -> Result<Incident, sqlx::Error> {
        sqlx::query_as::<_, Incident>(
            "INSERT INTO incidents (space_id, description, severity)
             VALUES ($1, $2, $3)
             RETURNING *",
        )
        .bind(input.space_id)
        .bind(&input.description)
        .bind(input.severity.unwrap_or(IncidentSeverity::Moderate))
        .fetch_one(pool)
        .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Incident>, sqlx::Error> {
        sqlx::query_as::<_, Incident>("SELECT * FROM incidents WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// All incidents, newest first.
    pub async fn list_all(pool: &PgPool) -> Result<Vec<Incident>, sqlx::Error> {
        sqlx::query_as::<_, Incident>("SELECT * FROM incidents ORDER BY reported_at DESC")
            .fetch_all(pool)
            .await
    }

    /// Update description and severity (admin editor).
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        description: Option<&str>,
        severity: Option<IncidentSeverity>,
    ) -> Result<Option<Incident>, sqlx::Error> {
        sqlx::query_as::<_, Incident>(
            "UPDATE incidents SET
                description = COALESCE($2, description),
                severity = COALESCE($3, severity)
             WHERE id = $1
             RETURNING *",
        )
        .bind(id)
        .bind(description)
        .bind(severity)
        .fetch_optional(pool)
        .await
    }

    /// Cancel an open incident. Refuses incidents that are already closed or
    /// being worked on.
    pub async fn cancel(pool: &PgPool, id: DbId) -> Result<Option<Incident>, sqlx::Error> {
        sqlx::query_as::<_, Incident>(
            "UPDATE incidents SET state = 'cancelled' WHERE id = $1 AND state = 'open'
             RETURNING *",
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    pub async fn count_open(pool: &PgPool) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM incidents WHERE state IN ('open', 'in_progress')",
        )
        .fetch_one(pool)
        .await?;
        Ok(count)
    }
}
