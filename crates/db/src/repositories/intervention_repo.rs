//! Repository for the `interventions` table and the maintenance lifecycle.
//!
//! Starting and closing an intervention must move three rows together
//! (intervention, incident, space), so those transitions run inside a
//! single transaction here rather than being stitched up in handlers.

use sqlx::{PgPool, Postgres, Transaction};

use pointpro_core::maintenance::IncidentSeverity;
use pointpro_core::types::DbId;

use crate::models::incident::Incident;
use crate::models::intervention::{
    Intervention, MaintenanceStats, TechnicianStats, UpdateIntervention,
};

pub struct InterventionRepo;

impl InterventionRepo {
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Intervention>, sqlx::Error> {
        sqlx::query_as::<_, Intervention>("SELECT * FROM interventions WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// All interventions, most recently started first.
    pub async fn list_all(pool: &PgPool) -> Result<Vec<Intervention>, sqlx::Error> {
        sqlx::query_as::<_, Intervention>("SELECT * FROM interventions ORDER BY started_at DESC")
            .fetch_all(pool)
            .await
    }

    /// A technician's interventions, most recently started first.
    pub async fn list_by_technician(
        pool: &PgPool,
        technician_id: DbId,
    ) -> Result<Vec<Intervention>, sqlx::Error> {
        sqlx::query_as::<_, Intervention>(
            "SELECT * FROM interventions WHERE technician_id = $1 ORDER BY started_at DESC",
        )
        .bind(technician_id)
        .fetch_all(pool)
        .await
    }

    /// Start work on an open incident.
    ///
    /// In one transaction: moves the incident to `in_progress`, assigns the
    /// technician unless the incident already has one, inserts the
    /// intervention, and pulls the space out of the catalog. Returns `None`
    /// when the incident is not open (already
    /// in progress, resolved, or cancelled); `uq_interventions_incident_active`
    /// backstops against two technicians racing on the same incident.
    pub async fn start(
        pool: &PgPool,
        incident_id: DbId,
        technician_id: DbId,
        opening_note: &str,
    ) -> Result<Option<Intervention>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let incident = sqlx::query_as::<_, Incident>(
            "UPDATE incidents SET
                state = 'in_progress',
                technician_id = COALESCE(technician_id, $2)
             WHERE id = $1 AND state = 'open'
             RETURNING *",
        )
        .bind(incident_id)
        .bind(technician_id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(incident) = incident else {
            tx.rollback().await?;
            return Ok(None);
        };

        let intervention = sqlx::query_as::<_, Intervention>(
            "INSERT INTO interventions (incident_id, space_id, technician_id, opening_note)
             VALUES ($1, $2, $3, $4)
             RETURNING *",
        )
        .bind(incident.id)
        .bind(incident.space_id)
        .bind(technician_id)
        .bind(opening_note)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query(
            "UPDATE spaces SET available = FALSE, under_maintenance = TRUE WHERE id = $1",
        )
        .bind(incident.space_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(Some(intervention))
    }

    /// Open an incident and start its intervention in one step (admin
    /// console: report and dispatch together).
    pub async fn admin_open(
        pool: &PgPool,
        space_id: DbId,
        technician_id: DbId,
        description: &str,
        severity: IncidentSeverity,
    ) -> Result<Intervention, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let incident = sqlx::query_as::<_, Incident>(
            "INSERT INTO incidents (space_id, description, severity, state, technician_id)
             VALUES ($1, $2, $3, 'in_progress', $4)
             RETURNING *",
        )
        .bind(space_id)
        .bind(description)
        .bind(severity)
        .bind(technician_id)
        .fetch_one(&mut *tx)
        .await?;

        let intervention = sqlx::query_as::<_, Intervention>(
            "INSERT INTO interventions (incident_id, space_id, technician_id, opening_note)
             VALUES ($1, $2, $3, $4)
             RETURNING *",
        )
        .bind(incident.id)
        .bind(space_id)
        .bind(technician_id)
        .bind(description)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query(
            "UPDATE spaces SET available = FALSE, under_maintenance = TRUE WHERE id = $1",
        )
        .bind(space_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(intervention)
    }

    /// Close an intervention, resolving its incident and restoring the
    /// space. Returns `None` if the intervention was not in progress;
    /// closing twice is a no-op, not an error.
    pub async fn close(
        pool: &PgPool,
        id: DbId,
        closing_note: &str,
        material_cost: Option<f64>,
    ) -> Result<Option<Intervention>, sqlx::Error> {
        let mut tx = pool.begin().await?;
        let closed = Self::close_in_tx(&mut tx, id, closing_note, material_cost).await?;
        match closed {
            Some(intervention) => {
                tx.commit().await?;
                Ok(Some(intervention))
            }
            None => {
                tx.rollback().await?;
                Ok(None)
            }
        }
    }

    /// Close the in-progress intervention of an incident (technician
    /// finish flow, addressed by incident rather than intervention id).
    pub async fn finish_incident(
        pool: &PgPool,
        incident_id: DbId,
        closing_note: &str,
        material_cost: Option<f64>,
    ) -> Result<Option<Intervention>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let active: Option<(DbId,)> = sqlx::query_as(
            "SELECT id FROM interventions
             WHERE incident_id = $1 AND status = 'in_progress'",
        )
        .bind(incident_id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some((id,)) = active else {
            tx.rollback().await?;
            return Ok(None);
        };

        let closed = Self::close_in_tx(&mut tx, id, closing_note, material_cost).await?;
        match closed {
            Some(intervention) => {
                tx.commit().await?;
                Ok(Some(intervention))
            }
            None => {
                tx.rollback().await?;
                Ok(None)
            }
        }
    }

    /// The shared close transition: terminate the intervention and stamp
    /// its duration, resolve the incident, bring the space back.
    async fn close_in_tx(
        tx: &mut Transaction<'_, Postgres>,
        id: DbId,
        closing_note: &str,
        material_cost: Option<f64>,
    ) -> Result<Option<Intervention>, sqlx::Error> {
        let intervention = sqlx::query_as::<_, Intervention>(
            "UPDATE interventions SET
                status = 'terminated',
                ended_at = NOW(),
                duration_hours =
                    ROUND((EXTRACT(EPOCH FROM (NOW() - started_at)) / 3600)::numeric, 1),
                closing_note = $2,
                material_cost = COALESCE($3, material_cost)
             WHERE id = $1 AND status = 'in_progress'
             RETURNING *",
        )
        .bind(id)
        .bind(closing_note)
        .bind(material_cost)
        .fetch_optional(&mut **tx)
        .await?;

        let Some(intervention) = intervention else {
            return Ok(None);
        };

        sqlx::query(
            "UPDATE incidents SET state = 'resolved', resolved_at = NOW() WHERE id = $1",
        )
        .bind(intervention.incident_id)
        .execute(&mut **tx)
        .await?;

        sqlx::query(
            "UPDATE spaces SET
                available = TRUE, under_maintenance = FALSE, maintenance_until = NULL
             WHERE id = $1",
        )
        .bind(intervention.space_id)
        .execute(&mut **tx)
        .await?;

        Ok(Some(intervention))
    }

    /// Admin editor update on an in-flight intervention. Reassigning the
    /// space or technician also updates the linked incident.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateIntervention,
    ) -> Result<Option<Intervention>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let intervention = sqlx::query_as::<_, Intervention>(
            "UPDATE interventions SET
                space_id = COALESCE($2, space_id),
                technician_id = COALESCE($3, technician_id),
                material_cost = COALESCE($4, material_cost),
                work_note = COALESCE($5, work_note),
                materials_used = COALESCE($6, materials_used)
             WHERE id = $1
             RETURNING *",
        )
        .bind(id)
        .bind(input.space_id)
        .bind(input.technician_id)
        .bind(input.material_cost)
        .bind(&input.work_note)
        .bind(&input.materials_used)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(intervention) = intervention else {
            tx.rollback().await?;
            return Ok(None);
        };

        if input.space_id.is_some() || input.technician_id.is_some() {
            sqlx::query(
                "UPDATE incidents SET
                    space_id = $2,
                    technician_id = $3
                 WHERE id = $1",
            )
            .bind(intervention.incident_id)
            .bind(intervention.space_id)
            .bind(intervention.technician_id)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(Some(intervention))
    }

    /// Record progress notes on an in-progress intervention (technician).
    pub async fn record_progress(
        pool: &PgPool,
        id: DbId,
        technician_id: DbId,
        work_note: Option<&str>,
        materials_used: Option<&str>,
        material_cost: Option<f64>,
    ) -> Result<Option<Intervention>, sqlx::Error> {
        sqlx::query_as::<_, Intervention>(
            "UPDATE interventions SET
                work_note = COALESCE($3, work_note),
                materials_used = COALESCE($4, materials_used),
                material_cost = COALESCE($5, material_cost)
             WHERE id = $1 AND technician_id = $2 AND status = 'in_progress'
             RETURNING *",
        )
        .bind(id)
        .bind(technician_id)
        .bind(work_note)
        .bind(materials_used)
        .bind(material_cost)
        .fetch_optional(pool)
        .await
    }

    /// Aggregate figures for the admin interventions console.
    pub async fn stats(pool: &PgPool) -> Result<MaintenanceStats, sqlx::Error> {
        let (in_progress, mean_duration_hours, month_material_cost): (i64, f64, f64) =
            sqlx::query_as(
                "SELECT
                    COUNT(*) FILTER (WHERE status = 'in_progress'),
                    COALESCE(ROUND(AVG(duration_hours)
                        FILTER (WHERE status = 'terminated')::numeric, 1), 0)::float8,
                    COALESCE(SUM(material_cost)
                        FILTER (WHERE started_at >= date_trunc('month', NOW())), 0)::float8
                 FROM interventions",
            )
            .fetch_one(pool)
            .await?;

        let (resolution_rate,): (f64,) = sqlx::query_as(
            "SELECT CASE WHEN COUNT(*) = 0 THEN 0
                ELSE ROUND(100.0 * COUNT(*) FILTER (WHERE state = 'resolved')
                    / COUNT(*), 1)
             END::float8
             FROM incidents",
        )
        .fetch_one(pool)
        .await?;

        Ok(MaintenanceStats {
            in_progress,
            mean_duration_hours,
            resolution_rate,
            month_material_cost,
        })
    }

    /// Per-technician performance summary.
    pub async fn technician_stats(
        pool: &PgPool,
        technician_id: DbId,
    ) -> Result<TechnicianStats, sqlx::Error> {
        let row: (i64, i64, i64, f64, f64) = sqlx::query_as(
            "SELECT
                COUNT(*),
                COUNT(*) FILTER (WHERE status = 'terminated'),
                COUNT(*) FILTER (WHERE status = 'in_progress'),
                COALESCE(ROUND(AVG(duration_hours)
                    FILTER (WHERE status = 'terminated')::numeric, 1), 0)::float8,
                COALESCE(SUM(material_cost), 0)::float8
             FROM interventions WHERE technician_id = $1",
        )
        .bind(technician_id)
        .fetch_one(pool)
        .await?;

        Ok(TechnicianStats {
            total: row.0,
            terminated: row.1,
            in_progress: row.2,
            mean_duration_hours: row.3,
            total_material_cost: row.4,
        })
    }

}
