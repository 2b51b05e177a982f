//! Intervention entity model and DTOs.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use pointpro_core::maintenance::{elapsed_hours, InterventionStatus};
use pointpro_core::types::{DbId, Timestamp};

/// A row from the `interventions` table: one technician work session
/// addressing an incident.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Intervention {
    pub id: DbId,
    pub incident_id: DbId,
    pub space_id: DbId,
    pub technician_id: DbId,
    pub started_at: Timestamp,
    pub ended_at: Option<Timestamp>,
    pub status: InterventionStatus,
    /// Stamped at close; while in progress use [`Intervention::hours_so_far`].
    pub duration_hours: Option<f64>,
    pub opening_note: String,
    pub work_note: String,
    pub closing_note: String,
    pub photo_before: Option<String>,
    pub photo_after: Option<String>,
    pub materials_used: String,
    pub material_cost: f64,
    pub created_at: Timestamp,
}

impl Intervention {
    /// Elapsed hours: stamped duration once closed, running clock otherwise.
    pub fn hours_so_far(&self) -> f64 {
        if let Some(d) = self.duration_hours {
            return d;
        }
        let end = self.ended_at.unwrap_or_else(Utc::now);
        elapsed_hours(end - self.started_at)
    }
}

/// DTO for the admin intervention editor. All fields are optional;
/// description and priority pass through to the linked incident.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateIntervention {
    pub space_id: Option<DbId>,
    pub technician_id: Option<DbId>,
    pub material_cost: Option<f64>,
    pub work_note: Option<String>,
    pub materials_used: Option<String>,
}

/// Aggregate figures for the admin interventions console.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct MaintenanceStats {
    pub in_progress: i64,
    /// Mean duration of terminated interventions, hours.
    pub mean_duration_hours: f64,
    /// Resolved incidents / all incidents, percent, one decimal.
    pub resolution_rate: f64,
    /// Material cost of interventions started this calendar month.
    pub month_material_cost: f64,
}

/// Per-technician performance summary.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct TechnicianStats {
    pub total: i64,
    pub terminated: i64,
    pub in_progress: i64,
    pub mean_duration_hours: f64,
    pub total_material_cost: f64,
}
