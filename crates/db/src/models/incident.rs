//! Incident entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use pointpro_core::maintenance::{IncidentSeverity, IncidentState};
use pointpro_core::types::{DbId, Timestamp};

/// A row from the `incidents` table: a reported fault against a space.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Incident {
    pub id: DbId,
    pub space_id: DbId,
    pub description: String,
    pub severity: IncidentSeverity,
    pub state: IncidentState,
    pub technician_id: Option<DbId>,
    pub reported_at: Timestamp,
    pub resolved_at: Option<Timestamp>,
}

/// DTO for opening a new incident.
#[derive(Debug, Deserialize)]
pub struct CreateIncident {
    pub space_id: DbId,
    pub description: String,
    #[serde(default)]
    pub severity: Option<IncidentSeverity>,
}
