//! Handlers for the admin interventions console.
//!
//! This surface speaks the "priority" vocabulary; severity is what gets
//! stored. Close responses use `{success, ...}` envelopes because the
//! console treats an already-terminated intervention as a soft failure,
//! not an error page.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::json;

use pointpro_core::error::CoreError;
use pointpro_core::maintenance::{InterventionStatus, Priority};
use pointpro_core::types::DbId;
use pointpro_db::models::intervention::{Intervention, MaintenanceStats, UpdateIntervention};
use pointpro_db::repositories::{
    IncidentRepo, InterventionRepo, ProfileRepo, SpaceRepo,
};

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Response for `GET /admin/interventions`: the list plus the console's
/// headline figures.
#[derive(Debug, Serialize)]
pub struct InterventionListResponse {
    pub interventions: Vec<Intervention>,
    pub stats: MaintenanceStats,
}

/// Request body for `POST /admin/interventions`: report an incident and
/// dispatch a technician in one step.
#[derive(Debug, Deserialize)]
pub struct OpenInterventionRequest {
    pub space_id: DbId,
    pub technician_id: DbId,
    pub description: String,
    pub priority: Priority,
}

/// Request body for `PUT /admin/interventions/{id}`. Description and
/// priority pass through to the linked incident.
#[derive(Debug, Default, Deserialize)]
pub struct EditInterventionRequest {
    pub space_id: Option<DbId>,
    pub technician_id: Option<DbId>,
    pub description: Option<String>,
    pub priority: Option<Priority>,
    pub material_cost: Option<f64>,
    pub work_note: Option<String>,
    pub materials_used: Option<String>,
}

/// Request body for `POST /admin/interventions/{id}/close`.
#[derive(Debug, Deserialize)]
pub struct CloseInterventionRequest {
    pub closing_note: String,
    pub material_cost: Option<f64>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/admin/interventions
pub async fn list(
    State(state): State<AppState>,
    RequireAdmin(_): RequireAdmin,
) -> AppResult<Json<InterventionListResponse>> {
    let interventions = InterventionRepo::list_all(&state.pool).await?;
    let stats = InterventionRepo::stats(&state.pool).await?;
    Ok(Json(InterventionListResponse { interventions, stats }))
}

/// POST /api/v1/admin/interventions
pub async fn create(
    State(state): State<AppState>,
    RequireAdmin(_): RequireAdmin,
    Json(input): Json<OpenInterventionRequest>,
) -> AppResult<(StatusCode, Json<Intervention>)> {
    if input.description.trim().is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "A description is required".into(),
        )));
    }
    SpaceRepo::find_by_id(&state.pool, input.space_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "space", id: input.space_id }))?;
    ProfileRepo::find_technician(&state.pool, input.technician_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "technician",
            id: input.technician_id,
        }))?;

    let intervention = InterventionRepo::admin_open(
        &state.pool,
        input.space_id,
        input.technician_id,
        input.description.trim(),
        input.priority.to_severity(),
    )
    .await?;

    tracing::info!(
        intervention_id = intervention.id,
        space_id = input.space_id,
        technician_id = input.technician_id,
        "Intervention opened from admin console"
    );
    Ok((StatusCode::CREATED, Json(intervention)))
}

/// PUT /api/v1/admin/interventions/{id}
pub async fn update(
    State(state): State<AppState>,
    RequireAdmin(_): RequireAdmin,
    Path(id): Path<DbId>,
    Json(input): Json<EditInterventionRequest>,
) -> AppResult<Json<Intervention>> {
    if let Some(space_id) = input.space_id {
        SpaceRepo::find_by_id(&state.pool, space_id)
            .await?
            .ok_or(AppError::Core(CoreError::NotFound { entity: "space", id: space_id }))?;
    }
    if let Some(technician_id) = input.technician_id {
        ProfileRepo::find_technician(&state.pool, technician_id)
            .await?
            .ok_or(AppError::Core(CoreError::NotFound {
                entity: "technician",
                id: technician_id,
            }))?;
    }

    let intervention = InterventionRepo::update(
        &state.pool,
        id,
        &UpdateIntervention {
            space_id: input.space_id,
            technician_id: input.technician_id,
            material_cost: input.material_cost,
            work_note: input.work_note,
            materials_used: input.materials_used,
        },
    )
    .await?
    .ok_or(AppError::Core(CoreError::NotFound { entity: "intervention", id }))?;

    if input.description.is_some() || input.priority.is_some() {
        IncidentRepo::update(
            &state.pool,
            intervention.incident_id,
            input.description.as_deref(),
            input.priority.map(Priority::to_severity),
        )
        .await?;
    }

    Ok(Json(intervention))
}

/// POST /api/v1/admin/interventions/{id}/close
///
/// Already-terminated interventions return 409 with a `success: false`
/// envelope rather than an error body.
pub async fn close(
    State(state): State<AppState>,
    RequireAdmin(_): RequireAdmin,
    Path(id): Path<DbId>,
    Json(input): Json<CloseInterventionRequest>,
) -> AppResult<(StatusCode, Json<serde_json::Value>)> {
    InterventionRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "intervention", id }))?;

    match InterventionRepo::close(&state.pool, id, input.closing_note.trim(), input.material_cost)
        .await?
    {
        Some(intervention) => {
            tracing::info!(intervention_id = id, "Intervention closed");
            Ok((
                StatusCode::OK,
                Json(json!({
                    "success": true,
                    "message": "Intervention closed",
                    "intervention": intervention,
                })),
            ))
        }
        None => Ok((
            StatusCode::CONFLICT,
            Json(json!({
                "success": false,
                "error": "This intervention is already closed",
            })),
        )),
    }
}

/// GET /api/v1/admin/interventions/{id}/data
///
/// Edit-form payload: current values with severity rendered back as a
/// priority.
pub async fn data(
    State(state): State<AppState>,
    RequireAdmin(_): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<Json<serde_json::Value>> {
    let intervention = InterventionRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "intervention", id }))?;
    let incident = IncidentRepo::find_by_id(&state.pool, intervention.incident_id)
        .await?
        .ok_or_else(|| AppError::InternalError("Intervention has no incident".into()))?;

    Ok(Json(json!({
        "id": intervention.id,
        "space_id": intervention.space_id,
        "technician_id": intervention.technician_id,
        "description": incident.description,
        "priority": Priority::from_severity(incident.severity),
        "material_cost": intervention.material_cost,
        "work_note": intervention.work_note,
        "materials_used": intervention.materials_used,
    })))
}

/// GET /api/v1/admin/interventions/{id}/details
///
/// Read-only detail view: notes, photos, materials, and a duration that
/// keeps running while the work is in progress.
pub async fn details(
    State(state): State<AppState>,
    RequireAdmin(_): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<Json<serde_json::Value>> {
    let intervention = InterventionRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "intervention", id }))?;
    let incident = IncidentRepo::find_by_id(&state.pool, intervention.incident_id)
        .await?
        .ok_or_else(|| AppError::InternalError("Intervention has no incident".into()))?;
    let space = SpaceRepo::find_by_id(&state.pool, intervention.space_id).await?;

    let duration = if intervention.status == InterventionStatus::InProgress {
        json!({ "in_progress": true, "hours": intervention.hours_so_far() })
    } else {
        json!({ "in_progress": false, "hours": intervention.hours_so_far() })
    };

    Ok(Json(json!({
        "id": intervention.id,
        "status": intervention.status,
        "space": space.map(|s| json!({ "id": s.id, "name": s.name })),
        "description": incident.description,
        "priority": Priority::from_severity(incident.severity),
        "started_at": intervention.started_at,
        "ended_at": intervention.ended_at,
        "duration": duration,
        "opening_note": intervention.opening_note,
        "work_note": intervention.work_note,
        "closing_note": intervention.closing_note,
        "photo_before": intervention.photo_before,
        "photo_after": intervention.photo_after,
        "materials_used": intervention.materials_used,
        "material_cost": intervention.material_cost,
    })))
}
