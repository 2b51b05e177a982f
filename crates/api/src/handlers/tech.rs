//! Handlers for the technician console: space status board, incident
//! queue, and the start/finish intervention flow.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::json;

use pointpro_core::error::CoreError;
use pointpro_core::types::DbId;
use pointpro_db::models::incident::{CreateIncident, Incident};
use pointpro_db::models::intervention::Intervention;
use pointpro_db::repositories::{
    IncidentRepo, InterventionRepo, ProfileRepo, SpaceRepo,
};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireTechnician;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Counters for the technician dashboard.
#[derive(Debug, Serialize)]
pub struct TechDashboardResponse {
    pub total_spaces: i64,
    pub in_maintenance: i64,
    pub open_incidents: i64,
}

/// Request body for `POST /tech/incidents/{id}/start`.
#[derive(Debug, Default, Deserialize)]
pub struct StartInterventionRequest {
    #[serde(default)]
    pub opening_note: Option<String>,
}

/// Request body for `POST /tech/incidents/{id}/finish`.
#[derive(Debug, Deserialize)]
pub struct FinishInterventionRequest {
    pub closing_note: String,
    pub material_cost: Option<f64>,
}

/// Request body for `PUT /tech/interventions/{id}/progress`.
#[derive(Debug, Default, Deserialize)]
pub struct ProgressRequest {
    pub work_note: Option<String>,
    pub materials_used: Option<String>,
    pub material_cost: Option<f64>,
}

// ---------------------------------------------------------------------------
// Dashboard and space status
// ---------------------------------------------------------------------------

/// GET /api/v1/tech/dashboard
pub async fn dashboard(
    State(state): State<AppState>,
    RequireTechnician(_): RequireTechnician,
) -> AppResult<Json<TechDashboardResponse>> {
    Ok(Json(TechDashboardResponse {
        total_spaces: SpaceRepo::count(&state.pool).await?,
        in_maintenance: SpaceRepo::count_in_maintenance(&state.pool).await?,
        open_incidents: IncidentRepo::count_open(&state.pool).await?,
    }))
}

/// GET /api/v1/tech/spaces/status -- every space with its availability
/// and maintenance flags, unavailable ones included.
pub async fn space_status(
    State(state): State<AppState>,
    RequireTechnician(_): RequireTechnician,
) -> AppResult<Json<Vec<pointpro_db::models::space::Space>>> {
    Ok(Json(SpaceRepo::list_all(&state.pool).await?))
}

/// POST /api/v1/tech/spaces/{id}/maintenance
///
/// Manual takedown: pulls the space from the catalog without opening an
/// incident.
pub async fn take_down_space(
    State(state): State<AppState>,
    RequireTechnician(_): RequireTechnician,
    Path(id): Path<DbId>,
) -> AppResult<Json<pointpro_db::models::space::Space>> {
    let space = SpaceRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "space", id }))?;
    if !space.available {
        return Err(AppError::Core(CoreError::Conflict(
            "This space is already unavailable".into(),
        )));
    }
    let space = SpaceRepo::set_available(&state.pool, id, false)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "space", id }))?;
    tracing::info!(space_id = id, "Space taken down for maintenance");
    Ok(Json(space))
}

/// POST /api/v1/tech/spaces/{id}/reactivate
///
/// Refused while an intervention holds the space; close the intervention
/// instead.
pub async fn reactivate_space(
    State(state): State<AppState>,
    RequireTechnician(_): RequireTechnician,
    Path(id): Path<DbId>,
) -> AppResult<Json<pointpro_db::models::space::Space>> {
    let space = SpaceRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "space", id }))?;
    if space.under_maintenance {
        return Err(AppError::Core(CoreError::Conflict(
            "This space is held by an intervention; close it to release the space".into(),
        )));
    }
    if space.available {
        return Err(AppError::Core(CoreError::Conflict(
            "This space is already available".into(),
        )));
    }
    let space = SpaceRepo::set_available(&state.pool, id, true)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "space", id }))?;
    tracing::info!(space_id = id, "Space reactivated");
    Ok(Json(space))
}

// ---------------------------------------------------------------------------
// Incidents
// ---------------------------------------------------------------------------

/// GET /api/v1/tech/incidents
pub async fn list_incidents(
    State(state): State<AppState>,
    RequireTechnician(_): RequireTechnician,
) -> AppResult<Json<Vec<Incident>>> {
    Ok(Json(IncidentRepo::list_all(&state.pool).await?))
}

/// POST /api/v1/tech/incidents
pub async fn report_incident(
    State(state): State<AppState>,
    RequireTechnician(_): RequireTechnician,
    Json(input): Json<CreateIncident>,
) -> AppResult<(StatusCode, Json<Incident>)> {
    if input.description.trim().is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "A description is required".into(),
        )));
    }
    SpaceRepo::find_by_id(&state.pool, input.space_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "space", id: input.space_id }))?;

    let incident = IncidentRepo::create(&state.pool, &input).await?;
    tracing::info!(
        incident_id = incident.id,
        space_id = incident.space_id,
        "Incident reported"
    );
    Ok((StatusCode::CREATED, Json(incident)))
}

/// POST /api/v1/tech/incidents/{id}/cancel
///
/// Withdraw a report that turned out to need no work. Only open incidents
/// can be cancelled; in-progress ones must be finished instead.
pub async fn cancel_incident(
    State(state): State<AppState>,
    RequireTechnician(_): RequireTechnician,
    Path(id): Path<DbId>,
) -> AppResult<Json<Incident>> {
    IncidentRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "incident", id }))?;

    let incident = IncidentRepo::cancel(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::Conflict(
            "Only open incidents can be cancelled".into(),
        )))?;

    tracing::info!(incident_id = id, "Incident cancelled");
    Ok(Json(incident))
}

/// POST /api/v1/tech/incidents/{id}/start
///
/// Assigns the calling technician and starts the intervention; the space
/// leaves the catalog in the same transaction. 409 when the incident is
/// not open anymore.
pub async fn start_intervention(
    State(state): State<AppState>,
    RequireTechnician(caller): RequireTechnician,
    Path(id): Path<DbId>,
    Json(input): Json<StartInterventionRequest>,
) -> AppResult<(StatusCode, Json<Intervention>)> {
    IncidentRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "incident", id }))?;
    let technician = technician_profile(&state, &caller).await?;

    let opening_note = input.opening_note.as_deref().unwrap_or("").trim().to_string();
    let intervention =
        InterventionRepo::start(&state.pool, id, technician, &opening_note)
            .await?
            .ok_or(AppError::Core(CoreError::Conflict(
                "This incident is already being handled or is closed".into(),
            )))?;

    tracing::info!(
        incident_id = id,
        intervention_id = intervention.id,
        technician_id = technician,
        "Intervention started"
    );
    Ok((StatusCode::CREATED, Json(intervention)))
}

/// POST /api/v1/tech/incidents/{id}/finish
///
/// Closes the in-progress intervention, resolves the incident, and puts
/// the space back in the catalog. 409 when nothing is in progress.
pub async fn finish_intervention(
    State(state): State<AppState>,
    RequireTechnician(_): RequireTechnician,
    Path(id): Path<DbId>,
    Json(input): Json<FinishInterventionRequest>,
) -> AppResult<Json<serde_json::Value>> {
    IncidentRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "incident", id }))?;

    let intervention = InterventionRepo::finish_incident(
        &state.pool,
        id,
        input.closing_note.trim(),
        input.material_cost,
    )
    .await?
    .ok_or(AppError::Core(CoreError::Conflict(
        "No intervention is in progress for this incident".into(),
    )))?;

    let incident = IncidentRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "incident", id }))?;

    tracing::info!(
        incident_id = id,
        intervention_id = intervention.id,
        "Intervention finished"
    );
    Ok(Json(json!({
        "incident": incident,
        "intervention": intervention,
    })))
}

// ---------------------------------------------------------------------------
// Interventions
// ---------------------------------------------------------------------------

/// GET /api/v1/tech/interventions -- the caller's own interventions.
pub async fn my_interventions(
    State(state): State<AppState>,
    RequireTechnician(caller): RequireTechnician,
) -> AppResult<Json<Vec<Intervention>>> {
    let technician = technician_profile(&state, &caller).await?;
    Ok(Json(
        InterventionRepo::list_by_technician(&state.pool, technician).await?,
    ))
}

/// GET /api/v1/tech/interventions/{id}
pub async fn intervention_detail(
    State(state): State<AppState>,
    RequireTechnician(_): RequireTechnician,
    Path(id): Path<DbId>,
) -> AppResult<Json<Intervention>> {
    let intervention = InterventionRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "intervention", id }))?;
    Ok(Json(intervention))
}

/// PUT /api/v1/tech/interventions/{id}/progress
///
/// Notes and materials on the caller's own in-progress intervention.
pub async fn record_progress(
    State(state): State<AppState>,
    RequireTechnician(caller): RequireTechnician,
    Path(id): Path<DbId>,
    Json(input): Json<ProgressRequest>,
) -> AppResult<Json<Intervention>> {
    let technician = technician_profile(&state, &caller).await?;
    let intervention = InterventionRepo::record_progress(
        &state.pool,
        id,
        technician,
        input.work_note.as_deref(),
        input.materials_used.as_deref(),
        input.material_cost,
    )
    .await?
    .ok_or(AppError::Core(CoreError::Conflict(
        "No in-progress intervention of yours matches".into(),
    )))?;
    Ok(Json(intervention))
}

/// Resolve the caller's profile id, which is what interventions reference.
async fn technician_profile(state: &AppState, caller: &AuthUser) -> AppResult<DbId> {
    let profile = ProfileRepo::find_by_user(&state.pool, caller.user_id)
        .await?
        .ok_or_else(|| AppError::InternalError("Account has no profile".into()))?;
    Ok(profile.id)
}
