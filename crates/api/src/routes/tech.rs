//! Route definitions for the `/tech` technician console (technician or
//! admin role enforced per handler via `RequireTechnician`).

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::tech;
use crate::state::AppState;

/// Routes mounted at `/tech`.
///
/// ```text
/// GET  /dashboard                     -> counters (spaces, maintenance, incidents)
/// GET  /spaces/status                 -> all spaces with availability flags
/// POST /spaces/{id}/maintenance       -> manual takedown
/// POST /spaces/{id}/reactivate        -> bring back (refused during intervention)
///
/// GET  /incidents                     -> incident queue
/// POST /incidents                     -> report an incident
/// POST /incidents/{id}/cancel         -> withdraw an open report
/// POST /incidents/{id}/start          -> start intervention (caller assigned)
/// POST /incidents/{id}/finish         -> close intervention, resolve incident
///
/// GET  /interventions                 -> caller's interventions
/// GET  /interventions/{id}            -> intervention detail
/// PUT  /interventions/{id}/progress   -> notes / materials on own work
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/dashboard", get(tech::dashboard))
        .route("/spaces/status", get(tech::space_status))
        .route("/spaces/{id}/maintenance", post(tech::take_down_space))
        .route("/spaces/{id}/reactivate", post(tech::reactivate_space))
        .route("/incidents", get(tech::list_incidents).post(tech::report_incident))
        .route("/incidents/{id}/cancel", post(tech::cancel_incident))
        .route("/incidents/{id}/start", post(tech::start_intervention))
        .route("/incidents/{id}/finish", post(tech::finish_intervention))
        .route("/interventions", get(tech::my_interventions))
        .route("/interventions/{id}", get(tech::intervention_detail))
        .route("/interventions/{id}/progress", put(tech::record_progress))
}
