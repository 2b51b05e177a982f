//! Route definitions for the `/admin` back office (admin role enforced
//! per handler via `RequireAdmin`).

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::{admin, interventions};
use crate::state::AppState;

/// Routes mounted at `/admin`.
///
/// ```text
/// GET    /dashboard                        -> platform counters
/// GET    /statistics                       -> same counters, stats page
///
/// GET    /spaces                           -> all spaces
/// POST   /spaces                           -> create space
/// PUT    /spaces/{id}                      -> update space
/// DELETE /spaces/{id}                      -> delete space (cascades)
///
/// GET    /reservations                     -> all reservations
/// POST   /reservations                     -> book on behalf of a client
/// PUT    /reservations/{id}                -> update reservation
/// DELETE /reservations/{id}                -> delete reservation
/// POST   /reservations/{id}/validate       -> confirm
/// POST   /reservations/{id}/refuse         -> refuse
///
/// GET    /clients                          -> client accounts
/// POST   /clients                          -> create client
/// PUT    /clients/{id}                     -> update client
/// DELETE /clients/{id}                     -> delete client
///
/// GET    /technicians                      -> technician accounts
/// POST   /technicians                      -> create technician (provisional password)
/// PUT    /technicians/{id}                 -> update technician
/// DELETE /technicians/{id}                 -> delete technician
/// GET    /technicians/{id}/performance     -> stats + recent interventions
///
/// GET    /interventions                    -> list + console figures
/// POST   /interventions                    -> report + dispatch in one step
/// PUT    /interventions/{id}               -> edit
/// POST   /interventions/{id}/close         -> close ({success, ...} envelope)
/// GET    /interventions/{id}/data          -> edit-form payload
/// GET    /interventions/{id}/details       -> read-only detail view
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/dashboard", get(admin::dashboard))
        .route("/statistics", get(admin::statistics))
        .route("/spaces", get(admin::list_spaces).post(admin::create_space))
        .route(
            "/spaces/{id}",
            put(admin::update_space).delete(admin::delete_space),
        )
        .route(
            "/reservations",
            get(admin::list_reservations).post(admin::create_reservation),
        )
        .route(
            "/reservations/{id}",
            put(admin::update_reservation).delete(admin::delete_reservation),
        )
        .route("/reservations/{id}/validate", post(admin::validate_reservation))
        .route("/reservations/{id}/refuse", post(admin::refuse_reservation))
        .route("/clients", get(admin::list_clients).post(admin::create_client))
        .route(
            "/clients/{id}",
            put(admin::update_client).delete(admin::delete_client),
        )
        .route(
            "/technicians",
            get(admin::list_technicians).post(admin::create_technician),
        )
        .route(
            "/technicians/{id}",
            put(admin::update_technician).delete(admin::delete_technician),
        )
        .route(
            "/technicians/{id}/performance",
            get(admin::technician_performance),
        )
        .route(
            "/interventions",
            get(interventions::list).post(interventions::create),
        )
        .route("/interventions/{id}", put(interventions::update))
        .route("/interventions/{id}/close", post(interventions::close))
        .route("/interventions/{id}/data", get(interventions::data))
        .route("/interventions/{id}/details", get(interventions::details))
}
