pub mod admin;
pub mod auth;
pub mod health;
pub mod me;
pub mod spaces;
pub mod tech;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/signup                         signup (public)
/// /auth/login                          login (public)
/// /auth/refresh                        refresh (public)
/// /auth/logout                         logout (requires auth)
/// /auth/password-reset/request         request reset email (public)
/// /auth/password-reset/confirm         set new password via token (public)
///
/// /spaces                              catalog search (public)
/// /spaces/category/{category}          catalog category (public)
/// /spaces/{id}                         space detail (public)
/// /spaces/{id}/reservations            book a slot (requires auth)
///
/// /me                                  account + profile (get, update, delete)
/// /me/reservations                     own reservations
/// /me/reservations/{id}                detail, /pay, /cancel
/// /me/cards                            stored cards (+ /{id}/default)
/// /me/favorites                        bookmarks (list, toggle)
/// /me/security/sessions                session management
/// /me/security/password                change password
///
/// /admin/dashboard, /admin/statistics  platform counters (admin only)
/// /admin/spaces                        space CRUD
/// /admin/reservations                  reservation CRUD + validate/refuse
/// /admin/clients, /admin/technicians   account management
/// /admin/interventions                 maintenance console
///
/// /tech/dashboard                      technician counters
/// /tech/spaces/status                  availability board (+ takedown/reactivate)
/// /tech/incidents                      incident queue (+ cancel/start/finish)
/// /tech/interventions                  own work (+ progress notes)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Authentication: signup, login, token refresh, password reset.
        .nest("/auth", auth::router())
        // Public space catalog, plus booking for authenticated clients.
        .nest("/spaces", spaces::router())
        // Everything scoped to the authenticated user.
        .nest("/me", me::router())
        // Back office: spaces, reservations, accounts, interventions.
        .nest("/admin", admin::router())
        // Technician console: status board, incidents, interventions.
        .nest("/tech", tech::router())
}
