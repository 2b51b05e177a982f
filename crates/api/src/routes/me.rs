//! Route definitions for the authenticated `/me` surface: account,
//! reservations, cards, favorites, and session security.

use axum::routing::{delete, get, post, put};
use axum::Router;

use crate::handlers::{account, cards, favorites, reservations, security};
use crate::state::AppState;

/// Routes mounted at `/me` (all require auth).
///
/// ```text
/// GET    /                            -> account + profile
/// PUT    /                            -> update account + profile
/// DELETE /                            -> delete account (password-confirmed)
///
/// GET    /reservations                -> own reservations + status counts
/// GET    /reservations/{id}           -> reservation detail
/// POST   /reservations/{id}/pay       -> settle a pending reservation
/// POST   /reservations/{id}/cancel    -> cancel
///
/// GET    /cards                       -> stored cards
/// POST   /cards                       -> add a card
/// DELETE /cards/{id}                  -> remove a card
/// PUT    /cards/{id}/default          -> make a card the default
///
/// GET    /favorites                   -> bookmarked spaces
/// PUT    /favorites/{space_id}        -> toggle bookmark
///
/// GET    /security/sessions           -> active sessions
/// DELETE /security/sessions/{id}      -> revoke one session
/// POST   /security/sessions/revoke-all -> revoke all other sessions
/// POST   /security/password           -> change password
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(account::get_me).put(account::update_me).delete(account::delete_me))
        .route("/reservations", get(reservations::list_mine))
        .route("/reservations/{id}", get(reservations::detail))
        .route("/reservations/{id}/pay", post(reservations::pay))
        .route("/reservations/{id}/cancel", post(reservations::cancel))
        .route("/cards", get(cards::list).post(cards::create))
        .route("/cards/{id}", delete(cards::delete))
        .route("/cards/{id}/default", put(cards::set_default))
        .route("/favorites", get(favorites::list))
        .route("/favorites/{space_id}", put(favorites::toggle))
        .route("/security/sessions", get(security::list))
        .route("/security/sessions/{id}", delete(security::revoke))
        .route("/security/sessions/revoke-all", post(security::revoke_all))
        .route("/security/password", post(account::change_password))
}
