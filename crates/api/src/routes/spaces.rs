//! Route definitions for the public `/spaces` catalog.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{reservations, spaces};
use crate::state::AppState;

/// Routes mounted at `/spaces`.
///
/// ```text
/// GET  /                     -> search / homepage listing (public)
/// GET  /category/{category}  -> spaces of one catalog category (public)
/// GET  /{id}                 -> space detail (public)
/// POST /{id}/reservations    -> book a slot (requires auth)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(spaces::list))
        .route("/category/{category}", get(spaces::by_category))
        .route("/{id}", get(spaces::detail))
        .route("/{id}/reservations", post(reservations::create))
}
