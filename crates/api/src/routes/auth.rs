//! Route definitions for the `/auth` resource.

use axum::routing::post;
use axum::Router;

use crate::handlers::auth;
use crate::state::AppState;

/// Routes mounted at `/auth`.
///
/// ```text
/// POST /signup                  -> signup (public)
/// POST /login                   -> login (public)
/// POST /refresh                 -> refresh (public)
/// POST /logout                  -> logout (requires auth)
/// POST /password-reset/request  -> request reset email (public)
/// POST /password-reset/confirm  -> consume token, set password (public)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/signup", post(auth::signup))
        .route("/login", post(auth::login))
        .route("/refresh", post(auth::refresh))
        .route("/logout", post(auth::logout))
        .route("/password-reset/request", post(auth::password_reset_request))
        .route("/password-reset/confirm", post(auth::password_reset_confirm))
}
