//! Handlers for the "manage my sessions" security view.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;

use pointpro_core::error::CoreError;
use pointpro_core::types::{DbId, Timestamp};
use pointpro_db::repositories::{ActiveSessionRepo, SessionRepo};

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAuth;
use crate::state::AppState;

/// One row in the sessions list, with the caller's own session flagged.
#[derive(Debug, Serialize)]
pub struct SessionView {
    pub id: DbId,
    pub device_info: String,
    pub ip_address: Option<String>,
    pub last_activity: Timestamp,
    pub created_at: Timestamp,
    pub is_current: bool,
}

#[derive(Debug, Serialize)]
pub struct RevokeAllResponse {
    pub revoked: u64,
}

/// GET /api/v1/me/security/sessions
pub async fn list(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> AppResult<Json<Vec<SessionView>>> {
    let sessions = ActiveSessionRepo::list_by_user(&state.pool, user.user_id).await?;
    let views = sessions
        .into_iter()
        .map(|s| SessionView {
            id: s.id,
            device_info: s.device_info,
            ip_address: s.ip_address,
            last_activity: s.last_activity,
            created_at: s.created_at,
            is_current: s.session_key == user.session_key,
        })
        .collect();
    Ok(Json(views))
}

/// DELETE /api/v1/me/security/sessions/{id}
///
/// Revoking the current session is refused; use logout for that.
pub async fn revoke(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let session = ActiveSessionRepo::find_for_user(&state.pool, id, user.user_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "session", id }))?;

    if session.session_key == user.session_key {
        return Err(AppError::Core(CoreError::Conflict(
            "Cannot revoke the current session; log out instead".into(),
        )));
    }

    SessionRepo::revoke_by_key(&state.pool, &session.session_key).await?;
    ActiveSessionRepo::delete_for_user(&state.pool, id, user.user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/me/security/sessions/revoke-all
///
/// Log out every other device, keeping the caller's session alive.
pub async fn revoke_all(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> AppResult<Json<RevokeAllResponse>> {
    SessionRepo::revoke_all_except(&state.pool, user.user_id, &user.session_key).await?;
    let revoked =
        ActiveSessionRepo::delete_all_except(&state.pool, user.user_id, &user.session_key).await?;
    Ok(Json(RevokeAllResponse { revoked }))
}
