//! Handlers for bookmarked spaces.

use axum::extract::{Path, State};
use axum::Json;
use serde::Serialize;

use pointpro_core::error::CoreError;
use pointpro_core::types::DbId;
use pointpro_db::models::space::Space;
use pointpro_db::repositories::{FavoriteRepo, SpaceRepo};

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAuth;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct ToggleResponse {
    pub is_favorite: bool,
}

/// GET /api/v1/me/favorites
pub async fn list(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> AppResult<Json<Vec<Space>>> {
    let spaces = FavoriteRepo::spaces_for_user(&state.pool, user.user_id).await?;
    Ok(Json(spaces))
}

/// PUT /api/v1/me/favorites/{space_id}
///
/// Toggle: bookmarked spaces are removed, others added.
pub async fn toggle(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(space_id): Path<DbId>,
) -> AppResult<Json<ToggleResponse>> {
    SpaceRepo::find_by_id(&state.pool, space_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "space", id: space_id }))?;

    let is_favorite = FavoriteRepo::toggle(&state.pool, user.user_id, space_id).await?;
    Ok(Json(ToggleResponse { is_favorite }))
}
