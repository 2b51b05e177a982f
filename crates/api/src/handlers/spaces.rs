//! Handlers for the public space catalog.

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Serialize;
use serde_json::{json, Value};

use pointpro_core::error::CoreError;
use pointpro_core::space::{category_kinds, category_label};
use pointpro_core::types::DbId;
use pointpro_db::models::space::{Space, SpaceFilter};
use pointpro_db::repositories::SpaceRepo;

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Space payload with the derived equipment list broken out.
#[derive(Debug, Serialize)]
pub struct SpaceDetail {
    #[serde(flatten)]
    pub space: Space,
    pub equipment_list: Vec<String>,
}

impl From<Space> for SpaceDetail {
    fn from(space: Space) -> Self {
        let equipment_list = space
            .equipment_list()
            .into_iter()
            .map(str::to_string)
            .collect();
        Self { space, equipment_list }
    }
}

/// GET /api/v1/spaces
///
/// Public catalog. Unfiltered browsing returns the homepage page; any
/// filter switches to a full search.
pub async fn list(
    State(state): State<AppState>,
    Query(filter): Query<SpaceFilter>,
) -> AppResult<Json<Vec<Space>>> {
    let spaces = SpaceRepo::search(&state.pool, &filter).await?;
    Ok(Json(spaces))
}

/// GET /api/v1/spaces/category/{category}
///
/// Spaces grouped by catalog category (`meeting`, `coworking`, `events`).
pub async fn by_category(
    State(state): State<AppState>,
    Path(category): Path<String>,
) -> AppResult<Json<Value>> {
    let kinds = category_kinds(&category).ok_or_else(|| {
        AppError::Core(CoreError::Validation(format!(
            "Unknown category: {category}"
        )))
    })?;
    let spaces = SpaceRepo::list_by_kinds(&state.pool, kinds).await?;
    Ok(Json(json!({
        "category": category,
        "label": category_label(&category),
        "spaces": spaces,
    })))
}

/// GET /api/v1/spaces/{id}
pub async fn detail(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<SpaceDetail>> {
    let space = SpaceRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "space", id }))?;
    Ok(Json(space.into()))
}
