//! Handlers for stored payment cards.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use pointpro_core::error::CoreError;
use pointpro_core::payment::validate_new_card;
use pointpro_core::types::DbId;
use pointpro_db::models::card::{CreateCard, PaymentCard};
use pointpro_db::repositories::{CardRepo, ProfileRepo};

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAuth;
use crate::state::AppState;

/// Request body for `POST /me/cards`. Carries the full card details; only
/// the derived network and last four are stored.
#[derive(Debug, Deserialize)]
pub struct AddCardRequest {
    pub name: String,
    pub number: String,
    pub expiry: String,
    pub cvv: String,
}

/// GET /api/v1/me/cards
pub async fn list(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> AppResult<Json<Vec<PaymentCard>>> {
    let cards = CardRepo::list_by_user(&state.pool, user.user_id).await?;
    Ok(Json(cards))
}

/// POST /api/v1/me/cards
///
/// The first stored card becomes the profile default.
pub async fn create(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Json(input): Json<AddCardRequest>,
) -> AppResult<(StatusCode, Json<PaymentCard>)> {
    let validated = validate_new_card(&input.name, &input.number, &input.expiry, &input.cvv)
        .map_err(AppError::Core)?;

    let had_cards = !CardRepo::list_by_user(&state.pool, user.user_id).await?.is_empty();

    let card = CardRepo::create(
        &state.pool,
        &CreateCard {
            user_id: user.user_id,
            name: validated.name,
            last_four: validated.last_four,
            network: validated.network,
            expiry: validated.expiry,
        },
    )
    .await?;

    if !had_cards {
        ProfileRepo::set_default_card(&state.pool, user.user_id, Some(card.id)).await?;
    }

    Ok((StatusCode::CREATED, Json(card)))
}

/// DELETE /api/v1/me/cards/{id}
///
/// The profile's `default_card_id` is cleared by the foreign key when the
/// deleted card was the default.
pub async fn delete(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let removed = CardRepo::delete_for_user(&state.pool, id, user.user_id).await?;
    if !removed {
        return Err(AppError::Core(CoreError::NotFound { entity: "card", id }));
    }
    Ok(StatusCode::NO_CONTENT)
}

/// PUT /api/v1/me/cards/{id}/default
pub async fn set_default(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    CardRepo::find_for_user(&state.pool, id, user.user_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "card", id }))?;
    ProfileRepo::set_default_card(&state.pool, user.user_id, Some(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}
