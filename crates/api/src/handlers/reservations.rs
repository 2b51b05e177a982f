//! Handlers for client reservations: booking, listing, cancellation, and
//! the simulated payment.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::{NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use pointpro_core::error::CoreError;
use pointpro_core::payment::{masked_descriptor, validate_new_card, PaymentSource};
use pointpro_core::reservation::{total_price, ReservationStatus, Slot};
use pointpro_core::types::DbId;
use pointpro_db::models::card::CreateCard;
use pointpro_db::models::reservation::{CreateReservation, Reservation, ReservationCounts};
use pointpro_db::repositories::{CardRepo, ReservationRepo, SpaceRepo, UserRepo};
use pointpro_events::messages;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAuth;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /spaces/{id}/reservations`.
#[derive(Debug, Deserialize)]
pub struct CreateReservationRequest {
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub duration_hours: i32,
}

/// Response for `GET /me/reservations`: the list plus per-status counts.
#[derive(Debug, Serialize)]
pub struct ReservationListResponse {
    pub reservations: Vec<Reservation>,
    pub counts: ReservationCounts,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/spaces/{id}/reservations
///
/// Book a slot. The app-level conflict check gives a friendly 409; the
/// slot constraint closes the race either way. Price is fixed here and
/// never recomputed.
pub async fn create(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(space_id): Path<DbId>,
    Json(input): Json<CreateReservationRequest>,
) -> AppResult<(StatusCode, Json<Reservation>)> {
    let space = SpaceRepo::find_by_id(&state.pool, space_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "space", id: space_id }))?;

    if !space.available {
        return Err(AppError::Core(CoreError::Conflict(
            "This space is currently unavailable".into(),
        )));
    }

    let slot = Slot::validate(
        input.date,
        input.start_time,
        input.duration_hours,
        Utc::now().naive_utc(),
    )
    .map_err(AppError::Core)?;

    if ReservationRepo::slot_taken(&state.pool, space.id, slot.date, slot.start_time).await? {
        return Err(AppError::Core(CoreError::Conflict(
            "This slot is already booked".into(),
        )));
    }

    let create = CreateReservation {
        user_id: user.user_id,
        space_id: space.id,
        date: slot.date,
        start_time: slot.start_time,
        duration_hours: slot.duration_hours,
        total_price: total_price(space.price_per_hour, slot.duration_hours),
    };
    let reservation = ReservationRepo::create(&state.pool, &create).await?;

    tracing::info!(
        reservation_id = reservation.id,
        user_id = user.user_id,
        space_id = space.id,
        "Reservation created"
    );
    Ok((StatusCode::CREATED, Json(reservation)))
}

/// GET /api/v1/me/reservations
pub async fn list_mine(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> AppResult<Json<ReservationListResponse>> {
    let reservations = ReservationRepo::list_by_user(&state.pool, user.user_id).await?;
    let counts = ReservationRepo::counts_for_user(&state.pool, user.user_id).await?;
    Ok(Json(ReservationListResponse { reservations, counts }))
}

/// GET /api/v1/me/reservations/{id}
///
/// Owner-scoped: another user's reservation is a 404, not a 403.
pub async fn detail(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<DbId>,
) -> AppResult<Json<Reservation>> {
    let reservation = ReservationRepo::find_for_user(&state.pool, id, user.user_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "reservation", id }))?;
    Ok(Json(reservation))
}

/// POST /api/v1/me/reservations/{id}/cancel
pub async fn cancel(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<DbId>,
) -> AppResult<Json<Reservation>> {
    let reservation = ReservationRepo::find_for_user(&state.pool, id, user.user_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "reservation", id }))?;

    if reservation.status.is_terminal() {
        return Err(AppError::Core(CoreError::Conflict(
            "This reservation can no longer be cancelled".into(),
        )));
    }

    let cancelled = ReservationRepo::set_status(&state.pool, id, ReservationStatus::Cancelled)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "reservation", id }))?;

    notify_cancellation(&state, &cancelled).await;

    Ok(Json(cancelled))
}

/// POST /api/v1/me/reservations/{id}/pay
///
/// Run the simulated charge, then settle atomically. A declined charge
/// leaves the reservation pending and returns 402; the client retries.
pub async fn pay(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<DbId>,
    Json(source): Json<PaymentSource>,
) -> AppResult<Json<Reservation>> {
    let reservation = ReservationRepo::find_for_user(&state.pool, id, user.user_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "reservation", id }))?;

    if reservation.status != ReservationStatus::Pending {
        return Err(AppError::Core(CoreError::Conflict(
            "This reservation has already been processed".into(),
        )));
    }

    // Resolve the card to charge. The PAN and CVV never leave this scope.
    let (descriptor, last_four, save_card) = match source {
        PaymentSource::ExistingCard { card_id } => {
            let card = CardRepo::find_for_user(&state.pool, card_id, user.user_id)
                .await?
                .ok_or(AppError::Core(CoreError::NotFound { entity: "card", id: card_id }))?;
            (
                masked_descriptor(card.network, &card.last_four),
                card.last_four,
                None,
            )
        }
        PaymentSource::NewCard { name, number, expiry, cvv, save_card } => {
            let card = validate_new_card(&name, &number, &expiry, &cvv).map_err(AppError::Core)?;
            let descriptor = masked_descriptor(card.network, &card.last_four);
            let saved = save_card.then(|| CreateCard {
                user_id: user.user_id,
                name: card.name,
                last_four: card.last_four.clone(),
                network: card.network,
                expiry: card.expiry,
            });
            (descriptor, card.last_four, saved)
        }
    };

    if !state.gateway.charge(&last_four).await {
        tracing::info!(reservation_id = id, "Payment declined by gateway");
        return Err(AppError::Core(CoreError::PaymentDeclined(
            "The payment was declined. Please try again.".into(),
        )));
    }

    let settled =
        ReservationRepo::settle_payment(&state.pool, id, &descriptor, save_card.as_ref())
            .await?
            .ok_or_else(|| {
                AppError::Core(CoreError::Conflict(
                    "This reservation has already been processed".into(),
                ))
            })?;

    tracing::info!(reservation_id = id, method = %descriptor, "Payment settled");
    notify_confirmation(&state, &settled).await;

    Ok(Json(settled))
}

// ---------------------------------------------------------------------------
// Email helpers (fire-and-forget)
// ---------------------------------------------------------------------------

async fn notify_confirmation(state: &AppState, reservation: &Reservation) {
    let Some(mailer) = state.mailer.clone() else { return };
    let Ok(Some(user)) = UserRepo::find_by_id(&state.pool, reservation.user_id).await else {
        return;
    };
    let Ok(Some(space)) = SpaceRepo::find_by_id(&state.pool, reservation.space_id).await else {
        return;
    };
    let message = messages::payment_confirmation(&user.display_name(), reservation, &space);
    tokio::spawn(async move {
        mailer.send_best_effort(&user.email, &message).await;
    });
}

async fn notify_cancellation(state: &AppState, reservation: &Reservation) {
    let Some(mailer) = state.mailer.clone() else { return };
    let Ok(Some(user)) = UserRepo::find_by_id(&state.pool, reservation.user_id).await else {
        return;
    };
    let Ok(Some(space)) = SpaceRepo::find_by_id(&state.pool, reservation.space_id).await else {
        return;
    };
    let message = messages::reservation_cancelled(&user.display_name(), reservation, &space);
    tokio::spawn(async move {
        mailer.send_best_effort(&user.email, &message).await;
    });
}
