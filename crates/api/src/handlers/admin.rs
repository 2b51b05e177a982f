//! Handlers for the admin back office: dashboard counters, space and
//! reservation management, client and technician accounts.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::{NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use validator::ValidateEmail;

use pointpro_core::error::CoreError;
use pointpro_core::reservation::{total_price, ReservationStatus, Slot};
use pointpro_core::roles::{ROLE_CLIENT, ROLE_TECHNICIAN};
use pointpro_core::types::DbId;
use pointpro_db::models::intervention::{Intervention, TechnicianStats};
use pointpro_db::models::profile::{Profile, UpdateProfile};
use pointpro_db::models::reservation::{CreateReservation, Reservation, UpdateReservation};
use pointpro_db::models::space::{CreateSpace, Space, UpdateSpace};
use pointpro_db::models::user::{CreateUser, UpdateUser, User, UserResponse};
use pointpro_db::repositories::{
    InterventionRepo, ProfileRepo, ReservationRepo, SpaceRepo, UserRepo,
};

use crate::auth::password::{hash_password, validate_password_strength};
use crate::error::{AppError, AppResult};
use crate::handlers::auth::unique_username;
use crate::middleware::rbac::RequireAdmin;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Dashboard / statistics
// ---------------------------------------------------------------------------

/// Platform-wide counters shown on the dashboard and statistics pages.
#[derive(Debug, Serialize)]
pub struct DashboardResponse {
    pub spaces: i64,
    pub clients: i64,
    pub reservations: i64,
    pub technicians: i64,
}

async fn counters(state: &AppState) -> AppResult<DashboardResponse> {
    Ok(DashboardResponse {
        spaces: SpaceRepo::count(&state.pool).await?,
        clients: UserRepo::count_by_role(&state.pool, ROLE_CLIENT).await?,
        reservations: ReservationRepo::count(&state.pool).await?,
        technicians: UserRepo::count_by_role(&state.pool, ROLE_TECHNICIAN).await?,
    })
}

/// GET /api/v1/admin/dashboard
pub async fn dashboard(
    State(state): State<AppState>,
    RequireAdmin(_): RequireAdmin,
) -> AppResult<Json<DashboardResponse>> {
    Ok(Json(counters(&state).await?))
}

/// GET /api/v1/admin/statistics
///
/// Same counters as the dashboard, kept as its own endpoint because the
/// back office links to both pages.
pub async fn statistics(
    State(state): State<AppState>,
    RequireAdmin(_): RequireAdmin,
) -> AppResult<Json<DashboardResponse>> {
    Ok(Json(counters(&state).await?))
}

// ---------------------------------------------------------------------------
// Spaces
// ---------------------------------------------------------------------------

/// GET /api/v1/admin/spaces -- all spaces, including unavailable ones.
pub async fn list_spaces(
    State(state): State<AppState>,
    RequireAdmin(_): RequireAdmin,
) -> AppResult<Json<Vec<Space>>> {
    Ok(Json(SpaceRepo::list_all(&state.pool).await?))
}

/// POST /api/v1/admin/spaces
pub async fn create_space(
    State(state): State<AppState>,
    RequireAdmin(_): RequireAdmin,
    Json(input): Json<CreateSpace>,
) -> AppResult<(StatusCode, Json<Space>)> {
    if input.name.trim().is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "Space name is required".into(),
        )));
    }
    if input.capacity <= 0 {
        return Err(AppError::Core(CoreError::Validation(
            "Capacity must be positive".into(),
        )));
    }
    if input.price_per_hour < 0.0 {
        return Err(AppError::Core(CoreError::Validation(
            "Price must not be negative".into(),
        )));
    }
    let space = SpaceRepo::create(&state.pool, &input).await?;
    Ok((StatusCode::CREATED, Json(space)))
}

/// PUT /api/v1/admin/spaces/{id}
pub async fn update_space(
    State(state): State<AppState>,
    RequireAdmin(_): RequireAdmin,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateSpace>,
) -> AppResult<Json<Space>> {
    let space = SpaceRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "space", id }))?;
    Ok(Json(space))
}

/// DELETE /api/v1/admin/spaces/{id}
///
/// Hard delete; reservations, incidents, interventions, and favorites go
/// with it.
pub async fn delete_space(
    State(state): State<AppState>,
    RequireAdmin(_): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if !SpaceRepo::delete(&state.pool, id).await? {
        return Err(AppError::Core(CoreError::NotFound { entity: "space", id }));
    }
    tracing::info!(space_id = id, "Space deleted");
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Reservations
// ---------------------------------------------------------------------------

/// Request body for `POST /admin/reservations`: booking on behalf of a
/// client. The price is derived, never taken from the request.
#[derive(Debug, Deserialize)]
pub struct AdminCreateReservation {
    pub user_id: DbId,
    pub space_id: DbId,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub duration_hours: i32,
}

/// GET /api/v1/admin/reservations
pub async fn list_reservations(
    State(state): State<AppState>,
    RequireAdmin(_): RequireAdmin,
) -> AppResult<Json<Vec<Reservation>>> {
    Ok(Json(ReservationRepo::list_all(&state.pool).await?))
}

/// POST /api/v1/admin/reservations
pub async fn create_reservation(
    State(state): State<AppState>,
    RequireAdmin(_): RequireAdmin,
    Json(input): Json<AdminCreateReservation>,
) -> AppResult<(StatusCode, Json<Reservation>)> {
    let space = SpaceRepo::find_by_id(&state.pool, input.space_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "space", id: input.space_id }))?;
    UserRepo::find_by_id(&state.pool, input.user_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "user", id: input.user_id }))?;

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

    let reservation = ReservationRepo::create(
        &state.pool,
        &CreateReservation {
            user_id: input.user_id,
            space_id: space.id,
            date: slot.date,
            start_time: slot.start_time,
            duration_hours: slot.duration_hours,
            total_price: total_price(space.price_per_hour, slot.duration_hours),
        },
    )
    .await?;
    Ok((StatusCode::CREATED, Json(reservation)))
}

/// PUT /api/v1/admin/reservations/{id}
pub async fn update_reservation(
    State(state): State<AppState>,
    RequireAdmin(_): RequireAdmin,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateReservation>,
) -> AppResult<Json<Reservation>> {
    let reservation = ReservationRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "reservation", id }))?;
    Ok(Json(reservation))
}

/// DELETE /api/v1/admin/reservations/{id}
pub async fn delete_reservation(
    State(state): State<AppState>,
    RequireAdmin(_): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if !ReservationRepo::delete(&state.pool, id).await? {
        return Err(AppError::Core(CoreError::NotFound { entity: "reservation", id }));
    }
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/admin/reservations/{id}/validate
pub async fn validate_reservation(
    State(state): State<AppState>,
    RequireAdmin(_): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<Json<Reservation>> {
    set_reservation_status(&state, id, ReservationStatus::Confirmed).await
}

/// POST /api/v1/admin/reservations/{id}/refuse
pub async fn refuse_reservation(
    State(state): State<AppState>,
    RequireAdmin(_): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<Json<Reservation>> {
    set_reservation_status(&state, id, ReservationStatus::Refused).await
}

async fn set_reservation_status(
    state: &AppState,
    id: DbId,
    status: ReservationStatus,
) -> AppResult<Json<Reservation>> {
    let reservation = ReservationRepo::set_status(&state.pool, id, status)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "reservation", id }))?;
    Ok(Json(reservation))
}

// ---------------------------------------------------------------------------
// Clients
// ---------------------------------------------------------------------------

/// Request body for creating a client or technician from the back office.
#[derive(Debug, Deserialize)]
pub struct AdminCreateAccount {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    /// Client accounts require a password; technician accounts default to
    /// the last name and are flagged for a forced change.
    pub password: Option<String>,
    pub phone: Option<String>,
    pub city: Option<String>,
}

/// Request body for editing an account (identity + profile inline).
#[derive(Debug, Default, Deserialize)]
pub struct AdminUpdateAccount {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub postal_code: Option<String>,
    pub city: Option<String>,
}

fn to_user_response(user: User, role: &str) -> UserResponse {
    UserResponse {
        id: user.id,
        username: user.username,
        email: user.email,
        first_name: user.first_name,
        last_name: user.last_name,
        role: role.to_string(),
        is_active: user.is_active,
        last_login_at: user.last_login_at,
        created_at: user.created_at,
    }
}

/// GET /api/v1/admin/clients
pub async fn list_clients(
    State(state): State<AppState>,
    RequireAdmin(_): RequireAdmin,
) -> AppResult<Json<Vec<UserResponse>>> {
    let users = UserRepo::list_by_role(&state.pool, ROLE_CLIENT).await?;
    Ok(Json(users.into_iter().map(|u| to_user_response(u, ROLE_CLIENT)).collect()))
}

/// POST /api/v1/admin/clients
pub async fn create_client(
    State(state): State<AppState>,
    RequireAdmin(_): RequireAdmin,
    Json(input): Json<AdminCreateAccount>,
) -> AppResult<(StatusCode, Json<UserResponse>)> {
    let (user, _) = create_account(&state, &input, ROLE_CLIENT, false).await?;
    Ok((StatusCode::CREATED, Json(to_user_response(user, ROLE_CLIENT))))
}

/// PUT /api/v1/admin/clients/{id}
pub async fn update_client(
    State(state): State<AppState>,
    RequireAdmin(_): RequireAdmin,
    Path(id): Path<DbId>,
    Json(input): Json<AdminUpdateAccount>,
) -> AppResult<Json<UserResponse>> {
    update_account(&state, id, input, ROLE_CLIENT).await
}

/// DELETE /api/v1/admin/clients/{id}
pub async fn delete_client(
    State(state): State<AppState>,
    RequireAdmin(_): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    delete_account(&state, id).await
}

// ---------------------------------------------------------------------------
// Technicians
// ---------------------------------------------------------------------------

/// Response for `GET /admin/technicians/{id}/performance`.
#[derive(Debug, Serialize)]
pub struct TechnicianPerformance {
    pub technician: UserResponse,
    pub stats: TechnicianStats,
    pub recent_interventions: Vec<Intervention>,
}

/// How many recent interventions the performance view shows.
const RECENT_INTERVENTIONS: usize = 10;

/// GET /api/v1/admin/technicians
pub async fn list_technicians(
    State(state): State<AppState>,
    RequireAdmin(_): RequireAdmin,
) -> AppResult<Json<Vec<UserResponse>>> {
    let users = UserRepo::list_by_role(&state.pool, ROLE_TECHNICIAN).await?;
    Ok(Json(users.into_iter().map(|u| to_user_response(u, ROLE_TECHNICIAN)).collect()))
}

/// POST /api/v1/admin/technicians
///
/// The provisional password is the lowercased last name; the account is
/// flagged so the first login forces a change.
pub async fn create_technician(
    State(state): State<AppState>,
    RequireAdmin(_): RequireAdmin,
    Json(input): Json<AdminCreateAccount>,
) -> AppResult<(StatusCode, Json<UserResponse>)> {
    let (user, _) = create_account(&state, &input, ROLE_TECHNICIAN, true).await?;
    UserRepo::require_password_change(&state.pool, user.id).await?;
    Ok((StatusCode::CREATED, Json(to_user_response(user, ROLE_TECHNICIAN))))
}

/// PUT /api/v1/admin/technicians/{id}
pub async fn update_technician(
    State(state): State<AppState>,
    RequireAdmin(_): RequireAdmin,
    Path(id): Path<DbId>,
    Json(input): Json<AdminUpdateAccount>,
) -> AppResult<Json<UserResponse>> {
    update_account(&state, id, input, ROLE_TECHNICIAN).await
}

/// DELETE /api/v1/admin/technicians/{id}
pub async fn delete_technician(
    State(state): State<AppState>,
    RequireAdmin(_): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    delete_account(&state, id).await
}

/// GET /api/v1/admin/technicians/{id}/performance
pub async fn technician_performance(
    State(state): State<AppState>,
    RequireAdmin(_): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<Json<TechnicianPerformance>> {
    let user = UserRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "technician", id }))?;
    let profile = ProfileRepo::find_by_user(&state.pool, id)
        .await?
        .filter(|p| p.role == ROLE_TECHNICIAN)
        .ok_or(AppError::Core(CoreError::NotFound { entity: "technician", id }))?;

    let stats = InterventionRepo::technician_stats(&state.pool, profile.id).await?;
    let mut recent = InterventionRepo::list_by_technician(&state.pool, profile.id).await?;
    recent.truncate(RECENT_INTERVENTIONS);

    Ok(Json(TechnicianPerformance {
        technician: to_user_response(user, ROLE_TECHNICIAN),
        stats,
        recent_interventions: recent,
    }))
}

// ---------------------------------------------------------------------------
// Shared account helpers
// ---------------------------------------------------------------------------

async fn create_account(
    state: &AppState,
    input: &AdminCreateAccount,
    role: &str,
    default_password_from_last_name: bool,
) -> AppResult<(User, Profile)> {
    let email = input.email.trim().to_lowercase();
    if !email.validate_email() {
        return Err(AppError::Core(CoreError::Validation(
            "Invalid email address".into(),
        )));
    }
    if UserRepo::email_taken(&state.pool, &email).await? {
        return Err(AppError::Core(CoreError::Conflict(
            "An account with this email already exists".into(),
        )));
    }

    let password = match (&input.password, default_password_from_last_name) {
        (Some(p), _) => {
            validate_password_strength(p)
                .map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;
            p.clone()
        }
        (None, true) => input.last_name.trim().to_lowercase(),
        (None, false) => {
            return Err(AppError::Core(CoreError::Validation(
                "A password is required".into(),
            )));
        }
    };

    let username = unique_username(state, &email).await?;
    let password_hash = hash_password(&password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let (user, profile) = UserRepo::create_with_profile(
        &state.pool,
        &CreateUser {
            username,
            email,
            password_hash,
            first_name: input.first_name.trim().to_string(),
            last_name: input.last_name.trim().to_string(),
        },
        role,
    )
    .await?;

    if input.phone.is_some() || input.city.is_some() {
        ProfileRepo::update(
            &state.pool,
            user.id,
            &UpdateProfile {
                phone: input.phone.clone(),
                city: input.city.clone(),
                ..Default::default()
            },
        )
        .await?;
    }

    Ok((user, profile))
}

async fn update_account(
    state: &AppState,
    id: DbId,
    input: AdminUpdateAccount,
    expected_role: &str,
) -> AppResult<Json<UserResponse>> {
    ProfileRepo::find_by_user(&state.pool, id)
        .await?
        .filter(|p| p.role == expected_role)
        .ok_or(AppError::Core(CoreError::NotFound { entity: "user", id }))?;

    if let Some(email) = &input.email {
        if !email.validate_email() {
            return Err(AppError::Core(CoreError::Validation(
                "Invalid email address".into(),
            )));
        }
    }

    let user = UserRepo::update(
        &state.pool,
        id,
        &UpdateUser {
            first_name: input.first_name,
            last_name: input.last_name,
            email: input.email.map(|e| e.trim().to_lowercase()),
        },
    )
    .await?
    .ok_or(AppError::Core(CoreError::NotFound { entity: "user", id }))?;

    ProfileRepo::update(
        &state.pool,
        id,
        &UpdateProfile {
            phone: input.phone,
            address: input.address,
            postal_code: input.postal_code,
            city: input.city,
            ..Default::default()
        },
    )
    .await?;

    Ok(Json(to_user_response(user, expected_role)))
}

async fn delete_account(state: &AppState, id: DbId) -> AppResult<StatusCode> {
    if !UserRepo::delete(&state.pool, id).await? {
        return Err(AppError::Core(CoreError::NotFound { entity: "user", id }));
    }
    tracing::info!(user_id = id, "Account deleted by admin");
    Ok(StatusCode::NO_CONTENT)
}
