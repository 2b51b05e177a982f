//! Handlers for the authenticated user's own account.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::ValidateEmail;

use pointpro_core::error::CoreError;
use pointpro_db::models::profile::{Profile, UpdateProfile};
use pointpro_db::models::user::{UpdateUser, User, UserResponse};
use pointpro_db::repositories::{ProfileRepo, UserRepo};

use crate::auth::password::{hash_password, validate_password_strength, verify_password};
use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAuth;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Response for `GET /me`: identity plus profile.
#[derive(Debug, Serialize)]
pub struct AccountResponse {
    pub user: UserResponse,
    pub profile: Profile,
}

/// Request body for `PUT /me`. Identity and profile fields in one typed
/// struct; absent fields are left unchanged.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateAccountRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub postal_code: Option<String>,
    pub city: Option<String>,
    pub gender: Option<String>,
    pub nationality: Option<String>,
    pub public_name: Option<String>,
    pub birth_date: Option<NaiveDate>,
}

/// Request body for `POST /me/security/password`.
#[derive(Debug, Deserialize)]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

/// Request body for `DELETE /me` (password-confirmed).
#[derive(Debug, Deserialize)]
pub struct DeleteAccountRequest {
    pub password: String,
}

fn account_response(user: User, profile: Profile) -> AccountResponse {
    AccountResponse {
        user: UserResponse {
            id: user.id,
            username: user.username,
            email: user.email,
            first_name: user.first_name,
            last_name: user.last_name,
            role: profile.role.clone(),
            is_active: user.is_active,
            last_login_at: user.last_login_at,
            created_at: user.created_at,
        },
        profile,
    }
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/me
pub async fn get_me(
    State(state): State<AppState>,
    RequireAuth(auth): RequireAuth,
) -> AppResult<Json<AccountResponse>> {
    let user = UserRepo::find_by_id(&state.pool, auth.user_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "user", id: auth.user_id }))?;
    let profile = ProfileRepo::find_by_user(&state.pool, auth.user_id)
        .await?
        .ok_or_else(|| AppError::InternalError("Account has no profile".into()))?;
    Ok(Json(account_response(user, profile)))
}

/// PUT /api/v1/me
pub async fn update_me(
    State(state): State<AppState>,
    RequireAuth(auth): RequireAuth,
    Json(input): Json<UpdateAccountRequest>,
) -> AppResult<Json<AccountResponse>> {
    if let Some(email) = &input.email {
        if !email.validate_email() {
            return Err(AppError::Core(CoreError::Validation(
                "Invalid email address".into(),
            )));
        }
    }

    let user_update = UpdateUser {
        first_name: input.first_name,
        last_name: input.last_name,
        email: input.email.map(|e| e.trim().to_lowercase()),
    };
    let profile_update = UpdateProfile {
        phone: input.phone,
        address: input.address,
        postal_code: input.postal_code,
        city: input.city,
        gender: input.gender,
        nationality: input.nationality,
        public_name: input.public_name,
        birth_date: input.birth_date,
    };

    let user = UserRepo::update(&state.pool, auth.user_id, &user_update)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "user", id: auth.user_id }))?;
    let profile = ProfileRepo::update(&state.pool, auth.user_id, &profile_update)
        .await?
        .ok_or_else(|| AppError::InternalError("Account has no profile".into()))?;

    Ok(Json(account_response(user, profile)))
}

/// POST /api/v1/me/security/password
pub async fn change_password(
    State(state): State<AppState>,
    RequireAuth(auth): RequireAuth,
    Json(input): Json<ChangePasswordRequest>,
) -> AppResult<StatusCode> {
    validate_password_strength(&input.new_password)
        .map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;

    let user = UserRepo::find_by_id(&state.pool, auth.user_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "user", id: auth.user_id }))?;

    let valid = verify_password(&input.current_password, &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;
    if !valid {
        return Err(AppError::Core(CoreError::Unauthorized(
            "Current password is incorrect".into(),
        )));
    }

    let hash = hash_password(&input.new_password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;
    UserRepo::set_password(&state.pool, auth.user_id, &hash).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/v1/me
///
/// Password-confirmed. Cascades to profile, cards, reservations,
/// favorites, and sessions.
pub async fn delete_me(
    State(state): State<AppState>,
    RequireAuth(auth): RequireAuth,
    Json(input): Json<DeleteAccountRequest>,
) -> AppResult<StatusCode> {
    let user = UserRepo::find_by_id(&state.pool, auth.user_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "user", id: auth.user_id }))?;

    let valid = verify_password(&input.password, &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;
    if !valid {
        return Err(AppError::Core(CoreError::Unauthorized(
            "Password is incorrect".into(),
        )));
    }

    UserRepo::delete(&state.pool, auth.user_id).await?;
    tracing::info!(user_id = auth.user_id, "Account deleted");
    Ok(StatusCode::NO_CONTENT)
}
