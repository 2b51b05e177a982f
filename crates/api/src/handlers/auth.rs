//! Handlers for the `/auth` resource: signup, login, token refresh,
//! logout, and the password-reset flow.

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::ValidateEmail;

use pointpro_core::device::{device_label, forwarded_ip};
use pointpro_core::error::CoreError;
use pointpro_core::roles::ROLE_CLIENT;
use pointpro_core::types::DbId;
use pointpro_db::models::session::CreateSession;
use pointpro_db::models::user::CreateUser;
use pointpro_db::repositories::{
    ActiveSessionRepo, PasswordResetRepo, ProfileRepo, SessionRepo, UserRepo,
};
use pointpro_events::messages;

use crate::auth::jwt::{generate_access_token, generate_opaque_token, hash_opaque_token};
use crate::auth::password::{hash_password, validate_password_strength, verify_password};
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /auth/signup`.
#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
}

/// Request body for `POST /auth/login`.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Request body for `POST /auth/refresh`.
#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

/// Request body for `POST /auth/password-reset/request`.
#[derive(Debug, Deserialize)]
pub struct PasswordResetRequest {
    pub email: String,
}

/// Request body for `POST /auth/password-reset/confirm`.
#[derive(Debug, Deserialize)]
pub struct PasswordResetConfirm {
    pub token: String,
    pub new_password: String,
}

/// Successful authentication response returned by signup, login, and refresh.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub refresh_token: String,
    /// Access token lifetime in seconds.
    pub expires_in: i64,
    pub user: UserInfo,
}

/// Public user info embedded in [`AuthResponse`].
#[derive(Debug, Serialize)]
pub struct UserInfo {
    pub id: DbId,
    pub username: String,
    pub email: String,
    /// Role, so the front end can route to the right console.
    pub role: String,
    /// Provisional-password accounts must change it before anything else.
    pub must_change_password: bool,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/auth/signup
///
/// Create a client account and log it straight in. The username is derived
/// from the email local part; a duplicate email is a 409.
pub async fn signup(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(input): Json<SignupRequest>,
) -> AppResult<(StatusCode, Json<AuthResponse>)> {
    let email = input.email.trim().to_lowercase();
    if !email.validate_email() {
        return Err(AppError::Core(CoreError::Validation(
            "Invalid email address".into(),
        )));
    }
    validate_password_strength(&input.password)
        .map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;

    if UserRepo::email_taken(&state.pool, &email).await? {
        return Err(AppError::Core(CoreError::Conflict(
            "An account with this email already exists".into(),
        )));
    }

    let username = unique_username(&state, &email).await?;
    let password_hash = hash_password(&input.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let create = CreateUser {
        username,
        email,
        password_hash,
        first_name: input.first_name.trim().to_string(),
        last_name: input.last_name.trim().to_string(),
    };
    let (user, _profile) = UserRepo::create_with_profile(&state.pool, &create, ROLE_CLIENT).await?;

    let response = create_auth_response(&state, &headers, user.id, &user.username, &user.email,
        ROLE_CLIENT, user.must_change_password)
        .await?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// POST /api/v1/auth/login
///
/// Authenticate with email + password. Returns access and refresh tokens.
pub async fn login(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(input): Json<LoginRequest>,
) -> AppResult<Json<AuthResponse>> {
    let email = input.email.trim().to_lowercase();

    let user = UserRepo::find_by_email(&state.pool, &email)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized("Invalid email or password".into()))
        })?;

    if !user.is_active {
        return Err(AppError::Core(CoreError::Forbidden(
            "Account is deactivated".into(),
        )));
    }

    let password_valid = verify_password(&input.password, &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;
    if !password_valid {
        return Err(AppError::Core(CoreError::Unauthorized(
            "Invalid email or password".into(),
        )));
    }

    UserRepo::record_login(&state.pool, user.id).await?;

    let profile = ProfileRepo::find_by_user(&state.pool, user.id)
        .await?
        .ok_or_else(|| AppError::InternalError("Account has no profile".into()))?;

    let response = create_auth_response(&state, &headers, user.id, &user.username, &user.email,
        &profile.role, user.must_change_password)
        .await?;
    Ok(Json(response))
}

/// POST /api/v1/auth/refresh
///
/// Exchange a valid refresh token for new access + refresh tokens. The
/// session key is carried over so the device keeps its activity row.
pub async fn refresh(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(input): Json<RefreshRequest>,
) -> AppResult<Json<AuthResponse>> {
    let token_hash = hash_opaque_token(&input.refresh_token);

    let session = SessionRepo::find_by_refresh_token_hash(&state.pool, &token_hash)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(
                "Invalid or expired refresh token".into(),
            ))
        })?;

    // Token rotation: the old refresh token is single-use.
    SessionRepo::revoke(&state.pool, session.id).await?;

    let user = UserRepo::find_by_id(&state.pool, session.user_id)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::Unauthorized("User no longer exists".into())))?;

    if !user.is_active {
        return Err(AppError::Core(CoreError::Forbidden(
            "Account is deactivated".into(),
        )));
    }

    let profile = ProfileRepo::find_by_user(&state.pool, user.id)
        .await?
        .ok_or_else(|| AppError::InternalError("Account has no profile".into()))?;

    let response = issue_tokens(&state, &headers, user.id, &user.username, &user.email,
        &profile.role, user.must_change_password, session.session_key)
        .await?;
    Ok(Json(response))
}

/// POST /api/v1/auth/logout
///
/// Revoke the current device's session and drop its activity row.
/// Returns 204 No Content.
pub async fn logout(State(state): State<AppState>, user: AuthUser) -> AppResult<StatusCode> {
    SessionRepo::revoke_by_key(&state.pool, &user.session_key).await?;
    ActiveSessionRepo::delete_by_key(&state.pool, &user.session_key).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/auth/password-reset/request
///
/// Always 204 so callers cannot probe which emails have accounts. The reset
/// link goes out by email; send failures are logged only.
pub async fn password_reset_request(
    State(state): State<AppState>,
    Json(input): Json<PasswordResetRequest>,
) -> AppResult<StatusCode> {
    let email = input.email.trim().to_lowercase();

    if let Some(user) = UserRepo::find_by_email(&state.pool, &email).await? {
        let (plaintext, hash) = generate_opaque_token();
        PasswordResetRepo::create(&state.pool, user.id, &hash).await?;

        let reset_url = format!("{}/reset-password?token={plaintext}", state.config.app_base_url);
        let message = messages::password_reset(&user.display_name(), &reset_url);

        if let Some(mailer) = state.mailer.clone() {
            tokio::spawn(async move {
                mailer.send_best_effort(&email, &message).await;
            });
        } else {
            tracing::warn!(to = %email, "SMTP not configured, reset email not sent");
        }
    }

    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/auth/password-reset/confirm
///
/// Burn the single-use token, set the new password, and revoke every
/// session so old devices must log in again.
pub async fn password_reset_confirm(
    State(state): State<AppState>,
    Json(input): Json<PasswordResetConfirm>,
) -> AppResult<StatusCode> {
    validate_password_strength(&input.new_password)
        .map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;

    let hash = hash_opaque_token(&input.token);
    let reset = PasswordResetRepo::find_valid_by_hash(&state.pool, &hash)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(
                "Invalid or expired reset token".into(),
            ))
        })?;

    let password_hash = hash_password(&input.new_password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;
    UserRepo::set_password(&state.pool, reset.user_id, &password_hash).await?;
    PasswordResetRepo::mark_used(&state.pool, reset.id).await?;
    SessionRepo::revoke_all_for_user(&state.pool, reset.user_id).await?;

    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Derive a username from the email local part, suffixing a counter until
/// it is free (`ada`, `ada2`, `ada3`, ...).
pub async fn unique_username(state: &AppState, email: &str) -> AppResult<String> {
    let base: String = email
        .split('@')
        .next()
        .unwrap_or("user")
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '.' || *c == '_' || *c == '-')
        .collect();
    let base = if base.is_empty() { "user".to_string() } else { base };

    if !UserRepo::username_taken(&state.pool, &base).await? {
        return Ok(base);
    }
    for n in 2.. {
        let candidate = format!("{base}{n}");
        if !UserRepo::username_taken(&state.pool, &candidate).await? {
            return Ok(candidate);
        }
    }
    unreachable!("counter loop is unbounded")
}

/// Generate tokens under a fresh session key and persist the session row.
async fn create_auth_response(
    state: &AppState,
    headers: &HeaderMap,
    user_id: DbId,
    username: &str,
    email: &str,
    role: &str,
    must_change_password: bool,
) -> AppResult<AuthResponse> {
    let session_key = Uuid::new_v4().to_string();
    issue_tokens(state, headers, user_id, username, email, role, must_change_password, session_key)
        .await
}

/// Generate access + refresh tokens for an existing session key, persist a
/// session row, and build the response.
#[allow(clippy::too_many_arguments)]
async fn issue_tokens(
    state: &AppState,
    headers: &HeaderMap,
    user_id: DbId,
    username: &str,
    email: &str,
    role: &str,
    must_change_password: bool,
    session_key: String,
) -> AppResult<AuthResponse> {
    let access_token = generate_access_token(user_id, role, &session_key, &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;

    let (refresh_plaintext, refresh_hash) = generate_opaque_token();

    let expires_at =
        Utc::now() + chrono::Duration::days(state.config.jwt.refresh_token_expiry_days);

    let user_agent = headers
        .get("user-agent")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let ip_address = headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(forwarded_ip)
        .map(str::to_string);

    let session_input = CreateSession {
        user_id,
        session_key,
        refresh_token_hash: refresh_hash,
        expires_at,
        user_agent,
        ip_address,
    };
    SessionRepo::create(&state.pool, &session_input).await?;

    // The device row the "manage my sessions" view lists. Created here so
    // that revocation can delete it for good: request-time activity updates
    // never recreate it.
    ActiveSessionRepo::touch(
        &state.pool,
        user_id,
        &session_input.session_key,
        device_label(session_input.user_agent.as_deref().unwrap_or("")),
        session_input.ip_address.as_deref(),
    )
    .await?;

    let expires_in = state.config.jwt.access_token_expiry_mins * 60;

    Ok(AuthResponse {
        access_token,
        refresh_token: refresh_plaintext,
        expires_in,
        user: UserInfo {
            id: user_id,
            username: username.to_string(),
            email: email.to_string(),
            role: role.to_string(),
            must_change_password,
        },
    })
}
