//! JWT-based authentication extractor for Axum handlers.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use pointpro_core::device::{device_label, forwarded_ip};
use pointpro_core::error::CoreError;
use pointpro_core::types::DbId;
use pointpro_db::repositories::{ActiveSessionRepo, SessionRepo};

use crate::auth::jwt::validate_token;
use crate::error::AppError;
use crate::state::AppState;

/// Authenticated user extracted from a JWT Bearer token in the `Authorization` header.
///
/// Use this as an extractor parameter in any handler that requires authentication:
///
/// ```ignore
/// async fn my_handler(user: AuthUser) -> AppResult<Json<()>> {
///     tracing::info!(user_id = user.user_id, role = %user.role, "handling request");
///     Ok(Json(()))
/// }
/// ```
///
/// Extraction also checks the token's `sid` claim against the session
/// store: a revoked or logged-out session is rejected even while its
/// access token is unexpired. Successful extraction refreshes the
/// activity stamp of the device row created at login.
#[derive(Debug, Clone)]
pub struct AuthUser {
    /// The user's internal database id (from `claims.sub`).
    pub user_id: DbId,
    /// The user's role name (`"client"`, `"technician"`, `"admin"`).
    pub role: String,
    /// The session key from the token's `sid` claim.
    pub session_key: String,
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| {
                AppError::Core(CoreError::Unauthorized(
                    "Missing Authorization header".into(),
                ))
            })?;

        let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(
                "Invalid Authorization format. Expected: Bearer <token>".into(),
            ))
        })?;

        let claims = validate_token(token, &state.config.jwt).map_err(|_| {
            AppError::Core(CoreError::Unauthorized("Invalid or expired token".into()))
        })?;

        // The token is only as good as its session: revocation must bite
        // before the access token expires.
        if !SessionRepo::is_live(&state.pool, &claims.sid).await? {
            return Err(AppError::Core(CoreError::Unauthorized(
                "Session has been revoked".into(),
            )));
        }

        // Keep the per-device activity row current. Best-effort, and
        // update-only: a failure must not reject the request, and a row
        // removed by revocation must not come back.
        let user_agent = parts
            .headers
            .get("user-agent")
            .and_then(|v| v.to_str().ok())
            .unwrap_or("");
        let ip = parts
            .headers
            .get("x-forwarded-for")
            .and_then(|v| v.to_str().ok())
            .and_then(forwarded_ip);

        if let Err(err) = ActiveSessionRepo::record_activity(
            &state.pool,
            &claims.sid,
            device_label(user_agent),
            ip,
        )
        .await
        {
            tracing::warn!(user_id = claims.sub, error = %err, "Active session update failed");
        }

        Ok(AuthUser {
            user_id: claims.sub,
            role: claims.role,
            session_key: claims.sid,
        })
    }
}
