//! Session models: refresh-token sessions and per-device activity rows.

use serde::Serialize;
use sqlx::FromRow;

use pointpro_core::types::{DbId, Timestamp};

/// A refresh-token session row from the `user_sessions` table.
#[derive(Debug, Clone, FromRow)]
pub struct UserSession {
    pub id: DbId,
    pub user_id: DbId,
    /// Opaque key shared with the matching `active_sessions` row and
    /// carried in the access token's `sid` claim.
    pub session_key: String,
    pub refresh_token_hash: String,
    pub expires_at: Timestamp,
    pub is_revoked: bool,
    pub user_agent: Option<String>,
    pub ip_address: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new refresh-token session.
pub struct CreateSession {
    pub user_id: DbId,
    pub session_key: String,
    pub refresh_token_hash: String,
    pub expires_at: Timestamp,
    pub user_agent: Option<String>,
    pub ip_address: Option<String>,
}

/// A device-activity row from the `active_sessions` table, created when
/// tokens are issued and stamped on every authenticated request.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ActiveSession {
    pub id: DbId,
    pub user_id: DbId,
    pub session_key: String,
    pub device_info: String,
    pub ip_address: Option<String>,
    pub last_activity: Timestamp,
    pub created_at: Timestamp,
}
