//! Repository for the `user_sessions` table (refresh-token sessions).

use sqlx::PgPool;

use pointpro_core::types::DbId;

use crate::models::session::{CreateSession, UserSession};

/// Provides CRUD operations for refresh-token sessions.
pub struct SessionRepo;

impl SessionRepo {
    /// Insert a new session, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateSession) -> Result<UserSession, sqlx::Error> {
        sqlx::query_as::<_, UserSession>(
            "INSERT INTO user_sessions
                (user_id, session_key, refresh_token_hash, expires_at, user_agent, ip_address)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING *",
        )
        .bind(input.user_id)
        .bind(&input.session_key)
        .bind(&input.refresh_token_hash)
        .bind(input.expires_at)
        .bind(&input.user_agent)
        .bind(&input.ip_address)
        .fetch_one(pool)
        .await
    }

    /// Find an active session by its refresh token hash.
    ///
    /// Only returns sessions that are not revoked and not expired.
    pub async fn find_by_refresh_token_hash(
        pool: &PgPool,
        hash: &str,
    ) -> Result<Option<UserSession>, sqlx::Error> {
        sqlx::query_as::<_, UserSession>(
            "SELECT * FROM user_sessions
             WHERE refresh_token_hash = $1
               AND is_revoked = FALSE
               AND expires_at > NOW()",
        )
        .bind(hash)
        .fetch_optional(pool)
        .await
    }

    /// Whether a session key still has a live (non-revoked, unexpired)
    /// session. Access tokens carry the key in their `sid` claim; this is
    /// what makes revocation bite before the token expires.
    pub async fn is_live(pool: &PgPool, session_key: &str) -> Result<bool, sqlx::Error> {
        let (live,): (bool,) = sqlx::query_as(
            "SELECT EXISTS(
                SELECT 1 FROM user_sessions
                WHERE session_key = $1 AND is_revoked = FALSE AND expires_at > NOW())",
        )
        .bind(session_key)
        .fetch_one(pool)
        .await?;
        Ok(live)
    }

    /// Revoke a single session. Returns `true` if the row was updated.
    pub async fn revoke(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE user_sessions SET is_revoked = TRUE, updated_at = NOW()
             WHERE id = $1 AND is_revoked = FALSE",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Revoke every session sharing a session key (device logout).
    pub async fn revoke_by_key(pool: &PgPool, session_key: &str) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE user_sessions SET is_revoked = TRUE, updated_at = NOW()
             WHERE session_key = $1 AND is_revoked = FALSE",
        )
        .bind(session_key)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }

    /// Revoke all active sessions for a user. Returns the revoked count.
    pub async fn revoke_all_for_user(pool: &PgPool, user_id: DbId) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE user_sessions SET is_revoked = TRUE, updated_at = NOW()
             WHERE user_id = $1 AND is_revoked = FALSE",
        )
        .bind(user_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }

    /// Revoke a user's sessions on every device except the given key.
    pub async fn revoke_all_except(
        pool: &PgPool,
        user_id: DbId,
        session_key: &str,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE user_sessions SET is_revoked = TRUE, updated_at = NOW()
             WHERE user_id = $1 AND session_key <> $2 AND is_revoked = FALSE",
        )
        .bind(user_id)
        .bind(session_key)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }

    /// Delete expired or revoked sessions. Returns the deleted count.
    pub async fn cleanup_expired(pool: &PgPool) -> Result<u64, sqlx::Error> {
        let result =
            sqlx::query("DELETE FROM user_sessions WHERE expires_at < NOW() OR is_revoked = TRUE")
                .execute(pool)
                .await?;
        Ok(result.rows_affected())
    }
}
