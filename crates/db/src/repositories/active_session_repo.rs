//! Repository for the `active_sessions` table (per-device activity).

use sqlx::PgPool;

use pointpro_core::types::DbId;

use crate::models::session::ActiveSession;

/// Provides upsert and listing for the "manage my sessions" feature.
pub struct ActiveSessionRepo;

impl ActiveSessionRepo {
    /// Create or refresh a device row at token-issue time (login, refresh).
    ///
    /// Upsert by unique key, not read-then-write: concurrent requests from
    /// the same session must not produce duplicate rows.
    pub async fn touch(
        pool: &PgPool,
        user_id: DbId,
        session_key: &str,
        device_info: &str,
        ip_address: Option<&str>,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO active_sessions (user_id, session_key, device_info, ip_address)
             VALUES ($1, $2, $3, $4)
             ON CONFLICT ON CONSTRAINT uq_active_sessions_key DO UPDATE SET
                device_info = EXCLUDED.device_info,
                ip_address = EXCLUDED.ip_address,
                last_activity = NOW()",
        )
        .bind(user_id)
        .bind(session_key)
        .bind(device_info)
        .bind(ip_address)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Update the activity stamp of an existing session row.
    ///
    /// Update-only on purpose: a row deleted by revocation or logout must
    /// not be recreated by later requests from that device.
    pub async fn record_activity(
        pool: &PgPool,
        session_key: &str,
        device_info: &str,
        ip_address: Option<&str>,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE active_sessions SET
                device_info = $2,
                ip_address = $3,
                last_activity = NOW()
             WHERE session_key = $1",
        )
        .bind(session_key)
        .bind(device_info)
        .bind(ip_address)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// A user's sessions, most recently active first.
    pub async fn list_by_user(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Vec<ActiveSession>, sqlx::Error> {
        sqlx::query_as::<_, ActiveSession>(
            "SELECT * FROM active_sessions WHERE user_id = $1 ORDER BY last_activity DESC",
        )
        .bind(user_id)
        .fetch_all(pool)
        .await
    }

    pub async fn find_for_user(
        pool: &PgPool,
        id: DbId,
        user_id: DbId,
    ) -> Result<Option<ActiveSession>, sqlx::Error> {
        sqlx::query_as::<_, ActiveSession>(
            "SELECT * FROM active_sessions WHERE id = $1 AND user_id = $2",
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(pool)
        .await
    }

    /// Remove one session row. Returns `true` if a row was removed.
    pub async fn delete_for_user(
        pool: &PgPool,
        id: DbId,
        user_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM active_sessions WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Remove the row for a session key (logout of the current device).
    pub async fn delete_by_key(pool: &PgPool, session_key: &str) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM active_sessions WHERE session_key = $1")
            .bind(session_key)
            .execute(pool)
            .await?;
        Ok(())
    }

    /// Remove all of a user's sessions except the given key ("log out
    /// everywhere else"). Returns the removed count.
    pub async fn delete_all_except(
        pool: &PgPool,
        user_id: DbId,
        current_key: &str,
    ) -> Result<u64, sqlx::Error> {
        let result =
            sqlx::query("DELETE FROM active_sessions WHERE user_id = $1 AND session_key <> $2")
                .bind(user_id)
                .bind(current_key)
                .execute(pool)
                .await?;
        Ok(result.rows_affected())
    }
}
