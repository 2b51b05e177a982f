//! Repository for the `password_resets` table.

use chrono::{Duration, Utc};
use sqlx::PgPool;

use pointpro_core::types::DbId;

use crate::models::password_reset::PasswordReset;

/// Reset tokens stay valid for one hour.
const TOKEN_TTL_HOURS: i64 = 1;

pub struct PasswordResetRepo;

impl PasswordResetRepo {
    /// Record a reset token hash for a user.
    pub async fn create(
        pool: &PgPool,
        user_id: DbId,
        token_hash: &str,
    ) -> Result<PasswordReset, sqlx::Error> {
        sqlx::query_as::<_, PasswordReset>(
            "INSERT INTO password_resets (user_id, token_hash, expires_at)
             VALUES ($1, $2, $3)
             RETURNING *",
        )
        .bind(user_id)
        .bind(token_hash)
        .bind(Utc::now() + Duration::hours(TOKEN_TTL_HOURS))
        .fetch_one(pool)
        .await
    }

    /// Find an unexpired, unused reset by its token hash.
    pub async fn find_valid_by_hash(
        pool: &PgPool,
        token_hash: &str,
    ) -> Result<Option<PasswordReset>, sqlx::Error> {
        sqlx::query_as::<_, PasswordReset>(
            "SELECT * FROM password_resets
             WHERE token_hash = $1 AND used_at IS NULL AND expires_at > NOW()",
        )
        .bind(token_hash)
        .fetch_optional(pool)
        .await
    }

    /// Burn a token after a successful reset. Returns `true` if the row was
    /// still unused.
    pub async fn mark_used(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE password_resets SET used_at = NOW() WHERE id = $1 AND used_at IS NULL",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
