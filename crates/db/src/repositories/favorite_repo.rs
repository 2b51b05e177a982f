//! Repository for the `favorites` table.

use sqlx::PgPool;

use pointpro_core::types::DbId;

use crate::models::space::Space;

/// Provides bookmark operations for (user, space) pairs.
pub struct FavoriteRepo;

impl FavoriteRepo {
    /// Toggle a bookmark. Returns `true` if the space is now a favorite.
    pub async fn toggle(pool: &PgPool, user_id: DbId, space_id: DbId) -> Result<bool, sqlx::Error> {
        let removed = sqlx::query("DELETE FROM favorites WHERE user_id = $1 AND space_id = $2")
            .bind(user_id)
            .bind(space_id)
            .execute(pool)
            .await?;
        if removed.rows_affected() > 0 {
            return Ok(false);
        }
        sqlx::query(
            "INSERT INTO favorites (user_id, space_id) VALUES ($1, $2)
             ON CONFLICT ON CONSTRAINT uq_favorites_user_space DO NOTHING",
        )
        .bind(user_id)
        .bind(space_id)
        .execute(pool)
        .await?;
        Ok(true)
    }

    /// The user's bookmarked spaces, most recently added first.
    pub async fn spaces_for_user(pool: &PgPool, user_id: DbId) -> Result<Vec<Space>, sqlx::Error> {
        sqlx::query_as::<_, Space>(
            "SELECT s.* FROM spaces s
             JOIN favorites f ON f.space_id = s.id
             WHERE f.user_id = $1
             ORDER BY f.created_at DESC",
        )
        .bind(user_id)
        .fetch_all(pool)
        .await
    }

}
