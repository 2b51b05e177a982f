//! Repository for the `payment_cards` table.

use sqlx::PgPool;

use pointpro_core::types::DbId;

use crate::models::card::{CreateCard, PaymentCard};

/// Provides CRUD operations for stored payment cards.
pub struct CardRepo;

impl CardRepo {
    pub async fn create(pool: &PgPool, input: &CreateCard) -> Result<PaymentCard, sqlx::Error> {
        sqlx::query_as::<_, PaymentCard>(
            "INSERT INTO payment_cards (user_id, name, last_four, network, expiry)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING *",
        )
        .bind(input.user_id)
        .bind(&input.name)
        .bind(&input.last_four)
        .bind(input.network)
        .bind(&input.expiry)
        .fetch_one(pool)
        .await
    }

    pub async fn list_by_user(pool: &PgPool, user_id: DbId) -> Result<Vec<PaymentCard>, sqlx::Error> {
        sqlx::query_as::<_, PaymentCard>(
            "SELECT * FROM payment_cards WHERE user_id = $1 ORDER BY created_at",
        )
        .bind(user_id)
        .fetch_all(pool)
        .await
    }

    /// Find a card only if it belongs to the given user.
    pub async fn find_for_user(
        pool: &PgPool,
        id: DbId,
        user_id: DbId,
    ) -> Result<Option<PaymentCard>, sqlx::Error> {
        sqlx::query_as::<_, PaymentCard>(
            "SELECT * FROM payment_cards WHERE id = $1 AND user_id = $2",
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(pool)
        .await
    }

    /// Delete a user's card. Returns `true` if a row was removed.
    pub async fn delete_for_user(
        pool: &PgPool,
        id: DbId,
        user_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM payment_cards WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
