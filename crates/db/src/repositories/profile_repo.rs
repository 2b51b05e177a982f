//! Repository for the `profiles` table.

use sqlx::PgPool;

use pointpro_core::roles::ROLE_TECHNICIAN;
use pointpro_core::types::DbId;

use crate::models::profile::{Profile, UpdateProfile};

/// Provides CRUD operations for profiles.
pub struct ProfileRepo;

impl ProfileRepo {
    pub async fn find_by_user(pool: &PgPool, user_id: DbId) -> Result<Option<Profile>, sqlx::Error> {
        sqlx::query_as::<_, Profile>("SELECT * FROM profiles WHERE user_id = $1")
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Profile>, sqlx::Error> {
        sqlx::query_as::<_, Profile>("SELECT * FROM profiles WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a profile that must carry the technician role.
    pub async fn find_technician(pool: &PgPool, id: DbId) -> Result<Option<Profile>, sqlx::Error> {
        sqlx::query_as::<_, Profile>("SELECT * FROM profiles WHERE id = $1 AND role = $2")
            .bind(id)
            .bind(ROLE_TECHNICIAN)
            .fetch_optional(pool)
            .await
    }

    /// Update contact/demographic fields. Only non-`None` fields are applied.
    pub async fn update(
        pool: &PgPool,
        user_id: DbId,
        input: &UpdateProfile,
    ) -> Result<Option<Profile>, sqlx::Error> {
        sqlx::query_as::<_, Profile>(
            "UPDATE profiles SET
                phone = COALESCE($2, phone),
                address = COALESCE($3, address),
                postal_code = COALESCE($4, postal_code),
                city = COALESCE($5, city),
                gender = COALESCE($6, gender),
                nationality = COALESCE($7, nationality),
                public_name = COALESCE($8, public_name),
                birth_date = COALESCE($9, birth_date)
             WHERE user_id = $1
             RETURNING *",
        )
        .bind(user_id)
        .bind(&input.phone)
        .bind(&input.address)
        .bind(&input.postal_code)
        .bind(&input.city)
        .bind(&input.gender)
        .bind(&input.nationality)
        .bind(&input.public_name)
        .bind(input.birth_date)
        .fetch_optional(pool)
        .await
    }

    /// Set or clear the default payment card.
    pub async fn set_default_card(
        pool: &PgPool,
        user_id: DbId,
        card_id: Option<DbId>,
    ) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE profiles SET default_card_id = $2 WHERE user_id = $1")
            .bind(user_id)
            .bind(card_id)
            .execute(pool)
            .await?;
        Ok(())
    }
}
