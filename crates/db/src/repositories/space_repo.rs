//! Repository for the `spaces` table.

use sqlx::PgPool;

use pointpro_core::space::SpaceKind;
use pointpro_core::types::DbId;

use crate::models::space::{CreateSpace, Space, SpaceFilter, UpdateSpace};

/// Unfiltered public listings are capped to a homepage-sized page.
const HOMEPAGE_LIMIT: i64 = 6;

/// Provides CRUD and catalog queries for spaces.
pub struct SpaceRepo;

impl SpaceRepo {
    pub async fn create(pool: &PgPool, input: &CreateSpace) -> Result<Space, sqlx::Error> {
        sqlx::query_as::<_, Space>(
            "INSERT INTO spaces
                (name, description, kind, capacity, city, address, equipment,
                 price_per_hour, image_path)
             VALUES ($1, COALESCE($2, ''), $3, $4, $5, COALESCE($6, ''),
                 COALESCE($7, ''), $8, $9)
             RETURNING *",
        )
        .bind(&input.name)
        .bind(&input.description)
        .bind(input.kind)
        .bind(input.capacity)
        .bind(&input.city)
        .bind(&input.address)
        .bind(&input.equipment)
        .bind(input.price_per_hour)
        .bind(&input.image_path)
        .fetch_one(pool)
        .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Space>, sqlx::Error> {
        sqlx::query_as::<_, Space>("SELECT * FROM spaces WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn list_all(pool: &PgPool) -> Result<Vec<Space>, sqlx::Error> {
        sqlx::query_as::<_, Space>("SELECT * FROM spaces ORDER BY name")
            .fetch_all(pool)
            .await
    }

    /// Public catalog search over available spaces.
    ///
    /// A `date` filter excludes spaces that already have any reservation
    /// that day. Unfiltered browsing returns at most six spaces.
    pub async fn search(pool: &PgPool, filter: &SpaceFilter) -> Result<Vec<Space>, sqlx::Error> {
        let order = match filter.sort.as_deref() {
            Some("price_asc") => "price_per_hour ASC",
            Some("price_desc") => "price_per_hour DESC",
            Some("capacity") => "capacity DESC",
            _ => "name ASC",
        };
        let limit = if filter.is_search() { i64::MAX } else { HOMEPAGE_LIMIT };

        let query = format!(
            "SELECT * FROM spaces
             WHERE available = TRUE
               AND ($1::text IS NULL OR city ILIKE '%' || $1 || '%')
               AND ($2::space_kind IS NULL OR kind = $2)
               AND ($3::date IS NULL OR NOT EXISTS (
                    SELECT 1 FROM reservations r
                    WHERE r.space_id = spaces.id AND r.date = $3))
             ORDER BY {order}
             LIMIT $4"
        );
        sqlx::query_as::<_, Space>(&query)
            .bind(&filter.city)
            .bind(filter.kind)
            .bind(filter.date)
            .bind(limit)
            .fetch_all(pool)
            .await
    }

    /// Available spaces of any of the given kinds (catalog categories).
    pub async fn list_by_kinds(
        pool: &PgPool,
        kinds: &[SpaceKind],
    ) -> Result<Vec<Space>, sqlx::Error> {
        sqlx::query_as::<_, Space>(
            "SELECT * FROM spaces WHERE available = TRUE AND kind = ANY($1) ORDER BY name",
        )
        .bind(kinds)
        .fetch_all(pool)
        .await
    }

    /// Update a space. Only non-`None` fields in `input` are applied.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateSpace,
    ) -> Result<Option<Space>, sqlx::Error> {
        sqlx::query_as::<_, Space>(
            "UPDATE spaces SET
                name = COALESCE($2, name),
                description = COALESCE($3, description),
                kind = COALESCE($4, kind),
                capacity = COALESCE($5, capacity),
                city = COALESCE($6, city),
                address = COALESCE($7, address),
                equipment = COALESCE($8, equipment),
                price_per_hour = COALESCE($9, price_per_hour),
                image_path = COALESCE($10, image_path),
                available = COALESCE($11, available)
             WHERE id = $1
             RETURNING *",
        )
        .bind(id)
        .bind(&input.name)
        .bind(&input.description)
        .bind(input.kind)
        .bind(input.capacity)
        .bind(&input.city)
        .bind(&input.address)
        .bind(&input.equipment)
        .bind(input.price_per_hour)
        .bind(&input.image_path)
        .bind(input.available)
        .fetch_optional(pool)
        .await
    }

    /// Manual availability toggle (technician console). Does not touch the
    /// maintenance flags, which belong to the intervention lifecycle.
    pub async fn set_available(
        pool: &PgPool,
        id: DbId,
        available: bool,
    ) -> Result<Option<Space>, sqlx::Error> {
        sqlx::query_as::<_, Space>(
            "UPDATE spaces SET available = $2 WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(available)
        .fetch_optional(pool)
        .await
    }

    /// Hard delete. Cascades to reservations, favorites, incidents, and
    /// interventions. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM spaces WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM spaces")
            .fetch_one(pool)
            .await?;
        Ok(count)
    }

    pub async fn count_in_maintenance(pool: &PgPool) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM spaces WHERE available = FALSE")
                .fetch_one(pool)
                .await?;
        Ok(count)
    }
}
