//! Repository for the `reservations` table.

use chrono::{NaiveDate, NaiveTime};
use sqlx::PgPool;

use pointpro_core::reservation::ReservationStatus;
use pointpro_core::types::DbId;

use crate::models::card::CreateCard;
use crate::models::reservation::{
    CreateReservation, Reservation, ReservationCounts, UpdateReservation,
};

/// Provides CRUD and lifecycle operations for reservations.
pub struct ReservationRepo;

impl ReservationRepo {
    /// Insert a new reservation in `pending` state.
    ///
    /// The slot uniqueness invariant is ultimately enforced by
    /// `uq_reservations_slot`; call [`ReservationRepo::slot_taken`] first to
    /// produce a friendly conflict error instead of a constraint violation.
    pub async fn create(
        pool: &PgPool,
        input: &CreateReservation,
    ) -> Result<Reservation, sqlx::Error> {
        sqlx::query_as::<_, Reservation>(
            "INSERT INTO reservations
                (user_id, space_id, date, start_time, duration_hours, total_price)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING *",
        )
        .bind(input.user_id)
        .bind(input.space_id)
        .bind(input.date)
        .bind(input.start_time)
        .bind(input.duration_hours)
        .bind(input.total_price)
        .fetch_one(pool)
        .await
    }

    /// Whether any reservation already occupies the exact slot.
    ///
    /// Slot-exact only: overlapping-but-offset bookings are not detected.
    pub async fn slot_taken(
        pool: &PgPool,
        space_id: DbId,
        date: NaiveDate,
        start_time: NaiveTime,
    ) -> Result<bool, sqlx::Error> {
        let (exists,): (bool,) = sqlx::query_as(
            "SELECT EXISTS (
                SELECT 1 FROM reservations
                WHERE space_id = $1 AND date = $2 AND start_time = $3)",
        )
        .bind(space_id)
        .bind(date)
        .bind(start_time)
        .fetch_one(pool)
        .await?;
        Ok(exists)
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Reservation>, sqlx::Error> {
        sqlx::query_as::<_, Reservation>("SELECT * FROM reservations WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a reservation only if it belongs to the given user.
    pub async fn find_for_user(
        pool: &PgPool,
        id: DbId,
        user_id: DbId,
    ) -> Result<Option<Reservation>, sqlx::Error> {
        sqlx::query_as::<_, Reservation>(
            "SELECT * FROM reservations WHERE id = $1 AND user_id = $2",
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(pool)
        .await
    }

    /// A user's reservations, most recent slot first.
    pub async fn list_by_user(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Vec<Reservation>, sqlx::Error> {
        sqlx::query_as::<_, Reservation>(
            "SELECT * FROM reservations WHERE user_id = $1
             ORDER BY date DESC, start_time DESC",
        )
        .bind(user_id)
        .fetch_all(pool)
        .await
    }

    /// All reservations for the admin back office.
    pub async fn list_all(pool: &PgPool) -> Result<Vec<Reservation>, sqlx::Error> {
        sqlx::query_as::<_, Reservation>(
            "SELECT * FROM reservations ORDER BY date DESC, start_time",
        )
        .fetch_all(pool)
        .await
    }

    /// Per-status counts for a user's reservation overview.
    pub async fn counts_for_user(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<ReservationCounts, sqlx::Error> {
        sqlx::query_as::<_, ReservationCounts>(
            "SELECT
                COUNT(*) AS total,
                COUNT(*) FILTER (WHERE status = 'confirmed') AS confirmed,
                COUNT(*) FILTER (WHERE status = 'pending') AS pending,
                COUNT(*) FILTER (WHERE status = 'cancelled') AS cancelled
             FROM reservations WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_one(pool)
        .await
    }

    /// Set the status (admin validate/refuse, client cancel).
    pub async fn set_status(
        pool: &PgPool,
        id: DbId,
        status: ReservationStatus,
    ) -> Result<Option<Reservation>, sqlx::Error> {
        sqlx::query_as::<_, Reservation>(
            "UPDATE reservations SET status = $2, updated_at = NOW()
             WHERE id = $1
             RETURNING *",
        )
        .bind(id)
        .bind(status)
        .fetch_optional(pool)
        .await
    }

    /// Admin editor update. Only non-`None` fields are applied; the price is
    /// deliberately left alone (fixed at creation).
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateReservation,
    ) -> Result<Option<Reservation>, sqlx::Error> {
        sqlx::query_as::<_, Reservation>(
            "UPDATE reservations SET
                date = COALESCE($2, date),
                start_time = COALESCE($3, start_time),
                duration_hours = COALESCE($4, duration_hours),
                status = COALESCE($5, status),
                admin_notes = COALESCE($6, admin_notes),
                updated_at = NOW()
             WHERE id = $1
             RETURNING *",
        )
        .bind(id)
        .bind(input.date)
        .bind(input.start_time)
        .bind(input.duration_hours)
        .bind(input.status)
        .bind(&input.admin_notes)
        .fetch_optional(pool)
        .await
    }

    /// Settle a successful payment in one transaction.
    ///
    /// Flips the reservation from `pending` to `confirmed` + paid with the
    /// masked descriptor, and optionally saves the card used (making it the
    /// profile default if none is set). Returns `None` if the reservation
    /// was no longer pending, in which case nothing was changed.
    pub async fn settle_payment(
        pool: &PgPool,
        id: DbId,
        payment_method: &str,
        save_card: Option<&CreateCard>,
    ) -> Result<Option<Reservation>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let reservation = sqlx::query_as::<_, Reservation>(
            "UPDATE reservations SET
                status = 'confirmed',
                paid = TRUE,
                payment_method = $2,
                payment_date = NOW(),
                updated_at = NOW()
             WHERE id = $1 AND status = 'pending'
             RETURNING *",
        )
        .bind(id)
        .bind(payment_method)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(reservation) = reservation else {
            tx.rollback().await?;
            return Ok(None);
        };

        if let Some(card) = save_card {
            let (card_id,): (DbId,) = sqlx::query_as(
                "INSERT INTO payment_cards (user_id, name, last_four, network, expiry)
                 VALUES ($1, $2, $3, $4, $5)
                 RETURNING id",
            )
            .bind(card.user_id)
            .bind(&card.name)
            .bind(&card.last_four)
            .bind(card.network)
            .bind(&card.expiry)
            .fetch_one(&mut *tx)
            .await?;

            sqlx::query(
                "UPDATE profiles SET default_card_id = $2
                 WHERE user_id = $1 AND default_card_id IS NULL",
            )
            .bind(card.user_id)
            .bind(card_id)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(Some(reservation))
    }

    /// Hard delete (admin). Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM reservations WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM reservations")
            .fetch_one(pool)
            .await?;
        Ok(count)
    }
}
