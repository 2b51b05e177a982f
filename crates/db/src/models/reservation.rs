//! Reservation entity model and DTOs.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime, TimeDelta};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use pointpro_core::reservation::ReservationStatus;
use pointpro_core::types::{DbId, Timestamp};

/// A row from the `reservations` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Reservation {
    pub id: DbId,
    pub user_id: DbId,
    pub space_id: DbId,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub duration_hours: i32,
    pub total_price: f64,
    pub status: ReservationStatus,
    pub paid: bool,
    pub payment_method: String,
    pub payment_date: Option<Timestamp>,
    pub admin_notes: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Reservation {
    /// End of the booked slot; derived, not stored.
    pub fn end(&self) -> NaiveDateTime {
        self.date.and_time(self.start_time) + TimeDelta::hours(i64::from(self.duration_hours))
    }
}

/// DTO for creating a reservation (internal; the slot has been validated).
#[derive(Debug, Clone)]
pub struct CreateReservation {
    pub user_id: DbId,
    pub space_id: DbId,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub duration_hours: i32,
    pub total_price: f64,
}

/// DTO for the admin reservation editor. All fields are optional.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateReservation {
    pub date: Option<NaiveDate>,
    pub start_time: Option<NaiveTime>,
    pub duration_hours: Option<i32>,
    pub status: Option<ReservationStatus>,
    pub admin_notes: Option<String>,
}

/// Per-status reservation counts for a user's "my reservations" view.
#[derive(Debug, Clone, Copy, Default, FromRow, Serialize)]
pub struct ReservationCounts {
    pub total: i64,
    pub confirmed: i64,
    pub pending: i64,
    pub cancelled: i64,
}
