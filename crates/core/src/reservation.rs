//! Reservation lifecycle rules: status transitions, slot validation, and
//! derived pricing / end-time computation.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime, TimeDelta};
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Reservation status. Stored as the `reservation_status` PostgreSQL enum.
///
/// Lifecycle: created `Pending`; moves to `Confirmed` only through a
/// successful payment; `Refused` and `Cancelled` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "reservation_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ReservationStatus {
    Pending,
    Confirmed,
    Refused,
    Cancelled,
}

impl ReservationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReservationStatus::Pending => "pending",
            ReservationStatus::Confirmed => "confirmed",
            ReservationStatus::Refused => "refused",
            ReservationStatus::Cancelled => "cancelled",
        }
    }

    /// Terminal states never transition again in normal operation.
    pub fn is_terminal(&self) -> bool {
        matches!(self, ReservationStatus::Refused | ReservationStatus::Cancelled)
    }
}

/// A validated booking slot request.
#[derive(Debug, Clone, Copy)]
pub struct Slot {
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub duration_hours: i32,
}

impl Slot {
    /// Validate a requested slot against the current moment.
    ///
    /// Rejects a date strictly before today, a same-day start time already
    /// in the past, and a non-positive duration.
    pub fn validate(
        date: NaiveDate,
        start_time: NaiveTime,
        duration_hours: i32,
        now: NaiveDateTime,
    ) -> Result<Slot, CoreError> {
        if duration_hours <= 0 {
            return Err(CoreError::Validation(
                "Duration must be at least one hour".into(),
            ));
        }
        if date < now.date() {
            return Err(CoreError::Validation(
                "Cannot book a date in the past".into(),
            ));
        }
        if date.and_time(start_time) < now {
            return Err(CoreError::Validation(
                "Cannot book a time in the past".into(),
            ));
        }
        Ok(Slot {
            date,
            start_time,
            duration_hours,
        })
    }

    /// End of the slot, which may fall on the next day.
    pub fn end(&self) -> NaiveDateTime {
        self.date.and_time(self.start_time) + TimeDelta::hours(i64::from(self.duration_hours))
    }
}

/// Total price for a slot. Fixed at creation time; never recomputed when
/// the space's hourly rate later changes.
pub fn total_price(price_per_hour: f64, duration_hours: i32) -> f64 {
    price_per_hour * f64::from(duration_hours)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noon(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    #[test]
    fn rejects_past_date() {
        let now = noon(2025, 6, 2);
        let err = Slot::validate(
            NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
            NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
            1,
            now,
        )
        .unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));
    }

    #[test]
    fn rejects_same_day_past_time() {
        let now = noon(2025, 6, 1);
        let err = Slot::validate(
            now.date(),
            NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
            1,
            now,
        )
        .unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));
    }

    #[test]
    fn accepts_same_day_future_time() {
        let now = noon(2025, 6, 1);
        let slot = Slot::validate(
            now.date(),
            NaiveTime::from_hms_opt(14, 0, 0).unwrap(),
            2,
            now,
        )
        .unwrap();
        assert_eq!(
            slot.end(),
            now.date().and_time(NaiveTime::from_hms_opt(16, 0, 0).unwrap())
        );
    }

    #[test]
    fn end_rolls_over_midnight() {
        let slot = Slot::validate(
            NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
            NaiveTime::from_hms_opt(23, 0, 0).unwrap(),
            2,
            noon(2025, 5, 31),
        )
        .unwrap();
        assert_eq!(slot.end().date(), NaiveDate::from_ymd_opt(2025, 6, 2).unwrap());
        assert_eq!(slot.end().time(), NaiveTime::from_hms_opt(1, 0, 0).unwrap());
    }

    #[test]
    fn price_is_rate_times_hours() {
        assert_eq!(total_price(20.0, 2), 40.0);
        assert_eq!(total_price(12.5, 3), 37.5);
    }

    #[test]
    fn terminal_states() {
        assert!(ReservationStatus::Cancelled.is_terminal());
        assert!(ReservationStatus::Refused.is_terminal());
        assert!(!ReservationStatus::Pending.is_terminal());
        assert!(!ReservationStatus::Confirmed.is_terminal());
    }
}
