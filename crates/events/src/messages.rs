//! Builders for the transactional emails.
//!
//! Each builder returns an [`EmailMessage`] with a plain-text body and an
//! HTML alternative carrying the same content.

use pointpro_db::models::reservation::Reservation;
use pointpro_db::models::space::Space;

/// A rendered email, ready for [`crate::Mailer::send`].
#[derive(Debug, Clone)]
pub struct EmailMessage {
    pub subject: String,
    pub text: String,
    pub html: String,
}

const SIGNATURE: &str = "The PointPro team";

/// Confirmation sent after a successful payment.
pub fn payment_confirmation(
    recipient_name: &str,
    reservation: &Reservation,
    space: &Space,
) -> EmailMessage {
    let subject = format!("Your reservation for {} is confirmed", space.name);
    let details = format!(
        "Space: {}\nDate: {}\nTime: {} - {}\nAmount paid: {:.2} EUR",
        space.name,
        reservation.date.format("%Y-%m-%d"),
        reservation.start_time.format("%H:%M"),
        reservation.end().format("%H:%M"),
        reservation.total_price,
    );
    let text = format!(
        "Hello {recipient_name},\n\n\
         Your payment was accepted and your reservation is confirmed.\n\n\
         {details}\n\n\
         See you soon,\n{SIGNATURE}"
    );
    let html = format!(
        "<p>Hello {recipient_name},</p>\
         <p>Your payment was accepted and your reservation is confirmed.</p>\
         <ul>\
           <li><strong>Space:</strong> {}</li>\
           <li><strong>Date:</strong> {}</li>\
           <li><strong>Time:</strong> {} &ndash; {}</li>\
           <li><strong>Amount paid:</strong> {:.2}&nbsp;EUR</li>\
         </ul>\
         <p>See you soon,<br>{SIGNATURE}</p>",
        space.name,
        reservation.date.format("%Y-%m-%d"),
        reservation.start_time.format("%H:%M"),
        reservation.end().format("%H:%M"),
        reservation.total_price,
    );
    EmailMessage { subject, text, html }
}

/// Notice sent when a client cancels a reservation.
pub fn reservation_cancelled(
    recipient_name: &str,
    reservation: &Reservation,
    space: &Space,
) -> EmailMessage {
    let subject = format!("Your reservation for {} was cancelled", space.name);
    let when = format!(
        "{} at {}",
        reservation.date.format("%Y-%m-%d"),
        reservation.start_time.format("%H:%M"),
    );
    let text = format!(
        "Hello {recipient_name},\n\n\
         Your reservation for {} on {when} has been cancelled.\n\n\
         {SIGNATURE}",
        space.name,
    );
    let html = format!(
        "<p>Hello {recipient_name},</p>\
         <p>Your reservation for <strong>{}</strong> on {when} has been cancelled.</p>\
         <p>{SIGNATURE}</p>",
        space.name,
    );
    EmailMessage { subject, text, html }
}

/// Password-reset link. The plaintext token only ever appears here.
pub fn password_reset(recipient_name: &str, reset_url: &str) -> EmailMessage {
    let subject = "Reset your PointPro password".to_string();
    let text = format!(
        "Hello {recipient_name},\n\n\
         Someone asked to reset the password for your account. If this was\n\
         you, open the link below within one hour:\n\n\
         {reset_url}\n\n\
         If you did not ask for this, you can ignore this email.\n\n\
         {SIGNATURE}"
    );
    let html = format!(
        "<p>Hello {recipient_name},</p>\
         <p>Someone asked to reset the password for your account. If this was \
         you, open the link below within one hour:</p>\
         <p><a href=\"{reset_url}\">{reset_url}</a></p>\
         <p>If you did not ask for this, you can ignore this email.</p>\
         <p>{SIGNATURE}</p>"
    );
    EmailMessage { subject, text, html }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveTime, Utc};
    use pointpro_core::reservation::ReservationStatus;
    use pointpro_core::space::SpaceKind;

    fn sample_space() -> Space {
        Space {
            id: 1,
            name: "Studio Lumière".into(),
            description: String::new(),
            kind: SpaceKind::Studio,
            capacity: 4,
            city: "Lyon".into(),
            address: String::new(),
            equipment: String::new(),
            price_per_hour: 25.0,
            image_path: None,
            available: true,
            under_maintenance: false,
            maintenance_until: None,
            created_at: Utc::now(),
        }
    }

    fn sample_reservation() -> Reservation {
        Reservation {
            id: 7,
            user_id: 3,
            space_id: 1,
            date: NaiveDate::from_ymd_opt(2026, 9, 10).unwrap(),
            start_time: NaiveTime::from_hms_opt(14, 0, 0).unwrap(),
            duration_hours: 2,
            total_price: 50.0,
            status: ReservationStatus::Confirmed,
            paid: true,
            payment_method: "Visa •••• 4242".into(),
            payment_date: Some(Utc::now()),
            admin_notes: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn confirmation_includes_slot_and_amount() {
        let msg = payment_confirmation("Ada", &sample_reservation(), &sample_space());
        assert!(msg.subject.contains("Studio Lumière"));
        assert!(msg.text.contains("2026-09-10"));
        assert!(msg.text.contains("14:00 - 16:00"));
        assert!(msg.text.contains("50.00 EUR"));
        assert!(msg.html.contains("16:00"));
    }

    #[test]
    fn reset_message_carries_the_link() {
        let msg = password_reset("Ada", "https://app.example/reset?token=abc");
        assert!(msg.text.contains("https://app.example/reset?token=abc"));
        assert!(msg.html.contains("href=\"https://app.example/reset?token=abc\""));
    }
}
