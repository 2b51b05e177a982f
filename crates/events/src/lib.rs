//! Outbound notification infrastructure.
//!
//! - [`EmailConfig`] / [`Mailer`] — async SMTP delivery via `lettre`.
//! - [`messages`] — builders for the transactional emails (payment
//!   confirmation, reservation cancellation, password reset).
//!
//! Email is best-effort everywhere it is used: send failures are logged
//! and never surfaced to the request that triggered them.

pub mod email;
pub mod messages;

pub use email::{EmailConfig, EmailError, Mailer};
pub use messages::EmailMessage;
