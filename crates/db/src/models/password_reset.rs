//! Password-reset token model. Only the SHA-256 hash of the token is
//! stored; the plaintext goes out in the reset email and nowhere else.

use sqlx::FromRow;

use pointpro_core::types::{DbId, Timestamp};

/// A row from the `password_resets` table.
#[derive(Debug, Clone, FromRow)]
pub struct PasswordReset {
    pub id: DbId,
    pub user_id: DbId,
    pub token_hash: String,
    pub expires_at: Timestamp,
    pub used_at: Option<Timestamp>,
    pub created_at: Timestamp,
}
