//! Profile entity model and DTOs.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use pointpro_core::types::DbId;

/// A row from the `profiles` table, one-to-one with a user.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Profile {
    pub id: DbId,
    pub user_id: DbId,
    pub role: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub postal_code: Option<String>,
    pub city: Option<String>,
    pub gender: Option<String>,
    pub nationality: Option<String>,
    pub public_name: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub default_card_id: Option<DbId>,
}

/// Typed account-update request: every mutable profile field is an explicit
/// optional, validated field-by-field instead of a name-to-setter map.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateProfile {
    pub phone: Option<String>,
    pub address: Option<String>,
    pub postal_code: Option<String>,
    pub city: Option<String>,
    pub gender: Option<String>,
    pub nationality: Option<String>,
    pub public_name: Option<String>,
    pub birth_date: Option<NaiveDate>,
}
