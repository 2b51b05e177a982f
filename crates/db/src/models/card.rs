//! Stored payment card model. Holds only the derived last-four and network;
//! the PAN and CVV are never persisted.

use serde::Serialize;
use sqlx::FromRow;

use pointpro_core::payment::CardNetwork;
use pointpro_core::types::{DbId, Timestamp};

/// A row from the `payment_cards` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct PaymentCard {
    pub id: DbId,
    pub user_id: DbId,
    pub name: String,
    pub last_four: String,
    pub network: CardNetwork,
    pub expiry: String,
    pub created_at: Timestamp,
}

/// DTO for inserting a card (already reduced to the persistable subset).
#[derive(Debug, Clone)]
pub struct CreateCard {
    pub user_id: DbId,
    pub name: String,
    pub last_four: String,
    pub network: CardNetwork,
    pub expiry: String,
}
