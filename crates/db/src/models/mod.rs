//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A `Deserialize` create DTO for inserts
//! - A `Deserialize` update DTO (all `Option` fields) for patches

pub mod card;
pub mod incident;
pub mod intervention;
pub mod password_reset;
pub mod profile;
pub mod reservation;
pub mod session;
pub mod space;
pub mod user;
