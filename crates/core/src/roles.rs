//! Well-known role name constants.
//!
//! These must match the values accepted by the `profiles.role` column.

pub const ROLE_CLIENT: &str = "client";
pub const ROLE_TECHNICIAN: &str = "technician";
pub const ROLE_ADMIN: &str = "admin";
