//! Domain logic for the PointPro coworking platform.
//!
//! Pure types and rules only -- no I/O. Persistence lives in `pointpro-db`,
//! the HTTP surface in `pointpro-api`.

pub mod device;
pub mod error;
pub mod maintenance;
pub mod payment;
pub mod reservation;
pub mod roles;
pub mod space;
pub mod types;
