//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument. Multi-table state
//! transitions (payment settlement, intervention close) open their own
//! transaction internally so callers cannot observe a half-applied state.

pub mod active_session_repo;
pub mod card_repo;
pub mod favorite_repo;
pub mod incident_repo;
pub mod intervention_repo;
pub mod password_reset_repo;
pub mod profile_repo;
pub mod reservation_repo;
pub mod session_repo;
pub mod space_repo;
pub mod user_repo;

pub use active_session_repo::ActiveSessionRepo;
pub use card_repo::CardRepo;
pub use favorite_repo::FavoriteRepo;
pub use incident_repo::IncidentRepo;
pub use intervention_repo::InterventionRepo;
pub use password_reset_repo::PasswordResetRepo;
pub use profile_repo::ProfileRepo;
pub use reservation_repo::ReservationRepo;
pub use session_repo::SessionRepo;
pub use space_repo::SpaceRepo;
pub use user_repo::UserRepo;
