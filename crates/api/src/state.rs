use std::sync::Arc;

use pointpro_core::payment::PaymentGateway;
use pointpro_events::Mailer;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: pointpro_db::DbPool,
    /// Server configuration (accessed by middleware and handlers).
    pub config: Arc<ServerConfig>,
    /// Simulated card gateway; tests pin the rate to 0 or 1.
    pub gateway: PaymentGateway,
    /// SMTP mailer; `None` when `SMTP_HOST` is unset, making every email a
    /// logged no-op.
    pub mailer: Option<Arc<Mailer>>,
}
