use std::sync::Arc;

use crate::config::AppConfig;
use crate::metrics::Metrics;

/// The shared application state.
///
/// Cloneable and thread-safe; handed to every handler through Axum's `State`
/// extraction. All cross-request state lives either here (counters, config)
/// or in the database behind the pool - handlers themselves are stateless.
#[derive(Clone)]
pub struct AppState {
    /// The SQLite connection pool backing users, books and reviews.
    pub db: sqlx::SqlitePool,
    /// The application configuration (server, database, auth).
    pub config: Arc<AppConfig>,
    /// Domain counters exposed via /metrics.
    pub metrics: Metrics,
}

impl AppState {
    pub fn new(db: sqlx::SqlitePool, config: AppConfig) -> Self {
        Self { db, config: Arc::new(config), metrics: Metrics::new() }
    }
}
