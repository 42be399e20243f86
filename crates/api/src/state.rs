use std::sync::Arc;

use curby_db::watch::RowWatcher;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: curby_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// LISTEN/NOTIFY fan-out hub for row-level subscriptions.
    pub watcher: Arc<RowWatcher>,
}
