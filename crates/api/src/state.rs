use std::sync::Arc;

use storyloom_storage::ObjectStore;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via
/// `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already
/// `Clone`). Handlers resolve their provider per request from
/// `config.providers` so request overrides work without shared mutable
/// state.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: storyloom_db::DbPool,
    /// Server configuration (jwt, providers, storage, timeouts).
    pub config: Arc<ServerConfig>,
    /// Object storage client for the image buckets.
    pub store: ObjectStore,
}
