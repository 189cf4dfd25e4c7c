use std::sync::Arc;

use flicker_cloud::ImageHost;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable: the pool is reference-counted and the rest sits behind `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: flicker_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Image hosting / transformation service.
    pub image_host: Arc<dyn ImageHost>,
}
