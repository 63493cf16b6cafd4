use std::sync::Arc;

use spinner_feed::FeedClient;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via
/// `State<AppState>`.
///
/// Cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: spinner_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Upstream feed client, used by the live proxy endpoints.
    pub feed: FeedClient,
}
