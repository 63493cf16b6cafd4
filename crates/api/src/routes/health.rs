use axum::extract::State;
use axum::{routing::get, Json, Router};
use serde::Serialize;
use spinner_core::types::Timestamp;
use spinner_db::repositories::{EventRepo, LogRepo};

use crate::state::AppState;

/// Health check response payload.
#[derive(Serialize)]
pub struct HealthResponse {
    /// Overall service status.
    pub status: &'static str,
    /// Crate version from Cargo.toml.
    pub version: &'static str,
    /// Whether the database is reachable.
    pub db_healthy: bool,
    /// Number of stored events; absent when the store is unreachable.
    pub events: Option<i64>,
    /// When the most recent reconciliation run was logged. Absent until
    /// the first `scrape_latest` or description pass completes, or when
    /// the store is unreachable.
    pub last_reconciliation: Option<Timestamp>,
}

/// GET /health -- returns service, database, and reconciliation health.
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let db_healthy = spinner_db::health_check(&state.pool).await.is_ok();

    let (events, last_reconciliation) = if db_healthy {
        let events = EventRepo::count(&state.pool).await.ok();
        let last_reconciliation = LogRepo::list_recent(&state.pool, 1)
            .await
            .ok()
            .and_then(|rows| rows.first().map(|row| row.created_at));
        (events, last_reconciliation)
    } else {
        (None, None)
    };

    let status = if db_healthy { "ok" } else { "degraded" };

    Json(HealthResponse {
        status,
        version: env!("CARGO_PKG_VERSION"),
        db_healthy,
        events,
        last_reconciliation,
    })
}

/// Mount health check routes (intended for root-level, NOT under `/api/v1`).
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
