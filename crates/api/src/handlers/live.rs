//! Live proxy handlers: pass-through of the current upstream snapshots.
//!
//! These do not touch the store; an upstream failure surfaces as 502.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/live
///
/// The current upstream live-event snapshot.
pub async fn live_events(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let events = state.feed.fetch_live_events().await?;
    Ok(Json(DataResponse { data: events }))
}

/// GET /api/v1/live/large-events
///
/// The current upstream bulletin snapshot.
pub async fn live_large_events(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let bulletins = state.feed.fetch_large_events().await?;
    Ok(Json(DataResponse { data: bulletins }))
}
