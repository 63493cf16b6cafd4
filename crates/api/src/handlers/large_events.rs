//! Handler for stored large-scale bulletins.

use axum::extract::{Query, State};
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use spinner_core::archive::clamp_count;
use spinner_db::repositories::LargeEventRepo;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct LargeEventParams {
    pub count: Option<i64>,
}

/// GET /api/v1/large-events
///
/// List stored bulletins, newest first.
pub async fn list_large_events(
    State(state): State<AppState>,
    Query(params): Query<LargeEventParams>,
) -> AppResult<impl IntoResponse> {
    let bulletins = LargeEventRepo::list_recent(&state.pool, clamp_count(params.count)).await?;
    Ok(Json(DataResponse { data: bulletins }))
}
