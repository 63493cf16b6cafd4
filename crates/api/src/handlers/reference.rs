//! Handlers for the static reference tables.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use spinner_db::repositories::{EventTypeRepo, MunicipalityRepo};

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/municipalities
///
/// List all municipalities sorted by name.
pub async fn list_municipalities(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let municipalities = MunicipalityRepo::list_all(&state.pool).await?;
    Ok(Json(DataResponse {
        data: municipalities,
    }))
}

/// GET /api/v1/event-types
///
/// List all event types sorted by ID.
pub async fn list_event_types(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let event_types = EventTypeRepo::list_all(&state.pool).await?;
    Ok(Json(DataResponse { data: event_types }))
}
