//! Handler for push-subscription registration.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};
use spinner_core::types::DbId;
use spinner_db::repositories::SubscriptionRepo;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for `POST /api/v1/subscriptions`.
#[derive(Debug, Deserialize, Validate)]
pub struct SubscribeRequest {
    #[validate(length(min = 1, message = "must not be empty"))]
    pub gcm_token: String,
    #[serde(default)]
    pub municipality_ids: Vec<DbId>,
    #[serde(default)]
    pub event_type_ids: Vec<DbId>,
}

#[derive(Debug, Serialize)]
pub struct SubscribeResponse {
    pub inserted: u64,
}

/// POST /api/v1/subscriptions
///
/// Register a token's interests: one subscription row per listed ID, or a
/// single subscribe-to-all row when no IDs are given.
pub async fn register(
    State(state): State<AppState>,
    Json(input): Json<SubscribeRequest>,
) -> AppResult<impl IntoResponse> {
    input
        .validate()
        .map_err(|e| AppError::from_validation(&e))?;

    let inserted = SubscriptionRepo::register(
        &state.pool,
        &input.gcm_token,
        &input.municipality_ids,
        &input.event_type_ids,
    )
    .await?;

    tracing::info!(inserted, "Registered subscription");

    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: SubscribeResponse { inserted },
        }),
    ))
}
