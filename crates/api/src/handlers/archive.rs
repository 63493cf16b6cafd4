//! Handlers for the event archive: filterable listing and single-record
//! lookup.

use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::Json;
use chrono::{Days, NaiveDate, NaiveTime};
use serde::Deserialize;
use spinner_core::archive::ArchiveOrder;
use spinner_core::error::CoreError;
use spinner_core::types::{DbId, Timestamp};
use spinner_db::models::event::{ArchiveQuery, GeoFilter};
use spinner_db::repositories::EventRepo;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// Query parameters for `GET /api/v1/archive`.
///
/// ID lists are comma-separated (`?municipality_ids=1,2,3`). Dates are
/// `YYYY-MM-DD`; `to` covers the whole end date. The three geo parameters
/// must be given together.
#[derive(Debug, Deserialize, Validate)]
pub struct ArchiveParams {
    pub search: Option<String>,
    pub municipality_ids: Option<String>,
    pub event_type_ids: Option<String>,
    pub on_going: Option<bool>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    #[validate(range(min = -90.0, max = 90.0, message = "must be within [-90, 90]"))]
    pub lat: Option<f64>,
    #[validate(range(min = -180.0, max = 180.0, message = "must be within [-180, 180]"))]
    pub lon: Option<f64>,
    #[validate(range(min = 1.0, message = "must be a positive radius in meters"))]
    pub radius_m: Option<f64>,
    #[serde(default)]
    pub order_by: ArchiveOrder,
    #[validate(range(min = 1, message = "must be at least 1"))]
    pub count: Option<i64>,
    pub include_without_description: Option<bool>,
}

/// GET /api/v1/archive
///
/// List archived events with optional free-text, categorical, temporal,
/// and geo filters.
pub async fn list_archive(
    State(state): State<AppState>,
    Query(params): Query<ArchiveParams>,
) -> AppResult<impl IntoResponse> {
    params
        .validate()
        .map_err(|e| AppError::from_validation(&e))?;

    let geo = match (params.lat, params.lon, params.radius_m) {
        (Some(lat), Some(lon), Some(radius_m)) => Some(GeoFilter { lat, lon, radius_m }),
        (None, None, None) => None,
        _ => {
            return Err(AppError::BadRequest(
                "lat, lon and radius_m must be provided together".into(),
            ))
        }
    };

    let query = ArchiveQuery {
        search: params.search.filter(|s| !s.trim().is_empty()),
        municipality_ids: parse_id_list("municipality_ids", params.municipality_ids.as_deref())?,
        event_type_ids: parse_id_list("event_type_ids", params.event_type_ids.as_deref())?,
        on_going: params.on_going,
        from: params.from.map(start_of_day),
        // Advance by one day so the range is inclusive of the end date.
        to: params
            .to
            .map(|d| start_of_day(d + Days::new(1))),
        include_without_description: params.include_without_description.unwrap_or(true),
        geo,
        order_by: params.order_by,
        count: params.count,
    };

    if query.order_by == ArchiveOrder::Distance && query.geo.is_none() {
        tracing::debug!("Distance ordering without geo filter, falling back to date");
    }

    let events = EventRepo::archive(&state.pool, &query).await?;

    Ok(Json(DataResponse { data: events }))
}

/// GET /api/v1/archive/{id}
///
/// Fetch one event with resolved municipality and event-type names.
pub async fn get_event(
    State(state): State<AppState>,
    Path(event_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let event = EventRepo::get_with_names(&state.pool, event_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Event",
            id: event_id,
        }))?;

    Ok(Json(DataResponse { data: event }))
}

fn start_of_day(date: NaiveDate) -> Timestamp {
    date.and_time(NaiveTime::MIN).and_utc()
}

/// Parse a comma-separated ID list; an empty parameter means no filter.
fn parse_id_list(
    field: &'static str,
    raw: Option<&str>,
) -> Result<Option<Vec<DbId>>, AppError> {
    let Some(raw) = raw else {
        return Ok(None);
    };
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    trimmed
        .split(',')
        .map(|part| {
            part.trim().parse::<DbId>().map_err(|_| {
                AppError::BadRequest(format!("{field}: '{part}' is not a valid ID"))
            })
        })
        .collect::<Result<Vec<_>, _>>()
        .map(Some)
}
