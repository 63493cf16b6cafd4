//! Route definitions.
//!
//! `health::router()` mounts at root; everything else under `/api/v1` via
//! [`api_routes`].

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{archive, large_events, live, reference, subscription};
use crate::state::AppState;

pub mod health;

/// All `/api/v1` routes.
///
/// ```text
/// GET  /archive             -> archive::list_archive
/// GET  /archive/{id}        -> archive::get_event
/// GET  /large-events        -> large_events::list_large_events
/// GET  /municipalities      -> reference::list_municipalities
/// GET  /event-types         -> reference::list_event_types
/// POST /subscriptions       -> subscription::register
/// GET  /live                -> live::live_events
/// GET  /live/large-events   -> live::live_large_events
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/archive", get(archive::list_archive))
        .route("/archive/{id}", get(archive::get_event))
        .route("/large-events", get(large_events::list_large_events))
        .route("/municipalities", get(reference::list_municipalities))
        .route("/event-types", get(reference::list_event_types))
        .route("/subscriptions", post(subscription::register))
        .route("/live", get(live::live_events))
        .route("/live/large-events", get(live::live_large_events))
}
