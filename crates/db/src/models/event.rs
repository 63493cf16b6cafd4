//! Incident event entity and archive query types.

use serde::Serialize;
use sqlx::FromRow;
use spinner_core::archive::ArchiveOrder;
use spinner_core::types::{DbId, Timestamp};

/// A row from the `events` table.
///
/// `id` is the upstream-assigned event identifier. `lat`/`lon` hold the
/// ×1000 integer encoding (see `spinner_core::coords`).
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Event {
    pub id: DbId,
    pub municipality_id: DbId,
    pub event_type_id: DbId,
    pub lat: i32,
    pub lon: i32,
    pub create_time: Timestamp,
    pub report_time: Timestamp,
    pub description: Option<String>,
    pub title: Option<String>,
    pub on_going: bool,
}

/// An event to insert, produced by the mapper. Field-for-field identical
/// to [`Event`]; kept separate so mapper output is explicit about being
/// not-yet-persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct NewEvent {
    pub id: DbId,
    pub municipality_id: DbId,
    pub event_type_id: DbId,
    pub lat: i32,
    pub lon: i32,
    pub create_time: Timestamp,
    pub report_time: Timestamp,
    pub description: Option<String>,
    pub title: Option<String>,
    pub on_going: bool,
}

/// Single-record lookup result with reference names resolved.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct EventWithNames {
    pub id: DbId,
    pub municipality_id: DbId,
    pub municipality_name: String,
    pub event_type_id: DbId,
    pub event_type_name: String,
    pub lat: i32,
    pub lon: i32,
    pub create_time: Timestamp,
    pub report_time: Timestamp,
    pub description: Option<String>,
    pub title: Option<String>,
    pub on_going: bool,
}

/// Geo proximity filter: circle of `radius_m` around a center point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoFilter {
    pub lat: f64,
    pub lon: f64,
    pub radius_m: f64,
}

/// Archive query filters. All filters are optional and AND-combined.
#[derive(Debug, Clone)]
pub struct ArchiveQuery {
    /// Case-insensitive substring match over description and title.
    pub search: Option<String>,
    pub municipality_ids: Option<Vec<DbId>>,
    pub event_type_ids: Option<Vec<DbId>>,
    pub on_going: Option<bool>,
    /// Inclusive lower bound on `create_time`.
    pub from: Option<Timestamp>,
    /// Exclusive upper bound on `create_time`.
    pub to: Option<Timestamp>,
    /// When false, events with no description are filtered out.
    pub include_without_description: bool,
    pub geo: Option<GeoFilter>,
    pub order_by: ArchiveOrder,
    pub count: Option<i64>,
}

impl Default for ArchiveQuery {
    /// No filters: everything included, newest first.
    fn default() -> Self {
        Self {
            search: None,
            municipality_ids: None,
            event_type_ids: None,
            on_going: None,
            from: None,
            to: None,
            include_without_description: true,
            geo: None,
            order_by: ArchiveOrder::default(),
            count: None,
        }
    }
}
