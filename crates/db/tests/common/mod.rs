//! Shared helpers for repository integration tests.

use chrono::{Duration, Utc};
use sqlx::PgPool;
use spinner_core::types::{DbId, Timestamp};
use spinner_db::models::event::NewEvent;

/// Insert a municipality row, returning its ID.
pub async fn seed_municipality(pool: &PgPool, name: &str, mid: i64) -> DbId {
    sqlx::query_scalar("INSERT INTO municipalities (name, mid) VALUES ($1, $2) RETURNING id")
        .bind(name)
        .bind(mid)
        .fetch_one(pool)
        .await
        .expect("seed municipality")
}

/// Insert an event-type row, returning its ID.
pub async fn seed_event_type(pool: &PgPool, name: &str) -> DbId {
    sqlx::query_scalar("INSERT INTO event_types (name) VALUES ($1) RETURNING id")
        .bind(name)
        .fetch_one(pool)
        .await
        .expect("seed event type")
}

/// A timestamp `hours` in the past.
pub fn hours_ago(hours: i64) -> Timestamp {
    Utc::now() - Duration::hours(hours)
}

/// Build a minimal insertable event at the given encoded coordinates.
pub fn new_event(
    id: DbId,
    municipality_id: DbId,
    event_type_id: DbId,
    lat: i32,
    lon: i32,
) -> NewEvent {
    NewEvent {
        id,
        municipality_id,
        event_type_id,
        lat,
        lon,
        create_time: hours_ago(1),
        report_time: hours_ago(1),
        description: Some(format!("event {id}")),
        title: None,
        on_going: false,
    }
}
