use serde::Serialize;
use spinner_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// A row from the `large_events` table (multi-municipality bulletins).
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct LargeEvent {
    pub id: DbId,
    pub municipality_id: DbId,
    pub create_time: Timestamp,
    pub description: String,
}

/// A bulletin to insert. Insertion is duplicate-skipping on the natural
/// key (municipality, create time, description) because upstream assigns
/// no stable bulletin ID.
#[derive(Debug, Clone, PartialEq)]
pub struct NewLargeEvent {
    pub municipality_id: DbId,
    pub create_time: Timestamp,
    pub description: String,
}
