use serde::Serialize;
use spinner_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// Which reconciliation operation a log row records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, sqlx::Type)]
#[sqlx(type_name = "text")]
pub enum ChangeKind {
    #[sqlx(rename = "FETCH_LATEST")]
    #[serde(rename = "FETCH_LATEST")]
    FetchLatest,
    #[sqlx(rename = "UPDATE_ONGOING")]
    #[serde(rename = "UPDATE_ONGOING")]
    UpdateOngoing,
}

/// A row from the append-only `logs` audit table. Never mutated or
/// deleted; purely diagnostic.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct LogEntry {
    pub id: DbId,
    pub updated: ChangeKind,
    pub changed_entries: i32,
    pub created_at: Timestamp,
}
