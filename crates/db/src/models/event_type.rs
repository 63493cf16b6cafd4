use serde::Serialize;
use spinner_core::types::DbId;
use sqlx::FromRow;

/// A row from the `event_types` reference table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct EventType {
    pub id: DbId,
    pub name: String,
}
