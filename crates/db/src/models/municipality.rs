use serde::Serialize;
use spinner_core::types::DbId;
use sqlx::FromRow;

/// A row from the `municipalities` reference table.
///
/// `mid` is the upstream municipality identifier, used to resolve bulletin
/// records where name matching is unreliable.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Municipality {
    pub id: DbId,
    pub name: String,
    pub mid: DbId,
}
