use sqlx::PgPool;
use spinner_core::types::DbId;

use crate::models::log::{ChangeKind, LogEntry};

/// Provides append operations for the reconciliation audit log.
pub struct LogRepo;

impl LogRepo {
    /// Append one log row recording a reconciliation run. Returns the
    /// generated row ID.
    pub async fn insert(
        pool: &PgPool,
        updated: ChangeKind,
        changed_entries: i32,
    ) -> Result<DbId, sqlx::Error> {
        sqlx::query_scalar(
            "INSERT INTO logs (updated, changed_entries) VALUES ($1, $2) RETURNING id",
        )
        .bind(updated)
        .bind(changed_entries)
        .fetch_one(pool)
        .await
    }

    /// List recent log rows, newest first. Diagnostic use only.
    pub async fn list_recent(pool: &PgPool, limit: i64) -> Result<Vec<LogEntry>, sqlx::Error> {
        sqlx::query_as::<_, LogEntry>(
            "SELECT id, updated, changed_entries, created_at \
             FROM logs ORDER BY id DESC LIMIT $1",
        )
        .bind(limit)
        .fetch_all(pool)
        .await
    }
}
