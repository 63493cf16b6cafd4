use sqlx::PgPool;

use crate::models::large_event::{LargeEvent, NewLargeEvent};

/// Provides read/write operations for multi-municipality bulletins.
pub struct LargeEventRepo;

impl LargeEventRepo {
    /// Insert bulletins, silently skipping rows that collide on the
    /// natural key. Upstream re-publishes the same bulletin snapshot on
    /// every fetch, so idempotent insertion is required. Returns the
    /// number of rows actually inserted.
    pub async fn insert_skip_duplicates(
        pool: &PgPool,
        bulletins: &[NewLargeEvent],
    ) -> Result<u64, sqlx::Error> {
        let mut inserted = 0;
        for bulletin in bulletins {
            let result = sqlx::query(
                "INSERT INTO large_events (municipality_id, create_time, description) \
                 VALUES ($1, $2, $3) \
                 ON CONFLICT ON CONSTRAINT uq_large_events_natural_key DO NOTHING",
            )
            .bind(bulletin.municipality_id)
            .bind(bulletin.create_time)
            .bind(&bulletin.description)
            .execute(pool)
            .await?;
            inserted += result.rows_affected();
        }
        Ok(inserted)
    }

    /// List stored bulletins, newest first.
    pub async fn list_recent(pool: &PgPool, limit: i64) -> Result<Vec<LargeEvent>, sqlx::Error> {
        sqlx::query_as::<_, LargeEvent>(
            "SELECT id, municipality_id, create_time, description \
             FROM large_events ORDER BY create_time DESC LIMIT $1",
        )
        .bind(limit)
        .fetch_all(pool)
        .await
    }
}
