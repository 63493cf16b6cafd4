use sqlx::PgPool;

use crate::models::event_type::EventType;

/// Provides read operations for the `event_types` reference table.
pub struct EventTypeRepo;

impl EventTypeRepo {
    /// List all event types sorted by ID.
    pub async fn list_all(pool: &PgPool) -> Result<Vec<EventType>, sqlx::Error> {
        sqlx::query_as::<_, EventType>("SELECT id, name FROM event_types ORDER BY id")
            .fetch_all(pool)
            .await
    }
}
