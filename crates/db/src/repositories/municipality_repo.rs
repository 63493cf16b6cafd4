use sqlx::PgPool;

use crate::models::municipality::Municipality;

/// Provides read operations for the `municipalities` reference table.
pub struct MunicipalityRepo;

impl MunicipalityRepo {
    /// List all municipalities sorted by name.
    pub async fn list_all(pool: &PgPool) -> Result<Vec<Municipality>, sqlx::Error> {
        sqlx::query_as::<_, Municipality>(
            "SELECT id, name, mid FROM municipalities ORDER BY name",
        )
        .fetch_all(pool)
        .await
    }
}
