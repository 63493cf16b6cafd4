use sqlx::PgPool;
use spinner_core::types::DbId;

use crate::models::subscription::MatchedSubscription;

/// Provides read/write operations for push subscriptions.
pub struct SubscriptionRepo;

impl SubscriptionRepo {
    /// Register a token's interests: one row per listed municipality ID,
    /// one per listed event-type ID, or a single unfiltered row when no
    /// IDs are given (subscribe to all). Returns the number of rows
    /// inserted.
    pub async fn register(
        pool: &PgPool,
        gcm_token: &str,
        municipality_ids: &[DbId],
        event_type_ids: &[DbId],
    ) -> Result<u64, sqlx::Error> {
        if municipality_ids.is_empty() && event_type_ids.is_empty() {
            sqlx::query("INSERT INTO subscriptions (gcm_token) VALUES ($1)")
                .bind(gcm_token)
                .execute(pool)
                .await?;
            return Ok(1);
        }

        let mut tx = pool.begin().await?;
        let mut inserted = 0;
        for municipality_id in municipality_ids {
            sqlx::query(
                "INSERT INTO subscriptions (gcm_token, municipality_id) VALUES ($1, $2)",
            )
            .bind(gcm_token)
            .bind(municipality_id)
            .execute(&mut *tx)
            .await?;
            inserted += 1;
        }
        for event_type_id in event_type_ids {
            sqlx::query(
                "INSERT INTO subscriptions (gcm_token, event_type_id) VALUES ($1, $2)",
            )
            .bind(gcm_token)
            .bind(event_type_id)
            .execute(&mut *tx)
            .await?;
            inserted += 1;
        }
        tx.commit().await?;

        Ok(inserted)
    }

    /// Find subscription rows triggered by a batch touching the given
    /// municipality and event-type IDs: rows matching either list, plus
    /// every subscribe-to-all row (both filter columns NULL). Reference
    /// names are joined in for message composition.
    pub async fn find_matching(
        pool: &PgPool,
        municipality_ids: &[DbId],
        event_type_ids: &[DbId],
    ) -> Result<Vec<MatchedSubscription>, sqlx::Error> {
        sqlx::query_as::<_, MatchedSubscription>(
            "SELECT s.gcm_token, \
                    m.name AS municipality_name, \
                    t.name AS event_type_name \
             FROM subscriptions s \
             LEFT JOIN municipalities m ON m.id = s.municipality_id \
             LEFT JOIN event_types t ON t.id = s.event_type_id \
             WHERE s.municipality_id = ANY($1) \
                OR s.event_type_id = ANY($2) \
                OR (s.municipality_id IS NULL AND s.event_type_id IS NULL)",
        )
        .bind(municipality_ids)
        .bind(event_type_ids)
        .fetch_all(pool)
        .await
    }
}
