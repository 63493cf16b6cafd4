use serde::Serialize;
use spinner_core::types::DbId;
use sqlx::FromRow;

/// A row from the `subscriptions` table.
///
/// A push token may appear on several rows, one per registered interest.
/// A row with both filter columns `NULL` subscribes the token to all
/// new events.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Subscription {
    pub id: DbId,
    pub gcm_token: String,
    pub municipality_id: Option<DbId>,
    pub event_type_id: Option<DbId>,
}

/// A matched subscription row joined to its reference names, as returned
/// by `SubscriptionRepo::find_matching` for notification fan-out.
#[derive(Debug, Clone, FromRow)]
pub struct MatchedSubscription {
    pub gcm_token: String,
    pub municipality_name: Option<String>,
    pub event_type_name: Option<String>,
}
