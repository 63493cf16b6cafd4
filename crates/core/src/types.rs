/// Local primary keys are PostgreSQL BIGSERIAL; upstream event IDs share
/// the same width.
pub type DbId = i64;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
