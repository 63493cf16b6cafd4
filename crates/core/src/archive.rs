//! Archive query primitives shared by the repository and API layers.

use serde::Deserialize;

/// Default number of archive rows returned when no `count` is given.
pub const DEFAULT_ARCHIVE_COUNT: i64 = 100;

/// Hard upper bound on archive result size.
pub const MAX_ARCHIVE_COUNT: i64 = 1000;

/// Result ordering for archive queries.
///
/// Unknown values are rejected at deserialization time, which surfaces to
/// API callers as a 400 naming the `order_by` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArchiveOrder {
    /// Oldest first by creation time.
    DateAsc,
    /// Newest first by creation time (the default).
    #[default]
    DateDesc,
    /// Nearest first by spherical distance from the geo-filter center.
    /// Requires a geo filter; without one the engine falls back to
    /// [`ArchiveOrder::DateDesc`].
    Distance,
}

/// Clamp a requested result count into `[1, MAX_ARCHIVE_COUNT]`.
pub fn clamp_count(count: Option<i64>) -> i64 {
    count
        .unwrap_or(DEFAULT_ARCHIVE_COUNT)
        .clamp(1, MAX_ARCHIVE_COUNT)
}
