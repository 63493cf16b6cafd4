//! The reconciliation engine.
//!
//! Four operations, each one atomic logical tick (see the module docs in
//! [`crate`]): `scrape_latest`, `update_ongoing_descriptions`,
//! `close_stale_events`, and `scrape_large_events`. Ticks either complete
//! or fail as a whole; the loops in [`crate::tasks`] catch per-tick
//! failures and reschedule.

use std::sync::Arc;

use chrono::Utc;
use futures::stream::{self, StreamExt};
use spinner_db::models::event::NewEvent;
use spinner_db::models::log::ChangeKind;
use spinner_db::repositories::{EventRepo, LargeEventRepo, LogRepo};
use spinner_db::DbPool;
use spinner_feed::types::RawEvent;
use spinner_feed::{FeedClient, FeedError};

use crate::mapper::{self, MapError, ReferenceCache};
use crate::notify::PushClient;

/// Default bound on concurrent per-ID upstream fetches. A large ID gap
/// (e.g. after extended downtime) would otherwise burst one request per
/// missing ID at once.
pub const DEFAULT_FETCH_CONCURRENCY: usize = 16;

/// Default staleness window: ongoing events older than this are
/// force-closed.
pub const DEFAULT_STALE_AFTER_HOURS: i64 = 48;

/// Errors fatal to a single reconciliation tick. The loops log these and
/// retry on the next schedule; they never terminate the process.
#[derive(Debug, thiserror::Error)]
pub enum ScrapeError {
    /// The upstream index or the local store yields no usable high-water
    /// mark.
    #[error("No events found")]
    NoEventsFound,

    #[error(transparent)]
    Feed(#[from] FeedError),

    #[error(transparent)]
    Map(#[from] MapError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Tuning knobs for the reconciliation engine.
#[derive(Debug, Clone)]
pub struct ScraperConfig {
    pub fetch_concurrency: usize,
    pub stale_after: chrono::Duration,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            fetch_concurrency: DEFAULT_FETCH_CONCURRENCY,
            stale_after: chrono::Duration::hours(DEFAULT_STALE_AFTER_HOURS),
        }
    }
}

/// The reconciliation engine. Owns the store pool, feed client, the
/// read-only reference snapshot, and the push client.
pub struct Scraper {
    pool: DbPool,
    feed: FeedClient,
    cache: Arc<ReferenceCache>,
    push: PushClient,
    config: ScraperConfig,
}

impl Scraper {
    pub fn new(
        pool: DbPool,
        feed: FeedClient,
        cache: Arc<ReferenceCache>,
        push: PushClient,
        config: ScraperConfig,
    ) -> Self {
        Self {
            pool,
            feed,
            cache,
            push,
            config,
        }
    }

    /// Fill the gap between the highest local and upstream event IDs.
    ///
    /// No-op when the store is already caught up (this check prevents
    /// fetch-by-ID storms when nothing new has published). Newly inserted
    /// events are handed to notification fan-out; a `FETCH_LATEST` log row
    /// records the inserted count. Returns that count.
    pub async fn scrape_latest(&self) -> Result<u64, ScrapeError> {
        let index_ids = self.feed.fetch_index_ids().await?;
        let upstream_high = index_ids.iter().copied().max();
        let local_high = EventRepo::max_id(&self.pool).await?;

        let (Some(local_high), Some(upstream_high)) = (local_high, upstream_high) else {
            return Err(ScrapeError::NoEventsFound);
        };

        if local_high >= upstream_high {
            tracing::debug!(local_high, "Already caught up with upstream");
            return Ok(0);
        }

        let inserted = self.scrape_range(local_high + 1, upstream_high).await?;
        LogRepo::insert(&self.pool, ChangeKind::FetchLatest, inserted.len() as i32).await?;
        tracing::info!(inserted = inserted.len(), "Inserted events");

        // Fire-and-forget relative to ingestion correctness.
        self.push.notify_batch(&self.pool, &inserted).await;

        Ok(inserted.len() as u64)
    }

    /// Fetch, map, and insert every upstream record in `[start_id, end_id]`.
    ///
    /// IDs absent upstream are silently skipped (gaps in upstream numbering
    /// are expected). Any fetch transport error or mapper failure aborts
    /// the whole batch before insertion; the insert itself is one
    /// transaction, so partial insertion cannot occur.
    pub async fn scrape_range(
        &self,
        start_id: i64,
        end_id: i64,
    ) -> Result<Vec<NewEvent>, ScrapeError> {
        let fetched: Vec<Result<Option<RawEvent>, FeedError>> =
            stream::iter(start_id..=end_id)
                .map(|id| {
                    let feed = self.feed.clone();
                    async move { feed.fetch_event(id).await }
                })
                .buffer_unordered(self.config.fetch_concurrency)
                .collect()
                .await;

        let mut events = Vec::new();
        for result in fetched {
            if let Some(raw) = result? {
                events.push(mapper::map_event(&raw, &self.cache)?);
            }
        }

        EventRepo::insert_batch(&self.pool, &events).await?;
        Ok(events)
    }

    /// Re-fetch every ongoing event; where upstream now supplies a
    /// description, store it and mark the event closed.
    ///
    /// Best-effort: a per-event fetch failure degrades to "no update for
    /// this event" rather than aborting the batch. Writes an
    /// `UPDATE_ONGOING` log row with the updated count and returns it.
    pub async fn update_ongoing_descriptions(&self) -> Result<u64, ScrapeError> {
        let ongoing_ids = EventRepo::ongoing_ids(&self.pool).await?;

        let fetched: Vec<(i64, Result<Option<RawEvent>, FeedError>)> =
            stream::iter(ongoing_ids)
                .map(|id| {
                    let feed = self.feed.clone();
                    async move { (id, feed.fetch_event(id).await) }
                })
                .buffer_unordered(self.config.fetch_concurrency)
                .collect()
                .await;

        let mut updated = 0u64;
        for (id, result) in fetched {
            match result {
                Ok(Some(raw)) => {
                    if let Some(description) = mapper::normalize_text(raw.description.as_deref())
                    {
                        if EventRepo::set_description_and_close(&self.pool, id, &description)
                            .await?
                        {
                            updated += 1;
                        }
                    }
                }
                Ok(None) => {}
                Err(e) => {
                    tracing::warn!(id, error = %e, "Description re-fetch failed, skipping event");
                }
            }
        }

        LogRepo::insert(&self.pool, ChangeKind::UpdateOngoing, updated as i32).await?;
        tracing::info!(updated, "Updated event descriptions");
        Ok(updated)
    }

    /// Force-close ongoing events older than the staleness window. Pure
    /// time-based sweep with no upstream dependency; guards against events
    /// upstream never explicitly closes.
    pub async fn close_stale_events(&self) -> Result<u64, ScrapeError> {
        let cutoff = Utc::now() - self.config.stale_after;
        let closed = EventRepo::close_ongoing_older_than(&self.pool, cutoff).await?;
        tracing::info!(closed, "Closed stale ongoing events");
        Ok(closed)
    }

    /// Fetch the current bulletin snapshot and insert it with
    /// duplicate-skipping. Upstream re-publishes the same bulletins on
    /// every fetch, so most runs insert nothing. Groups without entries
    /// are skipped with a warning rather than failing the tick.
    pub async fn scrape_large_events(&self) -> Result<u64, ScrapeError> {
        let raw_bulletins = self.feed.fetch_large_events().await?;

        let mut bulletins = Vec::with_capacity(raw_bulletins.len());
        for raw in &raw_bulletins {
            if raw.bulletins.is_empty() {
                tracing::warn!(mid = raw.municipality_mid, "Skipping empty bulletin group");
                continue;
            }
            bulletins.push(mapper::map_large_event(raw, &self.cache)?);
        }

        let inserted = LargeEventRepo::insert_skip_duplicates(&self.pool, &bulletins).await?;
        if inserted > 0 {
            tracing::info!(inserted, "Inserted large events");
        }
        Ok(inserted)
    }
}
