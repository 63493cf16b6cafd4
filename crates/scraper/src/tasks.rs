//! Periodic reconciliation loops.
//!
//! Each loop is an independent, self-rescheduling task: it runs one tick,
//! logs the outcome, and waits for the next interval relative to its own
//! completion (`MissedTickBehavior::Delay`, not wall-clock cron). A tick
//! failure is logged and swallowed; the loop always survives to retry on
//! the next schedule. Loops share no lock and may run concurrently
//! against the store. All tasks stop when their [`CancellationToken`] is
//! triggered.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use crate::reconcile::{Scraper, ScrapeError};

/// Tick periods for the four loops.
#[derive(Debug, Clone)]
pub struct TaskPeriods {
    pub scrape_latest: Duration,
    pub update_descriptions: Duration,
    pub close_stale: Duration,
    pub scrape_large_events: Duration,
}

impl Default for TaskPeriods {
    fn default() -> Self {
        Self {
            scrape_latest: Duration::from_secs(10),
            update_descriptions: Duration::from_secs(60),
            close_stale: Duration::from_secs(24 * 60 * 60),
            scrape_large_events: Duration::from_secs(60),
        }
    }
}

/// Spawn the four reconciliation loops. Returns their join handles so the
/// caller can await them after cancelling.
pub fn spawn_all(
    scraper: Arc<Scraper>,
    periods: &TaskPeriods,
    cancel: &CancellationToken,
) -> Vec<JoinHandle<()>> {
    vec![
        spawn_loop("scrape_latest", periods.scrape_latest, cancel.clone(), {
            let scraper = Arc::clone(&scraper);
            move || {
                let scraper = Arc::clone(&scraper);
                async move { scraper.scrape_latest().await }
            }
        }),
        spawn_loop(
            "update_ongoing_descriptions",
            periods.update_descriptions,
            cancel.clone(),
            {
                let scraper = Arc::clone(&scraper);
                move || {
                    let scraper = Arc::clone(&scraper);
                    async move { scraper.update_ongoing_descriptions().await }
                }
            },
        ),
        spawn_loop("close_stale_events", periods.close_stale, cancel.clone(), {
            let scraper = Arc::clone(&scraper);
            move || {
                let scraper = Arc::clone(&scraper);
                async move { scraper.close_stale_events().await }
            }
        }),
        spawn_loop(
            "scrape_large_events",
            periods.scrape_large_events,
            cancel.clone(),
            {
                let scraper = Arc::clone(&scraper);
                move || {
                    let scraper = Arc::clone(&scraper);
                    async move { scraper.scrape_large_events().await }
                }
            },
        ),
    ]
}

/// Drive one tick function on a fixed interval until cancelled.
fn spawn_loop<F, Fut>(
    name: &'static str,
    period: Duration,
    cancel: CancellationToken,
    tick: F,
) -> JoinHandle<()>
where
    F: Fn() -> Fut + Send + 'static,
    Fut: Future<Output = Result<u64, ScrapeError>> + Send,
{
    tokio::spawn(async move {
        tracing::info!(task = name, period_secs = period.as_secs(), "Task started");

        let mut interval = tokio::time::interval(period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    tracing::info!(task = name, "Task stopping");
                    break;
                }
                _ = interval.tick() => {
                    // Failure boundary: a failed tick must not kill the loop.
                    match tick().await {
                        Ok(changed) => {
                            tracing::debug!(task = name, changed, "Tick complete");
                        }
                        Err(e) => {
                            tracing::error!(task = name, error = %e, "Tick failed");
                        }
                    }
                }
            }
        }
    })
}
