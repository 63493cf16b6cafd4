use std::time::Duration;

use spinner_feed::FeedConfig;
use spinner_scraper::reconcile::{DEFAULT_FETCH_CONCURRENCY, DEFAULT_STALE_AFTER_HOURS};
use spinner_scraper::tasks::TaskPeriods;

/// Default FCM v1 send endpoint for the Spinner client project.
const DEFAULT_PUSH_ENDPOINT: &str =
    "https://fcm.googleapis.com/v1/projects/spinner-client/messages:send";

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS`.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Upstream feed endpoints.
    pub feed: FeedConfig,
    /// Push sink endpoint (`PUSH_ENDPOINT`).
    pub push_endpoint: String,
    /// Bearer token for the push sink (`FCM_TOKEN`).
    pub push_token: String,
    /// Tick periods for the reconciliation loops.
    pub task_periods: TaskPeriods,
    /// Bound on concurrent per-ID upstream fetches.
    pub fetch_concurrency: usize,
    /// Hours after which an ongoing event is force-closed.
    pub stale_after_hours: i64,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                     | Default                           |
    /// |-----------------------------|-----------------------------------|
    /// | `HOST`                      | `0.0.0.0`                         |
    /// | `PORT`                      | `3000`                            |
    /// | `CORS_ORIGINS`              | `http://localhost:5173`           |
    /// | `REQUEST_TIMEOUT_SECS`      | `30`                              |
    /// | `FEED_API_BASE`             | SPIN public API base              |
    /// | `FEED_ASSETS_BASE`          | SPIN static assets base           |
    /// | `PUSH_ENDPOINT`             | FCM v1 messages:send              |
    /// | `FCM_TOKEN`                 | empty (push disabled in dev)      |
    /// | `SCRAPE_INTERVAL_SECS`      | `10`                              |
    /// | `DESCRIPTION_INTERVAL_SECS` | `60`                              |
    /// | `STALE_SWEEP_INTERVAL_SECS` | `86400`                           |
    /// | `LARGE_EVENT_INTERVAL_SECS` | `60`                              |
    /// | `FETCH_CONCURRENCY`         | `16`                              |
    /// | `STALE_AFTER_HOURS`         | `48`                              |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs = env_u64("REQUEST_TIMEOUT_SECS", 30);

        let default_feed = FeedConfig::default();
        let feed = FeedConfig {
            api_base: std::env::var("FEED_API_BASE").unwrap_or(default_feed.api_base),
            assets_base: std::env::var("FEED_ASSETS_BASE").unwrap_or(default_feed.assets_base),
        };

        let push_endpoint =
            std::env::var("PUSH_ENDPOINT").unwrap_or_else(|_| DEFAULT_PUSH_ENDPOINT.into());
        let push_token = std::env::var("FCM_TOKEN").unwrap_or_default();

        let task_periods = TaskPeriods {
            scrape_latest: Duration::from_secs(env_u64("SCRAPE_INTERVAL_SECS", 10)),
            update_descriptions: Duration::from_secs(env_u64("DESCRIPTION_INTERVAL_SECS", 60)),
            close_stale: Duration::from_secs(env_u64("STALE_SWEEP_INTERVAL_SECS", 86_400)),
            scrape_large_events: Duration::from_secs(env_u64("LARGE_EVENT_INTERVAL_SECS", 60)),
        };

        let fetch_concurrency =
            env_u64("FETCH_CONCURRENCY", DEFAULT_FETCH_CONCURRENCY as u64) as usize;
        let stale_after_hours =
            env_u64("STALE_AFTER_HOURS", DEFAULT_STALE_AFTER_HOURS as u64) as i64;

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            feed,
            push_endpoint,
            push_token,
            task_periods,
            fetch_concurrency,
            stale_after_hours,
        }
    }
}

fn env_u64(name: &str, default: u64) -> u64 {
    std::env::var(name)
        .unwrap_or_else(|_| default.to_string())
        .parse()
        .unwrap_or_else(|_| panic!("{name} must be a valid u64"))
}
