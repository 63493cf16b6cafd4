//! HTTP client for the SPIN feed endpoints.

use std::time::Duration;

use crate::index::parse_index_ids;
use crate::types::{EventEnvelope, ListEnvelope, RawEvent, RawLargeEvent};
use crate::FeedError;

/// HTTP request timeout for a single upstream fetch.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Upstream endpoint configuration.
#[derive(Debug, Clone)]
pub struct FeedConfig {
    /// API base, e.g. `https://spin3.sos112.si/api/javno`.
    pub api_base: String,
    /// Static asset base, e.g. `https://spin3.sos112.si/javno/assets/data`.
    pub assets_base: String,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            api_base: "https://spin3.sos112.si/api/javno".into(),
            assets_base: "https://spin3.sos112.si/javno/assets/data".into(),
        }
    }
}

/// Client for the upstream feed. Cheap to clone; the inner reqwest client
/// is reference-counted.
#[derive(Debug, Clone)]
pub struct FeedClient {
    http: reqwest::Client,
    config: FeedConfig,
}

impl FeedClient {
    /// Create a client with a pre-configured HTTP client.
    pub fn new(config: FeedConfig) -> Self {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("Failed to build reqwest HTTP client");
        Self { http, config }
    }

    /// Fetch the RSS index and extract the recently published event IDs,
    /// in document order.
    pub async fn fetch_index_ids(&self) -> Result<Vec<i64>, FeedError> {
        let url = format!("{}/ODRSS/true", self.config.api_base);
        let body = self
            .http
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        let ids = parse_index_ids(&body);
        if ids.is_empty() {
            return Err(FeedError::Malformed(
                "RSS index contained no numeric event links".into(),
            ));
        }
        Ok(ids)
    }

    /// Fetch one event by ID.
    ///
    /// Returns `Ok(None)` when upstream reports no record for the ID,
    /// which is a normal condition: upstream numbering has gaps.
    pub async fn fetch_event(&self, id: i64) -> Result<Option<RawEvent>, FeedError> {
        let url = format!("{}/lokacija/{id}", self.config.api_base);
        let envelope: EventEnvelope = self
            .http
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(envelope.value.map(|mut event| {
            event.id = id;
            event
        }))
    }

    /// Fetch the current live-event snapshot.
    pub async fn fetch_live_events(&self) -> Result<Vec<RawEvent>, FeedError> {
        let url = format!("{}/lokacija.json", self.config.assets_base);
        let envelope: ListEnvelope<RawEvent> = self
            .http
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(envelope.value)
    }

    /// Fetch the current large-scale bulletin snapshot. The list is small
    /// and unpaginated.
    pub async fn fetch_large_events(&self) -> Result<Vec<RawLargeEvent>, FeedError> {
        let url = format!("{}/vecjiObseg.json", self.config.assets_base);
        let envelope: ListEnvelope<RawLargeEvent> = self
            .http
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(envelope.value)
    }
}
