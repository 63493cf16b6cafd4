//! Push-notification fan-out for newly inserted events.
//!
//! One reconciliation batch produces at most one message per subscriber
//! token: matched subscription rows are grouped by token, the triggering
//! reference names deduplicated, and a single summary message dispatched
//! per recipient. Delivery is fire-and-forget relative to ingestion:
//! failures are counted and logged, never retried, never escalated.

use std::collections::{BTreeMap, BTreeSet};
use std::time::Duration;

use spinner_db::models::event::NewEvent;
use spinner_db::models::subscription::MatchedSubscription;
use spinner_db::repositories::SubscriptionRepo;
use spinner_db::DbPool;

/// Notification title (upstream app copy is Slovenian).
const TITLE: &str = "Nov dogodek";

/// HTTP request timeout for a single push dispatch.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// The deduplicated interests of one recipient.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecipientTriggers {
    /// Token has at least one unfiltered subscription row and no named
    /// matches.
    SubscribedToAll,
    /// Distinct, sorted municipality/event-type names that matched.
    Named(BTreeSet<String>),
}

/// Group matched subscription rows by token, collecting the distinct set
/// of triggering names per recipient. Rows with no names (subscribe to
/// all) leave the set empty, which becomes the sentinel variant.
pub fn group_by_token(rows: &[MatchedSubscription]) -> BTreeMap<String, RecipientTriggers> {
    let mut names_by_token: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
    for row in rows {
        let names = names_by_token.entry(row.gcm_token.clone()).or_default();
        if let Some(name) = &row.municipality_name {
            names.insert(name.clone());
        }
        if let Some(name) = &row.event_type_name {
            names.insert(name.clone());
        }
    }

    names_by_token
        .into_iter()
        .map(|(token, names)| {
            let triggers = if names.is_empty() {
                RecipientTriggers::SubscribedToAll
            } else {
                RecipientTriggers::Named(names)
            };
            (token, triggers)
        })
        .collect()
}

/// Compose the message body for one recipient: singular phrasing for one
/// match, plural for several, generic for subscribe-to-all.
pub fn compose_body(triggers: &RecipientTriggers) -> String {
    match triggers {
        RecipientTriggers::SubscribedToAll => "Nov dogodek v aplikaciji Spinner".to_string(),
        RecipientTriggers::Named(names) => {
            let start = if names.len() > 1 {
                "Novi dogodki v aplikaciji Spinner"
            } else {
                "Nov dogodek v aplikaciji Spinner"
            };
            let list = names.iter().cloned().collect::<Vec<_>>().join(", ");
            format!("{start}: {list}")
        }
    }
}

/// Client for the external push sink (FCM v1).
#[derive(Debug, Clone)]
pub struct PushClient {
    http: reqwest::Client,
    endpoint: String,
    bearer_token: String,
}

impl PushClient {
    pub fn new(endpoint: String, bearer_token: String) -> Self {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("Failed to build reqwest HTTP client");
        Self {
            http,
            endpoint,
            bearer_token,
        }
    }

    /// POST one message to the push sink.
    async fn send(&self, token: &str, body: &str) -> Result<(), reqwest::Error> {
        let payload = serde_json::json!({
            "message": {
                "token": token,
                "notification": {
                    "title": TITLE,
                    "body": body,
                }
            }
        });

        self.http
            .post(&self.endpoint)
            .bearer_auth(&self.bearer_token)
            .json(&payload)
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }

    /// Resolve subscribers interested in the batch and dispatch one
    /// message per recipient, concurrently. Never fails the caller: all
    /// errors are logged and swallowed.
    pub async fn notify_batch(&self, pool: &DbPool, inserted: &[NewEvent]) {
        if inserted.is_empty() {
            return;
        }

        let municipality_ids: Vec<_> = dedup(inserted.iter().map(|e| e.municipality_id));
        let event_type_ids: Vec<_> = dedup(inserted.iter().map(|e| e.event_type_id));

        let rows =
            match SubscriptionRepo::find_matching(pool, &municipality_ids, &event_type_ids).await {
                Ok(rows) => rows,
                Err(e) => {
                    tracing::error!(error = %e, "Subscription lookup failed, skipping fan-out");
                    return;
                }
            };
        if rows.is_empty() {
            return;
        }

        let recipients = group_by_token(&rows);
        let sends = recipients.iter().map(|(token, triggers)| {
            let body = compose_body(triggers);
            async move { self.send(token, &body).await }
        });

        let results = futures::future::join_all(sends).await;
        let fulfilled = results.iter().filter(|r| r.is_ok()).count();
        let rejected = results.len() - fulfilled;
        for error in results.iter().filter_map(|r| r.as_ref().err()) {
            tracing::warn!(error = %error, "Push dispatch failed");
        }
        tracing::info!(fulfilled, rejected, "Sent notifications");
    }
}

fn dedup<I: Iterator<Item = i64>>(ids: I) -> Vec<i64> {
    let set: BTreeSet<i64> = ids.collect();
    set.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(token: &str, municipality: Option<&str>, event_type: Option<&str>) -> MatchedSubscription {
        MatchedSubscription {
            gcm_token: token.to_string(),
            municipality_name: municipality.map(String::from),
            event_type_name: event_type.map(String::from),
        }
    }

    #[test]
    fn municipality_only_subscriber_gets_one_named_message() {
        let grouped = group_by_token(&[row("t1", Some("Ljubljana"), None)]);
        assert_eq!(grouped.len(), 1);
        assert_eq!(
            compose_body(&grouped["t1"]),
            "Nov dogodek v aplikaciji Spinner: Ljubljana"
        );
    }

    #[test]
    fn unfiltered_subscriber_gets_generic_message() {
        let grouped = group_by_token(&[row("t1", None, None)]);
        assert_eq!(grouped["t1"], RecipientTriggers::SubscribedToAll);
        assert_eq!(
            compose_body(&grouped["t1"]),
            "Nov dogodek v aplikaciji Spinner"
        );
    }

    #[test]
    fn subscriber_matching_both_gets_one_message_naming_both() {
        let grouped = group_by_token(&[
            row("t1", Some("Ljubljana"), None),
            row("t1", None, Some("Požari v naravi")),
        ]);
        assert_eq!(grouped.len(), 1);
        let body = compose_body(&grouped["t1"]);
        assert!(body.starts_with("Novi dogodki v aplikaciji Spinner: "));
        assert!(body.contains("Ljubljana"));
        assert!(body.contains("Požari v naravi"));
    }

    #[test]
    fn duplicate_interest_is_deduplicated() {
        let grouped = group_by_token(&[
            row("t1", Some("Ljubljana"), None),
            row("t1", Some("Ljubljana"), None),
        ]);
        assert_eq!(
            compose_body(&grouped["t1"]),
            "Nov dogodek v aplikaciji Spinner: Ljubljana"
        );
    }

    #[test]
    fn tokens_are_grouped_independently() {
        let grouped = group_by_token(&[
            row("t1", Some("Ljubljana"), None),
            row("t2", None, None),
            row("t3", Some("Maribor"), Some("Poplave")),
        ]);
        assert_eq!(grouped.len(), 3);
        assert_eq!(grouped["t2"], RecipientTriggers::SubscribedToAll);
        assert_eq!(
            compose_body(&grouped["t3"]),
            "Novi dogodki v aplikaciji Spinner: Maribor, Poplave"
        );
    }
}
