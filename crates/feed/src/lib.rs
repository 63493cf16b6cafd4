//! Client for the SPIN public emergency-dispatch feed.
//!
//! Three upstream surfaces are consumed: an RSS index of recently
//! published event IDs, a per-ID JSON detail endpoint, and two snapshot
//! endpoints (live events, large-scale bulletins). All responses arrive
//! in a `{ value: ... }` envelope; an absent `value` on the detail
//! endpoint means "no such event" and is not an error.

mod client;
mod index;
pub mod types;

pub use client::{FeedClient, FeedConfig};
pub use index::parse_index_ids;

/// Errors from the upstream feed.
#[derive(Debug, thiserror::Error)]
pub enum FeedError {
    /// The HTTP request failed (network, DNS, timeout, non-2xx status).
    #[error("Upstream unavailable: {0}")]
    Unavailable(#[from] reqwest::Error),

    /// The feed was fetched but could not be parsed.
    #[error("Upstream malformed: {0}")]
    Malformed(String),
}
