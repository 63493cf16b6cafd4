//! Event ingestion and reconciliation.
//!
//! The [`Scraper`] reconciles the local store against the upstream feed:
//! it fills the gap between the highest local and upstream event IDs,
//! back-fills descriptions on ongoing events, force-closes stale ones, and
//! ingests large-scale bulletins. New events fan out to push subscribers.
//!
//! Each operation is one atomic logical tick; [`tasks`] wires them into
//! independent self-rescheduling loops.

pub mod mapper;
pub mod notify;
pub mod reconcile;
pub mod tasks;

pub use mapper::{MapError, ReferenceCache};
pub use notify::PushClient;
pub use reconcile::{Scraper, ScrapeError};
