//! HTTP API for the Spinner backend: archive queries, reference tables,
//! subscription registration, and live upstream proxies.

pub mod config;
pub mod error;
pub mod handlers;
pub mod response;
pub mod routes;
pub mod state;
