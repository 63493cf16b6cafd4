//! Shared domain types and pure logic for the Spinner backend.
//!
//! Everything here is free of I/O: ID/timestamp aliases, the domain error
//! type, coordinate encoding, great-circle geometry, and archive query
//! primitives. The `db`, `scraper`, and `api` crates build on these.

pub mod archive;
pub mod coords;
pub mod error;
pub mod geo;
pub mod types;
