//! Row structs and DTOs.
//!
//! Each submodule contains a `FromRow` + `Serialize` entity struct matching
//! the database row, plus the insert DTOs the repositories accept.

pub mod event;
pub mod event_type;
pub mod large_event;
pub mod log;
pub mod municipality;
pub mod subscription;
