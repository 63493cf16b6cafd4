//! Request handlers, one module per resource.

pub mod archive;
pub mod large_events;
pub mod live;
pub mod reference;
pub mod subscription;
