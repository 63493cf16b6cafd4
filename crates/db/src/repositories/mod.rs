//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept `&PgPool` as the first argument.

pub mod event_repo;
pub mod event_type_repo;
pub mod large_event_repo;
pub mod log_repo;
pub mod municipality_repo;
pub mod subscription_repo;

pub use event_repo::EventRepo;
pub use event_type_repo::EventTypeRepo;
pub use large_event_repo::LargeEventRepo;
pub use log_repo::LogRepo;
pub use municipality_repo::MunicipalityRepo;
pub use subscription_repo::SubscriptionRepo;
