//! Request coordination and the checks it runs before touching the store.

pub mod coordinator;
pub mod reference;
pub mod time_normalizer;

pub use coordinator::ScheduleCoordinator;
pub use reference::EventReferenceValidator;
pub use time_normalizer::{TimeError, TimeNormalizer};
