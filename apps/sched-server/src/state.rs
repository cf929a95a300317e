//! Application state.

use std::sync::Arc;

use schedule_store::ScheduleStore;

use crate::config::Config;
use crate::services::{ScheduleCoordinator, TimeError, TimeNormalizer};

/// Shared application state.
pub struct AppState<S: ScheduleStore> {
    /// Server configuration.
    pub config: Config,
    /// Request coordinator over the schedule store.
    pub coordinator: ScheduleCoordinator<S>,
}

impl<S: ScheduleStore> AppState<S> {
    /// Creates new application state.
    pub fn new(config: Config, store: S) -> Result<Self, TimeError> {
        let normalizer = TimeNormalizer::new(&config.time_zone)?;
        Ok(Self {
            coordinator: ScheduleCoordinator::new(Arc::new(store), normalizer),
            config,
        })
    }
}

/// Type alias for shared state.
pub type SharedState<S> = Arc<AppState<S>>;

/// Creates shared state from config and store.
pub fn create_shared_state<S: ScheduleStore>(
    config: Config,
    store: S,
) -> Result<SharedState<S>, TimeError> {
    Ok(Arc::new(AppState::new(config, store)?))
}
