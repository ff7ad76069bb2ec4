//! Shared application state for Axum routers.

use curator_engine::SyncEngine;

/// Application-wide state shared across all routes.
#[derive(Clone)]
pub struct AppState {
    /// The synchronization engine over the three stores.
    pub engine: SyncEngine,
    pub start_time: std::time::Instant,
}

impl AppState {
    pub fn new(engine: SyncEngine) -> Self {
        Self {
            engine,
            start_time: std::time::Instant::now(),
        }
    }
}
