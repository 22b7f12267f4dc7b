//! Application state management

use crate::inference::InferenceEngine;

use super::ServerConfig;

/// Application state shared across handlers.
///
/// Read-only after startup, so handlers never lock.
pub struct AppState {
    pub config: ServerConfig,
    pub engine: InferenceEngine,
    pub started_at: chrono::DateTime<chrono::Utc>,
}

impl AppState {
    pub fn new(config: ServerConfig, engine: InferenceEngine) -> Self {
        Self {
            config,
            engine,
            started_at: chrono::Utc::now(),
        }
    }

    /// Seconds since the state was built
    pub fn uptime_secs(&self) -> i64 {
        chrono::Utc::now()
            .signed_duration_since(self.started_at)
            .num_seconds()
    }
}
