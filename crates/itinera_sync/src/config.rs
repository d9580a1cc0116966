//! Synchronizer configuration.

use std::time::Duration;

/// Default interval between flushes of buffered reorder operations.
pub const DEFAULT_FLUSH_INTERVAL: Duration = Duration::from_secs(15);

/// Configuration for the synchronization coordinator.
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// How often the background flusher drains buffered reorders into the
    /// event store.
    pub flush_interval: Duration,
}

impl SyncConfig {
    /// Creates a configuration with default settings.
    pub fn new() -> Self {
        Self {
            flush_interval: DEFAULT_FLUSH_INTERVAL,
        }
    }

    /// Sets the flush interval.
    pub fn with_flush_interval(mut self, interval: Duration) -> Self {
        self.flush_interval = interval;
        self
    }
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = SyncConfig::default();
        assert_eq!(config.flush_interval, Duration::from_secs(15));
    }

    #[test]
    fn config_builder() {
        let config = SyncConfig::new().with_flush_interval(Duration::from_millis(50));
        assert_eq!(config.flush_interval, Duration::from_millis(50));
    }
}
