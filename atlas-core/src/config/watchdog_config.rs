//! Watchdog policy loop configuration.

use serde::{Deserialize, Serialize};

/// Configuration for the consolidation watchdog.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WatchdogConfig {
    /// Base trigger count before scaling.
    pub base_threshold: u64,
    /// Scaling slope applied to the collection point count.
    pub scale_factor: f64,
    /// Poll tick period in milliseconds.
    pub poll_interval_ms: u64,
    /// Disable the vector index's approximate layer for the duration of a pass.
    pub use_hnsw_toggle: bool,
}

impl Default for WatchdogConfig {
    fn default() -> Self {
        Self {
            base_threshold: 100,
            scale_factor: 0.05,
            poll_interval_ms: 30_000,
            use_hnsw_toggle: true,
        }
    }
}
