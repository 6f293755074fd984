//! Lifecycle vacuum and stability refresh configuration.

use serde::{Deserialize, Serialize};

/// Configuration for the lifecycle vacuum.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LifecycleConfig {
    /// Minimum days a soft-deleted chunk stays in the store before hard delete.
    pub grace_period_days: i64,
    /// Minimum stability delta that is persisted.
    pub stability_update_epsilon: f64,
    /// Maximum chunks scanned per vacuum pass.
    pub vacuum_scan_limit: usize,
    /// Maximum live chunks scanned per stability refresh.
    pub stability_scan_limit: usize,
    /// Run the stability refresh after each vacuum pass.
    pub stability_refresh_enabled: bool,
}

impl Default for LifecycleConfig {
    fn default() -> Self {
        Self {
            grace_period_days: 14,
            stability_update_epsilon: 0.05,
            vacuum_scan_limit: 1000,
            stability_scan_limit: 500,
            stability_refresh_enabled: true,
        }
    }
}
