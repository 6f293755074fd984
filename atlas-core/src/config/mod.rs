pub mod classifier_config;
pub mod consolidation_config;
pub mod lifecycle_config;
pub mod watchdog_config;

use serde::{Deserialize, Serialize};

pub use classifier_config::ClassifierConfig;
pub use consolidation_config::ConsolidationConfig;
pub use lifecycle_config::LifecycleConfig;
pub use watchdog_config::WatchdogConfig;

/// Top-level configuration aggregating all subsystem configs.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AtlasConfig {
    /// Vector collection the engine maintains.
    pub collection: String,
    pub consolidation: ConsolidationConfig,
    pub watchdog: WatchdogConfig,
    pub lifecycle: LifecycleConfig,
    pub classifier: ClassifierConfig,
}

impl Default for AtlasConfig {
    fn default() -> Self {
        Self {
            collection: "atlas_chunks".to_string(),
            consolidation: ConsolidationConfig::default(),
            watchdog: WatchdogConfig::default(),
            lifecycle: LifecycleConfig::default(),
            classifier: ClassifierConfig::default(),
        }
    }
}

impl AtlasConfig {
    /// Load config from a TOML string, falling back to defaults for missing fields.
    pub fn from_toml(toml_str: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(toml_str)
    }
}
