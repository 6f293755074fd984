//! Consolidation driver and candidate finder configuration.

use serde::{Deserialize, Serialize};

/// Configuration for candidate finding and the per-level merge loop.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsolidationConfig {
    /// Minimum pair similarity accepted by the finder.
    pub similarity_threshold: f64,
    /// Terminal consolidation level; chunks at this level are never scanned.
    pub max_level: u8,
    /// Finder scroll batch size.
    pub scroll_page_size: usize,
    /// Finder per-seed neighbor cap.
    pub neighbors_per_seed: usize,
}

impl Default for ConsolidationConfig {
    fn default() -> Self {
        Self {
            similarity_threshold: 0.9, // domain configs range 0.8-0.92
            max_level: 4,
            scroll_page_size: 100,
            neighbors_per_seed: 10,
        }
    }
}
