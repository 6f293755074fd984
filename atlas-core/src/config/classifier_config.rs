//! Classifier adapter configuration.

use serde::{Deserialize, Serialize};

/// Configuration for the external structured-JSON classifier.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Structured-JSON completion endpoint.
    pub endpoint: String,
    /// Conservative per-call timeout; timeouts map to the deterministic fallback.
    pub timeout_ms: u64,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://127.0.0.1:8089/v1/classify".to_string(),
            timeout_ms: 30_000,
        }
    }
}
