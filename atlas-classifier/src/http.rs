//! HTTP classifier client with deterministic fallback.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::json;
use tracing::warn;

use atlas_core::config::ClassifierConfig;
use atlas_core::errors::ClassifierError;
use atlas_core::models::{Classification, ChunkPayload};
use atlas_core::traits::IChunkClassifier;

use crate::prompt::build_classification_prompt;

/// Client for a structured-JSON completion endpoint.
///
/// Never raises to callers: transport errors, non-2xx statuses, timeouts,
/// and malformed bodies all map to [`Classification::fallback`].
pub struct HttpClassifier {
    client: reqwest::Client,
    endpoint: String,
    timeout: Duration,
}

impl HttpClassifier {
    pub fn new(config: &ClassifierConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: config.endpoint.clone(),
            timeout: Duration::from_millis(config.timeout_ms),
        }
    }

    async fn request(&self, prompt: String) -> Result<Classification, ClassifierError> {
        let body = json!({
            "prompt": prompt,
            "response_format": "json",
        });
        let response = self
            .client
            .post(&self.endpoint)
            .json(&body)
            .send()
            .await
            .map_err(|e| ClassifierError::Request {
                message: e.to_string(),
            })?;
        let response = response
            .error_for_status()
            .map_err(|e| ClassifierError::Request {
                message: e.to_string(),
            })?;
        let text = response.text().await.map_err(|e| ClassifierError::Request {
            message: e.to_string(),
        })?;
        parse_classification(&text)
    }
}

/// Parse the four-field classifier response.
pub fn parse_classification(body: &str) -> Result<Classification, ClassifierError> {
    serde_json::from_str(body).map_err(|e| ClassifierError::MalformedResponse {
        message: e.to_string(),
    })
}

#[async_trait]
impl IChunkClassifier for HttpClassifier {
    async fn classify(&self, first: &ChunkPayload, second: &ChunkPayload) -> Classification {
        let prompt = build_classification_prompt(first, second);
        match tokio::time::timeout(self.timeout, self.request(prompt)).await {
            Ok(Ok(classification)) => classification,
            Ok(Err(error)) => {
                warn!(error = %error, "classifier call failed, using fallback");
                Classification::fallback()
            }
            Err(_) => {
                warn!(
                    timeout_ms = self.timeout.as_millis() as u64,
                    "classifier timed out, using fallback"
                );
                Classification::fallback()
            }
        }
    }
}
