//! IChunkClassifier: external relationship classifier.

use async_trait::async_trait;

use crate::models::{Classification, ChunkPayload};

/// Classifies the relationship between two chunks and picks a survivor.
///
/// Implementations must be total: any transport, timeout, or parse failure
/// maps to [`Classification::fallback`] instead of an error, so a
/// maintenance pass can always make progress.
#[async_trait]
pub trait IChunkClassifier: Send + Sync {
    async fn classify(&self, first: &ChunkPayload, second: &ChunkPayload) -> Classification;
}
