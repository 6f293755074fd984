//! Gated ingest writer: the producer side of the pause contract.

use std::sync::Arc;

use atlas_core::models::{ChunkId, ChunkPayload, PointRecord};
use atlas_core::traits::IVectorStore;
use atlas_core::AtlasResult;

use crate::pause::IngestPauseController;
use crate::watchdog::ConsolidationWatchdog;

/// Commits level-0 chunks while honoring the consolidator's pause:
/// new work blocks on `wait_for_resume` before its first mutation, and the
/// in-flight counter brackets the store write regardless of outcome.
pub struct GatedIngest {
    store: Arc<dyn IVectorStore>,
    pause: Arc<IngestPauseController>,
    watchdog: Option<Arc<ConsolidationWatchdog>>,
    collection: String,
}

impl GatedIngest {
    pub fn new(
        store: Arc<dyn IVectorStore>,
        pause: Arc<IngestPauseController>,
        collection: String,
    ) -> Self {
        Self {
            store,
            pause,
            watchdog: None,
            collection,
        }
    }

    /// Report committed chunks to the watchdog's ingestion counter.
    pub fn with_watchdog(mut self, watchdog: Arc<ConsolidationWatchdog>) -> Self {
        self.watchdog = Some(watchdog);
        self
    }

    /// Commit one chunk, returning its generated id.
    pub async fn commit_chunk(
        &self,
        payload: ChunkPayload,
        vector: Vec<f32>,
    ) -> AtlasResult<ChunkId> {
        self.pause.wait_for_resume().await;
        self.pause.register_in_flight();

        let id = uuid::Uuid::new_v4().to_string();
        let result = self
            .store
            .upsert(
                &self.collection,
                vec![PointRecord {
                    id: id.clone(),
                    vector: Some(vector),
                    payload,
                }],
            )
            .await;

        self.pause.complete_in_flight();
        result?;

        if let Some(watchdog) = &self.watchdog {
            watchdog.record_ingestion(1);
        }
        Ok(id)
    }
}
