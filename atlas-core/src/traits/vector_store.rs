//! IVectorStore: the store capability set the engine is written against.

use async_trait::async_trait;

use crate::errors::AtlasResult;
use crate::models::{
    ChunkId, CollectionInfo, PayloadPatch, PointRecord, ScoredPoint, ScrollPage, ScrollRequest,
    SearchRequest,
};

/// Vector store capability set required by the consolidation engine.
///
/// Implementations apply filters server-side, page deterministically in id
/// order, and treat `set_payload` as a shallow merge into the stored
/// payload. `retrieve` may return fewer points than requested, in any order.
#[async_trait]
pub trait IVectorStore: Send + Sync {
    async fn scroll(&self, collection: &str, request: ScrollRequest) -> AtlasResult<ScrollPage>;

    async fn search(
        &self,
        collection: &str,
        request: SearchRequest,
    ) -> AtlasResult<Vec<ScoredPoint>>;

    async fn retrieve(&self, collection: &str, ids: &[ChunkId]) -> AtlasResult<Vec<PointRecord>>;

    async fn upsert(&self, collection: &str, points: Vec<PointRecord>) -> AtlasResult<()>;

    async fn set_payload(
        &self,
        collection: &str,
        ids: &[ChunkId],
        patch: PayloadPatch,
    ) -> AtlasResult<()>;

    async fn delete(&self, collection: &str, ids: &[ChunkId]) -> AtlasResult<()>;

    async fn collection_info(&self, collection: &str) -> AtlasResult<CollectionInfo>;

    /// Toggle the index's approximate (HNSW) layer. Default is a no-op for
    /// stores without the capability.
    async fn set_hnsw_enabled(&self, _collection: &str, _enabled: bool) -> AtlasResult<()> {
        Ok(())
    }
}
