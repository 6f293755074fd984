//! MemoryStore: a deterministic in-memory reference implementation of
//! `IVectorStore`.
//!
//! Points live in a `BTreeMap` per collection so scrolls page in id order
//! with an after-id cursor. Search ranks by cosine similarity with the
//! threshold and filter applied before ranking, matching the server-side
//! semantics the engine expects from a real vector store.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::ops::Bound;

use async_trait::async_trait;
use dashmap::DashMap;
use serde_json::Value;

use atlas_core::errors::StoreError;
use atlas_core::models::{
    ChunkId, ChunkPayload, CollectionInfo, PayloadPatch, PointRecord, ScoredPoint, ScrollPage,
    ScrollRequest, SearchRequest,
};
use atlas_core::traits::IVectorStore;
use atlas_core::AtlasResult;

use crate::filter;

#[derive(Debug)]
struct StoredPoint {
    vector: Option<Vec<f32>>,
    payload: Value,
}

#[derive(Debug)]
struct Collection {
    points: BTreeMap<ChunkId, StoredPoint>,
    hnsw_enabled: bool,
}

impl Default for Collection {
    fn default() -> Self {
        Self {
            points: BTreeMap::new(),
            hnsw_enabled: true,
        }
    }
}

/// In-memory vector store keyed by collection name.
#[derive(Debug, Default)]
pub struct MemoryStore {
    collections: DashMap<String, Collection>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store with one pre-created collection.
    pub fn with_collection(name: &str) -> Self {
        let store = Self::new();
        store.create_collection(name);
        store
    }

    pub fn create_collection(&self, name: &str) {
        self.collections.entry(name.to_string()).or_default();
    }

    /// Whether the approximate layer is currently enabled; observable for tests.
    pub fn hnsw_enabled(&self, collection: &str) -> bool {
        self.collections
            .get(collection)
            .map(|c| c.hnsw_enabled)
            .unwrap_or(true)
    }

    fn missing(name: &str) -> StoreError {
        StoreError::CollectionNotFound {
            name: name.to_string(),
        }
    }

    fn to_record(id: &ChunkId, point: &StoredPoint, with_vector: bool) -> AtlasResult<PointRecord> {
        let payload: ChunkPayload =
            serde_json::from_value(point.payload.clone()).map_err(|e| {
                StoreError::MalformedPayload {
                    id: id.clone(),
                    message: e.to_string(),
                }
            })?;
        Ok(PointRecord {
            id: id.clone(),
            vector: if with_vector { point.vector.clone() } else { None },
            payload,
        })
    }
}

fn cosine(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        return 0.0;
    }
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

#[async_trait]
impl IVectorStore for MemoryStore {
    async fn scroll(&self, collection: &str, request: ScrollRequest) -> AtlasResult<ScrollPage> {
        let col = self
            .collections
            .get(collection)
            .ok_or_else(|| Self::missing(collection))?;

        let range: (Bound<ChunkId>, Bound<ChunkId>) = match &request.offset {
            Some(after) => (Bound::Excluded(after.clone()), Bound::Unbounded),
            None => (Bound::Unbounded, Bound::Unbounded),
        };

        let mut points = Vec::new();
        for (id, point) in col.points.range(range) {
            let passes = request
                .filter
                .as_ref()
                .map_or(true, |f| filter::matches(f, id, &point.payload));
            if !passes {
                continue;
            }
            points.push(Self::to_record(id, point, request.with_vector)?);
            if points.len() == request.limit {
                break;
            }
        }

        let next_offset = if points.len() == request.limit {
            points.last().map(|p| p.id.clone())
        } else {
            None
        };
        Ok(ScrollPage {
            points,
            next_offset,
        })
    }

    async fn search(
        &self,
        collection: &str,
        request: SearchRequest,
    ) -> AtlasResult<Vec<ScoredPoint>> {
        let col = self
            .collections
            .get(collection)
            .ok_or_else(|| Self::missing(collection))?;

        let mut hits = Vec::new();
        for (id, point) in &col.points {
            let Some(vector) = &point.vector else {
                continue;
            };
            let passes = request
                .filter
                .as_ref()
                .map_or(true, |f| filter::matches(f, id, &point.payload));
            if !passes {
                continue;
            }
            let score = cosine(&request.vector, vector);
            if score < request.score_threshold {
                continue;
            }
            let record = Self::to_record(id, point, false)?;
            hits.push(ScoredPoint {
                id: id.clone(),
                score,
                payload: record.payload,
            });
        }

        hits.sort_by(|x, y| {
            y.score
                .partial_cmp(&x.score)
                .unwrap_or(Ordering::Equal)
                .then_with(|| x.id.cmp(&y.id))
        });
        hits.truncate(request.limit);
        Ok(hits)
    }

    async fn retrieve(&self, collection: &str, ids: &[ChunkId]) -> AtlasResult<Vec<PointRecord>> {
        let col = self
            .collections
            .get(collection)
            .ok_or_else(|| Self::missing(collection))?;

        let mut records = Vec::new();
        for id in ids {
            if let Some(point) = col.points.get(id) {
                records.push(Self::to_record(id, point, true)?);
            }
        }
        Ok(records)
    }

    async fn upsert(&self, collection: &str, points: Vec<PointRecord>) -> AtlasResult<()> {
        let mut col = self
            .collections
            .get_mut(collection)
            .ok_or_else(|| Self::missing(collection))?;

        for record in points {
            let payload = serde_json::to_value(&record.payload)
                .map_err(atlas_core::AtlasError::Serialization)?;
            col.points.insert(
                record.id,
                StoredPoint {
                    vector: record.vector,
                    payload,
                },
            );
        }
        Ok(())
    }

    async fn set_payload(
        &self,
        collection: &str,
        ids: &[ChunkId],
        patch: PayloadPatch,
    ) -> AtlasResult<()> {
        let mut col = self
            .collections
            .get_mut(collection)
            .ok_or_else(|| Self::missing(collection))?;

        for id in ids {
            let Some(point) = col.points.get_mut(id) else {
                tracing::debug!(id = %id, "set_payload on unknown point, skipping");
                continue;
            };
            match &mut point.payload {
                Value::Object(fields) => {
                    for (key, value) in patch.clone() {
                        fields.insert(key, value);
                    }
                }
                other => *other = Value::Object(patch.clone()),
            }
        }
        Ok(())
    }

    async fn delete(&self, collection: &str, ids: &[ChunkId]) -> AtlasResult<()> {
        let mut col = self
            .collections
            .get_mut(collection)
            .ok_or_else(|| Self::missing(collection))?;
        for id in ids {
            col.points.remove(id);
        }
        Ok(())
    }

    async fn collection_info(&self, collection: &str) -> AtlasResult<CollectionInfo> {
        let col = self
            .collections
            .get(collection)
            .ok_or_else(|| Self::missing(collection))?;
        Ok(CollectionInfo {
            points_count: col.points.len() as u64,
        })
    }

    async fn set_hnsw_enabled(&self, collection: &str, enabled: bool) -> AtlasResult<()> {
        let mut col = self
            .collections
            .get_mut(collection)
            .ok_or_else(|| Self::missing(collection))?;
        col.hnsw_enabled = enabled;
        Ok(())
    }
}
