//! Shared builders and test doubles for Atlas integration tests.
//!
//! All fixtures are deterministic: a fixed base timestamp, caller-chosen
//! vectors, and a scripted classifier whose empty state behaves exactly
//! like the adapter's deterministic fallback.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};

use atlas_core::models::{
    Classification, ChunkId, ChunkPayload, EngineEvent, KeepSide, MergeDirection, PointRecord,
    RelationType,
};
use atlas_core::traits::{IChunkClassifier, IEventSink};

/// Fixed base timestamp for deterministic fixtures.
pub fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap()
}

/// A 2-d vector; enough to dial in exact cosine similarities.
pub fn vec2(x: f32, y: f32) -> Vec<f32> {
    vec![x, y]
}

/// Builder for a stored chunk point.
#[derive(Debug, Clone)]
pub struct ChunkBuilder {
    id: ChunkId,
    payload: ChunkPayload,
    vector: Option<Vec<f32>>,
}

/// Start building a chunk with the given id and text, live at level 0.
pub fn chunk(id: &str, text: &str) -> ChunkBuilder {
    ChunkBuilder {
        id: id.to_string(),
        payload: ChunkPayload::new(text, base_time()),
        vector: None,
    }
}

/// Chunk with a random id.
pub fn chunk_with_random_id(text: &str) -> ChunkBuilder {
    chunk(&uuid::Uuid::new_v4().to_string(), text)
}

impl ChunkBuilder {
    pub fn keys(mut self, keys: &[&str]) -> Self {
        self.payload.qntm_keys = keys.iter().map(|k| k.to_string()).collect();
        self
    }

    pub fn vector(mut self, vector: Vec<f32>) -> Self {
        self.vector = Some(vector);
        self
    }

    pub fn level(mut self, level: u8) -> Self {
        self.payload.consolidation_level = level;
        self
    }

    pub fn created_at(mut self, at: DateTime<Utc>) -> Self {
        self.payload.created_at = at;
        self
    }

    pub fn created_days_ago(mut self, days: i64) -> Self {
        self.payload.created_at = base_time() - Duration::days(days);
        self
    }

    pub fn access_count(mut self, count: u64) -> Self {
        self.payload.access_count = count;
        self
    }

    pub fn stability(mut self, score: f64) -> Self {
        self.payload.stability_score = Some(score);
        self
    }

    pub fn occurrences(mut self, at: &[DateTime<Utc>]) -> Self {
        self.payload.occurrences = Some(at.to_vec());
        self
    }

    pub fn soft_deleted(mut self, marked_at: DateTime<Utc>, superseded_by: Option<&str>) -> Self {
        self.payload.deletion_eligible = true;
        self.payload.deletion_marked_at = Some(marked_at);
        self.payload.superseded_by = superseded_by.map(|s| s.to_string());
        self
    }

    pub fn build(self) -> PointRecord {
        PointRecord {
            id: self.id,
            vector: self.vector,
            payload: self.payload,
        }
    }
}

/// Shorthand for a classification verdict.
pub fn classification(relation: RelationType, direction: MergeDirection, keep: KeepSide) -> Classification {
    Classification {
        relation,
        direction,
        reasoning: "scripted".to_string(),
        keep,
    }
}

/// Classifier that pops pre-programmed verdicts; an exhausted script
/// behaves like the adapter's deterministic fallback.
#[derive(Debug, Default)]
pub struct ScriptedClassifier {
    script: Mutex<VecDeque<Classification>>,
    calls: Mutex<u64>,
}

impl ScriptedClassifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, verdict: Classification) {
        self.script
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push_back(verdict);
    }

    pub fn calls(&self) -> u64 {
        *self.calls.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl IChunkClassifier for ScriptedClassifier {
    async fn classify(&self, _first: &ChunkPayload, _second: &ChunkPayload) -> Classification {
        *self.calls.lock().unwrap_or_else(|e| e.into_inner()) += 1;
        self.script
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .pop_front()
            .unwrap_or_else(Classification::fallback)
    }
}

/// Event sink that records everything it sees.
#[derive(Debug, Default)]
pub struct VecEventSink {
    events: Mutex<Vec<EngineEvent>>,
}

impl VecEventSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> Vec<EngineEvent> {
        self.events
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

impl IEventSink for VecEventSink {
    fn emit(&self, event: &EngineEvent) {
        self.events
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(event.clone());
    }
}
