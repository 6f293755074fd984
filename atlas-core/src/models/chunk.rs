//! Chunk payload and point records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::classification::{MergeDirection, RelationType};

/// Opaque chunk identifier; the total order used for pair canonicalization
/// is the lexicographic order of the string form.
pub type ChunkId = String;

/// Terminal consolidation level. Chunks at this level are never merged further.
pub const TERMINAL_LEVEL: u8 = 4;

/// Durable record for one chunk. The point id lives on [`PointRecord`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChunkPayload {
    pub original_text: String,
    /// Semantic tags; set semantics, kept sorted and deduplicated.
    #[serde(default)]
    pub qntm_keys: Vec<String>,
    #[serde(default)]
    pub file_path: String,
    #[serde(default)]
    pub chunk_index: u64,
    pub created_at: DateTime<Utc>,
    /// Absent means a single occurrence at `created_at`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub occurrences: Option<Vec<DateTime<Utc>>>,
    /// Ids of chunks absorbed into this one.
    #[serde(default)]
    pub parents: Vec<ChunkId>,
    /// 0..=4, monotonic non-decreasing while the chunk is live.
    #[serde(default)]
    pub consolidation_level: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub consolidation_type: Option<RelationType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub consolidation_direction: Option<MergeDirection>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub consolidation_reasoning: Option<String>,
    /// Set on the loser of a merge, points to the survivor.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub superseded_by: Option<ChunkId>,
    /// Soft-delete flag; a chunk is live iff this is false.
    #[serde(default)]
    pub deletion_eligible: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deletion_marked_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub access_count: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_accessed_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stability_score: Option<f64>,
}

impl ChunkPayload {
    /// Minimal live level-0 payload.
    pub fn new(original_text: impl Into<String>, created_at: DateTime<Utc>) -> Self {
        Self {
            original_text: original_text.into(),
            qntm_keys: Vec::new(),
            file_path: String::new(),
            chunk_index: 0,
            created_at,
            occurrences: None,
            parents: Vec::new(),
            consolidation_level: 0,
            consolidation_type: None,
            consolidation_direction: None,
            consolidation_reasoning: None,
            superseded_by: None,
            deletion_eligible: false,
            deletion_marked_at: None,
            access_count: 0,
            last_accessed_at: None,
            stability_score: None,
        }
    }

    /// A chunk is live iff it is not soft-deleted.
    pub fn is_live(&self) -> bool {
        !self.deletion_eligible
    }

    /// Occurrence timestamps, defaulting to `[created_at]` when absent.
    pub fn occurrences_or_default(&self) -> Vec<DateTime<Utc>> {
        self.occurrences
            .clone()
            .unwrap_or_else(|| vec![self.created_at])
    }
}

/// A stored point: id, optional vector, payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointRecord {
    pub id: ChunkId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vector: Option<Vec<f32>>,
    pub payload: ChunkPayload,
}

/// A ranked search hit.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredPoint {
    pub id: ChunkId,
    pub score: f32,
    pub payload: ChunkPayload,
}

/// Collection-level metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollectionInfo {
    pub points_count: u64,
}
