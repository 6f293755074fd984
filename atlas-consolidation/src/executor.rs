//! Merge executor: classifies a pair, promotes the survivor, soft-deletes
//! the loser.

use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde_json::json;
use tracing::{error, warn};

use atlas_core::models::{
    Classification, ChunkId, ChunkPair, ChunkPayload, EngineEvent, KeepSide, MergeOutcome,
    PayloadPatch, PointRecord, TERMINAL_LEVEL,
};
use atlas_core::traits::{IChunkClassifier, IEventSink, IVectorStore};
use atlas_core::AtlasResult;

/// Executes a single pair merge.
///
/// Retrieve failures propagate as transient store errors; everything from
/// payload assembly onward is absorbed per pair so one bad write cannot
/// abort the pass.
pub struct MergeExecutor {
    store: Arc<dyn IVectorStore>,
    classifier: Arc<dyn IChunkClassifier>,
    collection: String,
    events: Option<Arc<dyn IEventSink>>,
}

impl MergeExecutor {
    pub fn new(
        store: Arc<dyn IVectorStore>,
        classifier: Arc<dyn IChunkClassifier>,
        collection: String,
    ) -> Self {
        Self {
            store,
            classifier,
            collection,
            events: None,
        }
    }

    pub fn with_events(mut self, sink: Arc<dyn IEventSink>) -> Self {
        self.events = Some(sink);
        self
    }

    /// Merge one candidate pair, promoting the survivor to `target_level`.
    pub async fn execute(&self, pair: &ChunkPair, target_level: u8) -> AtlasResult<MergeOutcome> {
        let mut points = self
            .store
            .retrieve(&self.collection, &[pair.a.clone(), pair.b.clone()])
            .await?;
        // A member soft-deleted since the scan counts as missing.
        points.retain(|p| p.payload.is_live());

        let first = points.iter().find(|p| p.id == pair.a);
        let second = points.iter().find(|p| p.id == pair.b);
        let (Some(first), Some(second)) = (first, second) else {
            warn!(pair = %pair, "pair member missing or soft-deleted at retrieve, skipping");
            return Ok(MergeOutcome::default());
        };

        let label = self.classifier.classify(&first.payload, &second.payload).await;
        let (primary, secondary) = match label.keep {
            KeepSide::First | KeepSide::Merge => (first, second),
            KeepSide::Second => (second, first),
        };

        match self.write_merge(primary, secondary, &label, target_level).await {
            Ok(()) => {
                self.emit(EngineEvent::PairMerged {
                    primary: primary.id.clone(),
                    secondary: secondary.id.clone(),
                    relation: label.relation,
                });
                Ok(MergeOutcome {
                    consolidated: 1,
                    deleted: 1,
                })
            }
            Err(e) => {
                error!(pair = %pair, error = %e, "merge write failed, pair skipped");
                Ok(MergeOutcome::default())
            }
        }
    }

    /// Write the promoted primary, then the soft-deleted secondary.
    ///
    /// The primary write is not rolled back when the secondary write fails:
    /// the secondary stays live and the pair is eligible to be revisited.
    async fn write_merge(
        &self,
        primary: &PointRecord,
        secondary: &PointRecord,
        label: &Classification,
        target_level: u8,
    ) -> AtlasResult<()> {
        let patch = merged_primary_patch(
            &primary.payload,
            &secondary.payload,
            &secondary.id,
            label,
            target_level,
        )?;
        self.store
            .set_payload(&self.collection, &[primary.id.clone()], patch)
            .await?;

        let patch = soft_delete_patch(&secondary.payload, &primary.id, Utc::now())?;
        self.store
            .set_payload(&self.collection, &[secondary.id.clone()], patch)
            .await?;
        Ok(())
    }

    fn emit(&self, event: EngineEvent) {
        if let Some(sink) = &self.events {
            sink.emit(&event);
        }
    }
}

/// Patch promoting the primary: merged keys/occurrences/parents, target
/// level, classification fields. Every other primary field is preserved.
fn merged_primary_patch(
    primary: &ChunkPayload,
    secondary: &ChunkPayload,
    secondary_id: &ChunkId,
    label: &Classification,
    target_level: u8,
) -> AtlasResult<PayloadPatch> {
    let keys: BTreeSet<&String> = primary.qntm_keys.iter().chain(&secondary.qntm_keys).collect();
    let keys: Vec<&String> = keys.into_iter().collect();

    let occurrences: BTreeSet<DateTime<Utc>> = primary
        .occurrences_or_default()
        .into_iter()
        .chain(secondary.occurrences_or_default())
        .collect();
    let occurrences: Vec<DateTime<Utc>> = occurrences.into_iter().collect();

    let mut parents = primary.parents.clone();
    if !parents.iter().any(|p| p == secondary_id) {
        parents.push(secondary_id.clone());
    }

    let mut patch = PayloadPatch::new();
    patch.insert("qntm_keys".to_string(), serde_json::to_value(&keys)?);
    patch.insert("occurrences".to_string(), serde_json::to_value(&occurrences)?);
    patch.insert("parents".to_string(), serde_json::to_value(&parents)?);
    patch.insert(
        "consolidation_level".to_string(),
        json!(target_level.min(TERMINAL_LEVEL)),
    );
    patch.insert(
        "consolidation_type".to_string(),
        serde_json::to_value(label.relation)?,
    );
    patch.insert(
        "consolidation_direction".to_string(),
        serde_json::to_value(label.direction)?,
    );
    patch.insert(
        "consolidation_reasoning".to_string(),
        json!(label.reasoning),
    );
    Ok(patch)
}

/// Patch soft-deleting the secondary under the survivor's id.
fn soft_delete_patch(
    secondary: &ChunkPayload,
    primary_id: &ChunkId,
    now: DateTime<Utc>,
) -> AtlasResult<PayloadPatch> {
    let mut patch = PayloadPatch::new();
    patch.insert(
        "consolidation_level".to_string(),
        json!(secondary.consolidation_level.max(1)),
    );
    patch.insert("superseded_by".to_string(), json!(primary_id));
    patch.insert("deletion_eligible".to_string(), json!(true));
    patch.insert("deletion_marked_at".to_string(), serde_json::to_value(now)?);
    Ok(patch)
}
