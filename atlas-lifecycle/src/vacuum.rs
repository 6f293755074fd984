//! Vacuum pass: hard-delete expired soft-deletes, refresh stability scores.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use serde_json::json;
use tracing::{debug, info};

use atlas_core::config::LifecycleConfig;
use atlas_core::models::{ChunkId, ChunkPayload, Filter, PayloadPatch, ScrollRequest};
use atlas_core::traits::IVectorStore;
use atlas_core::AtlasResult;

use crate::stability::stability_score;

/// Outcome of one vacuum pass.
#[derive(Debug, Clone, Copy, Default)]
pub struct VacuumReport {
    /// Chunks examined by the sweep.
    pub scanned: usize,
    /// Soft-deleted chunks past the grace period.
    pub eligible: usize,
    /// Chunks hard-deleted (0 in dry-run).
    pub deleted: usize,
    /// Stability scores persisted by the refresh.
    pub stability_updates: usize,
    pub dry_run: bool,
}

/// Sweeps soft-deleted chunks past the grace period and refreshes
/// stability scores on survivors.
pub struct LifecycleVacuum {
    store: Arc<dyn IVectorStore>,
    collection: String,
    config: LifecycleConfig,
}

impl LifecycleVacuum {
    pub fn new(store: Arc<dyn IVectorStore>, collection: String, config: LifecycleConfig) -> Self {
        Self {
            store,
            collection,
            config,
        }
    }

    /// Whether the chunk is soft-deleted and past the grace period.
    fn past_grace(&self, payload: &ChunkPayload, now: DateTime<Utc>) -> bool {
        payload.deletion_eligible
            && payload
                .deletion_marked_at
                .map(|marked| now - marked >= Duration::days(self.config.grace_period_days))
                .unwrap_or(false)
    }

    /// One bounded pass: sweep, hard-delete, then refresh stability.
    pub async fn vacuum(&self, dry_run: bool) -> AtlasResult<VacuumReport> {
        let now = Utc::now();
        let page = self
            .store
            .scroll(
                &self.collection,
                ScrollRequest {
                    limit: self.config.vacuum_scan_limit,
                    offset: None,
                    filter: None, // live and soft-deleted alike
                    with_vector: false,
                },
            )
            .await?;

        let mut report = VacuumReport {
            scanned: page.points.len(),
            dry_run,
            ..VacuumReport::default()
        };

        let expired: Vec<ChunkId> = page
            .points
            .iter()
            .filter(|p| self.past_grace(&p.payload, now))
            .map(|p| p.id.clone())
            .collect();
        report.eligible = expired.len();

        if !expired.is_empty() && !dry_run {
            self.store.delete(&self.collection, &expired).await?;
            report.deleted = expired.len();
            info!(deleted = report.deleted, "vacuumed expired soft-deleted chunks");
        }

        if self.config.stability_refresh_enabled {
            report.stability_updates = self.refresh_stability(now, dry_run).await?;
        }

        debug!(
            scanned = report.scanned,
            eligible = report.eligible,
            deleted = report.deleted,
            stability_updates = report.stability_updates,
            "vacuum pass complete"
        );
        Ok(report)
    }

    /// Recompute stability for live chunks, persisting only deltas at or
    /// above the configured epsilon.
    async fn refresh_stability(&self, now: DateTime<Utc>, dry_run: bool) -> AtlasResult<usize> {
        let page = self
            .store
            .scroll(
                &self.collection,
                ScrollRequest {
                    limit: self.config.stability_scan_limit,
                    offset: None,
                    filter: Some(Filter::live()),
                    with_vector: false,
                },
            )
            .await?;

        let mut updates = 0;
        for point in page.points {
            let fresh = stability_score(&point.payload, now);
            let current = point.payload.stability_score.unwrap_or(0.0);
            if (fresh - current).abs() < self.config.stability_update_epsilon {
                continue;
            }
            if !dry_run {
                let mut patch = PayloadPatch::new();
                patch.insert("stability_score".to_string(), json!(fresh));
                self.store
                    .set_payload(&self.collection, &[point.id], patch)
                    .await?;
            }
            updates += 1;
        }
        Ok(updates)
    }
}

/// Soft-delete a chunk, optionally recording its survivor. Never touches
/// `consolidation_level`.
pub async fn mark_for_deletion(
    store: &dyn IVectorStore,
    collection: &str,
    id: &ChunkId,
    superseded_by: Option<&ChunkId>,
) -> AtlasResult<()> {
    let mut patch = PayloadPatch::new();
    patch.insert("deletion_eligible".to_string(), json!(true));
    patch.insert(
        "deletion_marked_at".to_string(),
        serde_json::to_value(Utc::now())?,
    );
    if let Some(survivor) = superseded_by {
        patch.insert("superseded_by".to_string(), json!(survivor));
    }
    store.set_payload(collection, &[id.clone()], patch).await
}

/// Clear a chunk's soft-delete state. Never touches `consolidation_level`.
pub async fn unmark_for_deletion(
    store: &dyn IVectorStore,
    collection: &str,
    id: &ChunkId,
) -> AtlasResult<()> {
    let mut patch = PayloadPatch::new();
    patch.insert("deletion_eligible".to_string(), json!(false));
    patch.insert("deletion_marked_at".to_string(), json!(null));
    patch.insert("superseded_by".to_string(), json!(null));
    store.set_payload(collection, &[id.clone()], patch).await
}
