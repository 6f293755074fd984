//! Consolidation driver: per-level fixed-point rounds over the finder and
//! executor.

use std::sync::Arc;

use tracing::info;

use atlas_core::config::ConsolidationConfig;
use atlas_core::errors::{ConsolidationError, StoreError};
use atlas_core::models::{ConsolidateOptions, ConsolidateResult, EngineEvent, TERMINAL_LEVEL};
use atlas_core::traits::{IChunkClassifier, IEventSink, IVectorStore};
use atlas_core::{AtlasError, AtlasResult};

use crate::executor::MergeExecutor;
use crate::finder::CandidateFinder;

/// Orchestrates one consolidation pass across levels `0..max_level`.
///
/// A level is stable once a scan finds no candidates or a round merges
/// nothing. Each merging round strictly reduces the live population at the
/// level, so the fixed point is reached without an a-priori round bound.
pub struct ConsolidationDriver {
    store: Arc<dyn IVectorStore>,
    classifier: Arc<dyn IChunkClassifier>,
    collection: String,
    config: ConsolidationConfig,
    events: Option<Arc<dyn IEventSink>>,
}

impl ConsolidationDriver {
    pub fn new(
        store: Arc<dyn IVectorStore>,
        classifier: Arc<dyn IChunkClassifier>,
        collection: String,
        config: ConsolidationConfig,
    ) -> Self {
        Self {
            store,
            classifier,
            collection,
            config,
            events: None,
        }
    }

    pub fn with_events(mut self, sink: Arc<dyn IEventSink>) -> Self {
        self.events = Some(sink);
        self
    }

    pub fn set_events(&mut self, sink: Arc<dyn IEventSink>) {
        self.events = Some(sink);
    }

    /// Run a full pass. Missing collection is fatal before any write;
    /// everything that only degrades individual pairs is absorbed inside.
    pub async fn consolidate(&self, options: ConsolidateOptions) -> AtlasResult<ConsolidateResult> {
        let outcome = self.run(options).await;
        match &outcome {
            Ok(result) => self.emit(EngineEvent::ConsolidateCompleted {
                candidates_found: result.candidates_found,
                consolidated: result.consolidated,
                deleted: result.deleted,
                rounds: result.rounds,
            }),
            Err(error) => self.emit(EngineEvent::ConsolidateError {
                message: error.to_string(),
            }),
        }
        outcome
    }

    async fn run(&self, options: ConsolidateOptions) -> AtlasResult<ConsolidateResult> {
        // Fatal precondition: the collection must exist before any write.
        self.store
            .collection_info(&self.collection)
            .await
            .map_err(|e| match e {
                AtlasError::Store(StoreError::CollectionNotFound { name }) => {
                    ConsolidationError::CollectionMissing { name }.into()
                }
                other => other,
            })?;

        self.emit(EngineEvent::ConsolidateTriggered {
            collection: self.collection.clone(),
            dry_run: options.dry_run,
        });

        let finder = CandidateFinder::new(
            self.store.clone(),
            self.collection.clone(),
            self.config.clone(),
        );
        let mut executor = MergeExecutor::new(
            self.store.clone(),
            self.classifier.clone(),
            self.collection.clone(),
        );
        if let Some(sink) = &self.events {
            executor = executor.with_events(sink.clone());
        }

        let mut result = ConsolidateResult::default();
        if options.dry_run {
            result.candidates = Some(Vec::new());
        }

        for level in 0..self.config.max_level {
            let target = (level + 1).min(TERMINAL_LEVEL);
            loop {
                let candidates = finder.find_candidates(level, options.threshold).await?;
                if candidates.is_empty() {
                    break; // level stable
                }
                result.rounds += 1;
                result.candidates_found += candidates.len() as u64;

                if options.dry_run {
                    if let Some(collected) = result.candidates.as_mut() {
                        collected.extend(candidates);
                    }
                    break; // single scan per level in dry-run
                }

                let mut merged_this_round = 0u64;
                for pair in &candidates {
                    let outcome = executor.execute(pair, target).await?;
                    merged_this_round += outcome.consolidated;
                    result.consolidated += outcome.consolidated;
                    result.deleted += outcome.deleted;
                }

                if merged_this_round == 0 {
                    break; // no progress this round, stop retrying the level
                }
                *result.level_stats.entry(level).or_insert(0) += merged_this_round;
                result.max_level = result.max_level.max(target);
                // loop back: survivors were promoted out, rescan the level
            }
        }

        info!(
            collection = %self.collection,
            dry_run = options.dry_run,
            candidates = result.candidates_found,
            consolidated = result.consolidated,
            rounds = result.rounds,
            "consolidation pass complete"
        );
        Ok(result)
    }

    fn emit(&self, event: EngineEvent) {
        if let Some(sink) = &self.events {
            sink.emit(&event);
        }
    }
}
