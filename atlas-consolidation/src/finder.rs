//! Candidate finder: scrolls live chunks at one level and pairs each seed
//! with its near-neighbors above the similarity threshold.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::debug;

use atlas_core::config::ConsolidationConfig;
use atlas_core::models::{ChunkPair, Filter, ScrollRequest, SearchRequest};
use atlas_core::traits::IVectorStore;
use atlas_core::AtlasResult;

/// Finds deduplicated candidate pairs among live chunks at a single level.
///
/// Guarantees: each canonical pair key appears at most once; both members
/// of every pair are live and at the requested level. Pairs beyond a
/// seed's top-K fan-out can still surface when the other member seeds.
pub struct CandidateFinder {
    store: Arc<dyn IVectorStore>,
    collection: String,
    config: ConsolidationConfig,
}

impl CandidateFinder {
    pub fn new(store: Arc<dyn IVectorStore>, collection: String, config: ConsolidationConfig) -> Self {
        Self {
            store,
            collection,
            config,
        }
    }

    pub async fn find_candidates(&self, level: u8, threshold: f64) -> AtlasResult<Vec<ChunkPair>> {
        let mut seen = HashSet::new();
        let mut pairs = Vec::new();
        let mut offset = None;

        loop {
            let page = self
                .store
                .scroll(
                    &self.collection,
                    ScrollRequest {
                        limit: self.config.scroll_page_size,
                        offset: offset.clone(),
                        filter: Some(Filter::live_at_level(level)),
                        with_vector: true,
                    },
                )
                .await?;

            for seed in &page.points {
                // Vectorless points cannot seed a similarity query.
                let Some(vector) = seed.vector.clone() else {
                    continue;
                };
                let hits = self
                    .store
                    .search(
                        &self.collection,
                        SearchRequest {
                            vector,
                            limit: self.config.neighbors_per_seed,
                            score_threshold: threshold as f32,
                            filter: Some(
                                Filter::live_at_level(level).exclude_id(seed.id.clone()),
                            ),
                        },
                    )
                    .await?;

                for hit in hits {
                    // Providers that ignore id-exclusion can echo the seed.
                    if hit.id == seed.id {
                        continue;
                    }
                    let pair = ChunkPair::new(seed.id.clone(), hit.id);
                    if seen.insert(pair.key()) {
                        pairs.push(pair);
                    }
                }
            }

            if page.points.is_empty() {
                break;
            }
            match page.next_offset {
                Some(next) => offset = Some(next),
                None => break,
            }
        }

        debug!(level, pairs = pairs.len(), "candidate scan complete");
        Ok(pairs)
    }
}
