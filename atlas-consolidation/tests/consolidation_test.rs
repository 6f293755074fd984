//! End-to-end consolidation scenarios over the in-memory reference store:
//! pair finding, survivor promotion, soft-delete of the loser, fixed-point
//! convergence, dry-run behavior, and boundary cases.

use std::sync::Arc;

use async_trait::async_trait;
use atlas_consolidation::{CandidateFinder, ConsolidationDriver, TracingEventSink};
use atlas_core::config::ConsolidationConfig;
use atlas_core::models::{
    ChunkId, CollectionInfo, ConsolidateOptions, EngineEvent, KeepSide, MergeDirection,
    PayloadPatch, PointRecord, RelationType, ScoredPoint, ScrollPage, ScrollRequest,
    SearchRequest,
};
use atlas_core::traits::IVectorStore;
use atlas_core::{AtlasError, AtlasResult};
use atlas_store::MemoryStore;
use test_fixtures::{base_time, chunk, classification, vec2, ScriptedClassifier, VecEventSink};

const COLLECTION: &str = "chunks";
const THRESHOLD: f64 = 0.92;

// cosine(SEED, NEAR) = 0.95, cosine(SEED, THIRD) = 0.98
fn seed_vec() -> Vec<f32> {
    vec2(1.0, 0.0)
}
fn near_vec() -> Vec<f32> {
    vec2(0.95, 0.312_25)
}
fn third_vec() -> Vec<f32> {
    vec2(0.98, 0.198_99)
}

async fn two_chunk_store() -> Arc<MemoryStore> {
    let store = Arc::new(MemoryStore::with_collection(COLLECTION));
    store
        .upsert(
            COLLECTION,
            vec![
                chunk("c1", "A").keys(&["@t ~ a"]).vector(seed_vec()).build(),
                chunk("c2", "B").keys(&["@t ~ b"]).vector(near_vec()).build(),
            ],
        )
        .await
        .unwrap();
    store
}

fn driver(store: Arc<MemoryStore>, classifier: Arc<ScriptedClassifier>) -> ConsolidationDriver {
    ConsolidationDriver::new(
        store,
        classifier,
        COLLECTION.to_string(),
        ConsolidationConfig::default(),
    )
}

async fn get(store: &MemoryStore, id: &str) -> PointRecord {
    store
        .retrieve(COLLECTION, &[id.to_string()])
        .await
        .unwrap()
        .remove(0)
}

#[tokio::test]
async fn duplicate_pair_merges_into_first_chunk() {
    // the fallback verdict keeps the first chunk by id order
    let store = two_chunk_store().await;
    let driver = driver(store.clone(), Arc::new(ScriptedClassifier::new()));

    let result = driver
        .consolidate(ConsolidateOptions::run(THRESHOLD))
        .await
        .unwrap();
    assert_eq!(result.candidates_found, 1);
    assert_eq!(result.consolidated, 1);
    assert_eq!(result.deleted, 1);
    assert_eq!(result.max_level, 1);
    assert_eq!(result.level_stats.get(&0), Some(&1));

    let c1 = get(&store, "c1").await;
    assert_eq!(c1.payload.consolidation_level, 1);
    assert_eq!(c1.payload.qntm_keys, vec!["@t ~ a", "@t ~ b"]);
    assert!(c1.payload.parents.contains(&"c2".to_string()));
    assert_eq!(c1.payload.consolidation_type, Some(RelationType::DuplicateWork));
    assert!(c1.payload.is_live());

    let c2 = get(&store, "c2").await;
    assert!(c2.payload.deletion_eligible);
    assert_eq!(c2.payload.superseded_by.as_deref(), Some("c1"));
    assert_eq!(c2.payload.consolidation_level, 1);
    assert!(c2.payload.deletion_marked_at.is_some());
}

#[tokio::test]
async fn dry_run_collects_candidates_without_writing() {
    let store = two_chunk_store().await;
    let driver = driver(store.clone(), Arc::new(ScriptedClassifier::new()));

    let result = driver
        .consolidate(ConsolidateOptions::dry_run(THRESHOLD))
        .await
        .unwrap();
    assert_eq!(result.candidates_found, 1);
    assert_eq!(result.consolidated, 0);
    assert_eq!(result.deleted, 0);
    assert_eq!(result.max_level, 0);
    assert_eq!(result.candidates.as_ref().map(Vec::len), Some(1));

    // no writes observed
    let c1 = get(&store, "c1").await;
    let c2 = get(&store, "c2").await;
    assert_eq!(c1.payload.consolidation_level, 0);
    assert!(c2.payload.is_live());
}

#[tokio::test]
async fn keep_second_promotes_the_other_side() {
    let store = two_chunk_store().await;
    let classifier = Arc::new(ScriptedClassifier::new());
    classifier.push(classification(
        RelationType::SequentialIteration,
        MergeDirection::Forward,
        KeepSide::Second,
    ));
    let driver = driver(store.clone(), classifier);

    driver
        .consolidate(ConsolidateOptions::run(THRESHOLD))
        .await
        .unwrap();

    let c2 = get(&store, "c2").await;
    assert_eq!(c2.payload.consolidation_level, 1);
    assert!(c2.payload.parents.contains(&"c1".to_string()));
    assert_eq!(
        c2.payload.consolidation_type,
        Some(RelationType::SequentialIteration)
    );
    assert_eq!(
        c2.payload.consolidation_direction,
        Some(MergeDirection::Forward)
    );

    let c1 = get(&store, "c1").await;
    assert!(c1.payload.deletion_eligible);
    assert_eq!(c1.payload.superseded_by.as_deref(), Some("c2"));
}

#[tokio::test]
async fn mutual_top_hits_emit_exactly_one_pair() {
    // each chunk returns the other as top-1; the canonical key dedupes
    let store = two_chunk_store().await;
    let finder = CandidateFinder::new(
        store.clone(),
        COLLECTION.to_string(),
        ConsolidationConfig::default(),
    );
    let pairs = finder.find_candidates(0, THRESHOLD).await.unwrap();
    assert_eq!(pairs.len(), 1);
    assert_eq!(pairs[0].key(), "c1~c2");
}

#[tokio::test]
async fn finder_confines_to_level_and_excludes_soft_deleted() {
    let store = Arc::new(MemoryStore::with_collection(COLLECTION));
    store
        .upsert(
            COLLECTION,
            vec![
                chunk("c1", "A").vector(seed_vec()).build(),
                chunk("c2", "B").vector(near_vec()).build(),
                chunk("c3", "C").vector(third_vec()).level(1).build(),
                chunk("c4", "D")
                    .vector(seed_vec())
                    .soft_deleted(base_time(), Some("c1"))
                    .build(),
            ],
        )
        .await
        .unwrap();

    let finder = CandidateFinder::new(
        store.clone(),
        COLLECTION.to_string(),
        ConsolidationConfig::default(),
    );
    let pairs = finder.find_candidates(0, THRESHOLD).await.unwrap();

    // unique canonical keys, level-0 live members only
    let keys: Vec<String> = pairs.iter().map(|p| p.key()).collect();
    let mut deduped = keys.clone();
    deduped.dedup();
    assert_eq!(keys, deduped);
    assert_eq!(keys, vec!["c1~c2"]);
}

#[tokio::test]
async fn three_way_cluster_converges_to_one_survivor() {
    let store = Arc::new(MemoryStore::with_collection(COLLECTION));
    store
        .upsert(
            COLLECTION,
            vec![
                chunk("c1", "A").keys(&["@t ~ a"]).vector(seed_vec()).build(),
                chunk("c2", "B").keys(&["@t ~ b"]).vector(near_vec()).build(),
                chunk("c3", "C").keys(&["@t ~ c"]).vector(third_vec()).build(),
            ],
        )
        .await
        .unwrap();
    let driver = driver(store.clone(), Arc::new(ScriptedClassifier::new()));

    let result = driver
        .consolidate(ConsolidateOptions::run(THRESHOLD))
        .await
        .unwrap();

    // three candidate pairs; the pair of two soft-deleted losers is skipped
    assert_eq!(result.candidates_found, 3);
    assert_eq!(result.consolidated, 2);
    assert_eq!(result.deleted, 2);

    let c1 = get(&store, "c1").await;
    assert!(c1.payload.is_live());
    assert_eq!(c1.payload.consolidation_level, 1);
    assert!(c1.payload.parents.contains(&"c2".to_string()));
    assert!(c1.payload.parents.contains(&"c3".to_string()));
    let keys = c1.payload.qntm_keys;
    assert_eq!(keys, vec!["@t ~ a", "@t ~ b", "@t ~ c"]);

    for loser in ["c2", "c3"] {
        let point = get(&store, loser).await;
        assert!(point.payload.deletion_eligible);
        assert_eq!(point.payload.superseded_by.as_deref(), Some("c1"));
    }
}

#[tokio::test]
async fn completed_pass_is_a_fixed_point() {
    let store = two_chunk_store().await;
    let driver = driver(store.clone(), Arc::new(ScriptedClassifier::new()))
        .with_events(Arc::new(TracingEventSink));

    driver
        .consolidate(ConsolidateOptions::run(THRESHOLD))
        .await
        .unwrap();
    let again = driver
        .consolidate(ConsolidateOptions::run(THRESHOLD))
        .await
        .unwrap();
    assert_eq!(again.candidates_found, 0);
    assert_eq!(again.consolidated, 0);
    assert_eq!(again.rounds, 0);
}

#[tokio::test]
async fn successive_dry_runs_are_invariant() {
    let store = two_chunk_store().await;
    let driver = driver(store.clone(), Arc::new(ScriptedClassifier::new()));

    let first = driver
        .consolidate(ConsolidateOptions::dry_run(THRESHOLD))
        .await
        .unwrap();
    let second = driver
        .consolidate(ConsolidateOptions::dry_run(THRESHOLD))
        .await
        .unwrap();
    assert_eq!(first.candidates_found, second.candidates_found);
}

#[tokio::test]
async fn empty_collection_yields_zero_work() {
    let store = Arc::new(MemoryStore::with_collection(COLLECTION));
    let driver = driver(store, Arc::new(ScriptedClassifier::new()));
    let result = driver
        .consolidate(ConsolidateOptions::run(THRESHOLD))
        .await
        .unwrap();
    assert_eq!(result.candidates_found, 0);
    assert_eq!(result.rounds, 0);
    assert_eq!(result.max_level, 0);
}

#[tokio::test]
async fn missing_collection_fails_before_any_write() {
    let store = Arc::new(MemoryStore::new());
    let driver = driver(store, Arc::new(ScriptedClassifier::new()));
    let err = driver
        .consolidate(ConsolidateOptions::run(THRESHOLD))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        AtlasError::Consolidation(
            atlas_core::errors::ConsolidationError::CollectionMissing { .. }
        )
    ));
}

#[tokio::test]
async fn terminal_level_chunks_are_never_scanned() {
    let store = Arc::new(MemoryStore::with_collection(COLLECTION));
    store
        .upsert(
            COLLECTION,
            vec![
                chunk("c1", "A").vector(seed_vec()).level(4).build(),
                chunk("c2", "B").vector(near_vec()).level(4).build(),
            ],
        )
        .await
        .unwrap();
    let driver = driver(store, Arc::new(ScriptedClassifier::new()));
    let result = driver
        .consolidate(ConsolidateOptions::run(THRESHOLD))
        .await
        .unwrap();
    assert_eq!(result.candidates_found, 0);
}

#[tokio::test]
async fn events_follow_cause_order() {
    let store = two_chunk_store().await;
    let sink = Arc::new(VecEventSink::new());
    let driver =
        driver(store, Arc::new(ScriptedClassifier::new())).with_events(sink.clone());

    driver
        .consolidate(ConsolidateOptions::run(THRESHOLD))
        .await
        .unwrap();

    let events = sink.snapshot();
    assert!(matches!(events[0], EngineEvent::ConsolidateTriggered { .. }));
    assert!(matches!(events[1], EngineEvent::PairMerged { .. }));
    assert!(matches!(
        events.last(),
        Some(EngineEvent::ConsolidateCompleted { .. })
    ));
}

// ---------------------------------------------------------------------------
// A pair member that disappears between the scan and the retrieve
// ---------------------------------------------------------------------------

/// Store wrapper that hides one id from `retrieve` only.
struct VanishingRetrieve {
    inner: Arc<MemoryStore>,
    hidden: ChunkId,
}

#[async_trait]
impl IVectorStore for VanishingRetrieve {
    async fn scroll(&self, collection: &str, request: ScrollRequest) -> AtlasResult<ScrollPage> {
        self.inner.scroll(collection, request).await
    }

    async fn search(
        &self,
        collection: &str,
        request: SearchRequest,
    ) -> AtlasResult<Vec<ScoredPoint>> {
        self.inner.search(collection, request).await
    }

    async fn retrieve(&self, collection: &str, ids: &[ChunkId]) -> AtlasResult<Vec<PointRecord>> {
        let mut points = self.inner.retrieve(collection, ids).await?;
        points.retain(|p| p.id != self.hidden);
        Ok(points)
    }

    async fn upsert(&self, collection: &str, points: Vec<PointRecord>) -> AtlasResult<()> {
        self.inner.upsert(collection, points).await
    }

    async fn set_payload(
        &self,
        collection: &str,
        ids: &[ChunkId],
        patch: PayloadPatch,
    ) -> AtlasResult<()> {
        self.inner.set_payload(collection, ids, patch).await
    }

    async fn delete(&self, collection: &str, ids: &[ChunkId]) -> AtlasResult<()> {
        self.inner.delete(collection, ids).await
    }

    async fn collection_info(&self, collection: &str) -> AtlasResult<CollectionInfo> {
        self.inner.collection_info(collection).await
    }
}

#[tokio::test]
async fn missing_retrieve_member_skips_the_pair_without_writes() {
    let inner = two_chunk_store().await;
    let store = Arc::new(VanishingRetrieve {
        inner: inner.clone(),
        hidden: "c2".to_string(),
    });
    let driver = ConsolidationDriver::new(
        store,
        Arc::new(ScriptedClassifier::new()),
        COLLECTION.to_string(),
        ConsolidationConfig::default(),
    );

    let result = driver
        .consolidate(ConsolidateOptions::run(THRESHOLD))
        .await
        .unwrap();
    assert_eq!(result.candidates_found, 1);
    assert_eq!(result.consolidated, 0);
    assert_eq!(result.deleted, 0);

    let c1 = get(&inner, "c1").await;
    assert_eq!(c1.payload.consolidation_level, 0);
    assert!(c1.payload.parents.is_empty());
}
