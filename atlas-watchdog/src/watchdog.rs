//! Consolidation watchdog: the policy loop deciding when a pass runs.

use std::sync::atomic::{AtomicBool, AtomicU32, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info, warn};

use atlas_consolidation::ConsolidationDriver;
use atlas_core::config::AtlasConfig;
use atlas_core::errors::ConsolidationError;
use atlas_core::models::{ConsolidateOptions, ConsolidateResult};
use atlas_core::traits::{IChunkClassifier, IEventSink, IVectorStore};
use atlas_core::AtlasResult;

use crate::pause::IngestPauseController;

/// Consecutive failed passes before the circuit breaker opens.
pub const MAX_CONSECUTIVE_FAILURES: u32 = 3;

/// Observable watchdog state.
#[derive(Debug, Clone, Copy)]
pub struct WatchdogState {
    pub consecutive_failures: u32,
    pub circuit_open: bool,
    pub last_consolidation_count: u64,
    pub is_consolidating: bool,
}

/// Policy loop that pauses ingestion, runs the driver when enough new
/// chunks accumulated, and guards against repeated failures.
pub struct ConsolidationWatchdog {
    driver: ConsolidationDriver,
    store: Arc<dyn IVectorStore>,
    pause: Arc<IngestPauseController>,
    collection: String,
    base_threshold: u64,
    scale_factor: f64,
    poll_interval: Duration,
    use_hnsw_toggle: bool,
    similarity_threshold: f64,
    ingested: AtomicU64,
    last_consolidation_count: AtomicU64,
    consecutive_failures: AtomicU32,
    is_consolidating: AtomicBool,
    poll_task: Mutex<Option<JoinHandle<()>>>,
}

impl ConsolidationWatchdog {
    pub fn new(
        store: Arc<dyn IVectorStore>,
        classifier: Arc<dyn IChunkClassifier>,
        pause: Arc<IngestPauseController>,
        config: &AtlasConfig,
    ) -> Self {
        let driver = ConsolidationDriver::new(
            store.clone(),
            classifier,
            config.collection.clone(),
            config.consolidation.clone(),
        );
        Self {
            driver,
            store,
            pause,
            collection: config.collection.clone(),
            base_threshold: config.watchdog.base_threshold,
            scale_factor: config.watchdog.scale_factor,
            poll_interval: Duration::from_millis(config.watchdog.poll_interval_ms),
            use_hnsw_toggle: config.watchdog.use_hnsw_toggle,
            similarity_threshold: config.consolidation.similarity_threshold,
            ingested: AtomicU64::new(0),
            last_consolidation_count: AtomicU64::new(0),
            consecutive_failures: AtomicU32::new(0),
            is_consolidating: AtomicBool::new(false),
            poll_task: Mutex::new(None),
        }
    }

    /// Forward engine events from driver passes to the given sink.
    pub fn with_events(mut self, sink: Arc<dyn IEventSink>) -> Self {
        self.driver.set_events(sink);
        self
    }

    /// Pause controller shared with the ingest path.
    pub fn pause_controller(&self) -> Arc<IngestPauseController> {
        self.pause.clone()
    }

    /// Called by the ingest path when a chunk is committed.
    pub fn record_ingestion(&self, n: u64) {
        self.ingested.fetch_add(n, Ordering::SeqCst);
    }

    pub fn state(&self) -> WatchdogState {
        let failures = self.consecutive_failures.load(Ordering::SeqCst);
        WatchdogState {
            consecutive_failures: failures,
            circuit_open: failures >= MAX_CONSECUTIVE_FAILURES,
            last_consolidation_count: self.last_consolidation_count.load(Ordering::SeqCst),
            is_consolidating: self.is_consolidating.load(Ordering::SeqCst),
        }
    }

    /// Clear the circuit breaker.
    pub fn reset_circuit_breaker(&self) {
        self.consecutive_failures.store(0, Ordering::SeqCst);
    }

    /// Trigger threshold for this tick: `floor(base + scale * point_count)`,
    /// falling back to base when the count query fails.
    async fn dynamic_threshold(&self) -> u64 {
        match self.store.collection_info(&self.collection).await {
            Ok(info) => {
                (self.base_threshold as f64 + self.scale_factor * info.points_count as f64).floor()
                    as u64
            }
            Err(error) => {
                debug!(error = %error, "collection count unavailable, using base threshold");
                self.base_threshold
            }
        }
    }

    /// One policy evaluation. Public so hosts and tests can drive the loop
    /// deterministically.
    pub async fn tick(&self) {
        if self.state().circuit_open {
            debug!("circuit breaker open, skipping tick");
            return;
        }
        let threshold = self.dynamic_threshold().await;
        let current = self.ingested.load(Ordering::SeqCst);
        let last = self.last_consolidation_count.load(Ordering::SeqCst);
        if current.saturating_sub(last) < threshold {
            return;
        }
        if self.is_consolidating.load(Ordering::SeqCst) {
            return;
        }
        match self.run_consolidation().await {
            Ok(result) => {
                info!(
                    consolidated = result.consolidated,
                    deleted = result.deleted,
                    "watchdog consolidation pass finished"
                );
            }
            Err(error) => {
                error!(error = %error, "watchdog consolidation pass failed");
            }
        }
    }

    /// Run a pass now, regardless of thresholds. Short-circuits when a pass
    /// is already running.
    pub async fn force_consolidation(&self) -> AtlasResult<ConsolidateResult> {
        self.run_consolidation().await
    }

    async fn run_consolidation(&self) -> AtlasResult<ConsolidateResult> {
        if self
            .is_consolidating
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Err(ConsolidationError::AlreadyRunning.into());
        }

        self.pause.pause();
        self.pause.wait_for_in_flight().await;
        // Resume + guard release happen on every exit path below.
        let guard = PassGuard { watchdog: self };

        if self.use_hnsw_toggle {
            if let Err(error) = self.store.set_hnsw_enabled(&self.collection, false).await {
                warn!(error = %error, "failed to disable hnsw layer, continuing");
            }
        }

        let outcome = self
            .driver
            .consolidate(ConsolidateOptions::run(self.similarity_threshold))
            .await;

        if self.use_hnsw_toggle {
            if let Err(error) = self.store.set_hnsw_enabled(&self.collection, true).await {
                warn!(error = %error, "failed to re-enable hnsw layer");
            }
        }

        match &outcome {
            Ok(_) => {
                self.last_consolidation_count
                    .store(self.ingested.load(Ordering::SeqCst), Ordering::SeqCst);
                self.consecutive_failures.store(0, Ordering::SeqCst);
            }
            Err(_) => {
                let failures = self.consecutive_failures.fetch_add(1, Ordering::SeqCst) + 1;
                if failures >= MAX_CONSECUTIVE_FAILURES {
                    warn!(failures, "circuit breaker open, no further passes until reset");
                }
            }
        }

        drop(guard);
        outcome
    }

    /// Spawn the poll loop. The first evaluation happens one interval after
    /// start; a tick that lands while a pass is still running is dropped,
    /// not queued.
    pub fn start(self: Arc<Self>) {
        let mut slot = self.poll_task.lock().unwrap_or_else(|e| e.into_inner());
        if slot.is_some() {
            return;
        }
        let watchdog = Arc::clone(&self);
        *slot = Some(tokio::spawn(async move {
            let mut ticker = tokio::time::interval(watchdog.poll_interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            ticker.tick().await; // immediate first tick consumed
            loop {
                ticker.tick().await;
                watchdog.tick().await;
            }
        }));
    }

    /// Stop the poll loop. A pass already past its pause point is not
    /// interrupted mid-pair by this alone; callers stop between passes.
    pub fn stop(&self) {
        let mut slot = self.poll_task.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(handle) = slot.take() {
            handle.abort();
        }
    }
}

impl Drop for ConsolidationWatchdog {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Releases the pause and the single-run flag on every exit path.
struct PassGuard<'a> {
    watchdog: &'a ConsolidationWatchdog,
}

impl Drop for PassGuard<'_> {
    fn drop(&mut self) {
        self.watchdog.pause.resume();
        self.watchdog
            .is_consolidating
            .store(false, Ordering::SeqCst);
    }
}
