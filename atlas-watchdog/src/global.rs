//! Process-wide singletons for the watchdog and pause controller.
//!
//! Factories return the existing instance and ignore later configuration
//! arguments; `reset_globals` stops and clears both so tests can build
//! independent instances.

use std::sync::{Arc, Mutex};

use atlas_core::config::AtlasConfig;
use atlas_core::traits::{IChunkClassifier, IVectorStore};

use crate::pause::IngestPauseController;
use crate::watchdog::ConsolidationWatchdog;

static PAUSE: Mutex<Option<Arc<IngestPauseController>>> = Mutex::new(None);
static WATCHDOG: Mutex<Option<Arc<ConsolidationWatchdog>>> = Mutex::new(None);

/// The process-wide pause controller, created on first access.
pub fn global_pause_controller() -> Arc<IngestPauseController> {
    let mut slot = PAUSE.lock().unwrap_or_else(|e| e.into_inner());
    slot.get_or_insert_with(|| Arc::new(IngestPauseController::new()))
        .clone()
}

/// Create the process-wide watchdog, or return the existing one ignoring
/// the arguments.
pub fn init_global_watchdog(
    store: Arc<dyn IVectorStore>,
    classifier: Arc<dyn IChunkClassifier>,
    config: &AtlasConfig,
) -> Arc<ConsolidationWatchdog> {
    let mut slot = WATCHDOG.lock().unwrap_or_else(|e| e.into_inner());
    slot.get_or_insert_with(|| {
        Arc::new(ConsolidationWatchdog::new(
            store,
            classifier,
            global_pause_controller(),
            config,
        ))
    })
    .clone()
}

/// The process-wide watchdog, when initialized.
pub fn global_watchdog() -> Option<Arc<ConsolidationWatchdog>> {
    WATCHDOG.lock().unwrap_or_else(|e| e.into_inner()).clone()
}

/// Stop and clear both singletons.
pub fn reset_globals() {
    if let Some(watchdog) = WATCHDOG
        .lock()
        .unwrap_or_else(|e| e.into_inner())
        .take()
    {
        watchdog.stop();
    }
    PAUSE.lock().unwrap_or_else(|e| e.into_inner()).take();
}
