//! Best-effort event sinks.

use tracing::info;

use atlas_core::models::EngineEvent;
use atlas_core::traits::IEventSink;

/// Sink that forwards engine events to the `tracing` pipeline.
#[derive(Debug, Default)]
pub struct TracingEventSink;

impl IEventSink for TracingEventSink {
    fn emit(&self, event: &EngineEvent) {
        match event {
            EngineEvent::ConsolidateTriggered { collection, dry_run } => {
                info!(collection = %collection, dry_run, "consolidate.triggered");
            }
            EngineEvent::PairMerged {
                primary,
                secondary,
                relation,
            } => {
                info!(primary = %primary, secondary = %secondary, relation = ?relation, "consolidate.pair.merged");
            }
            EngineEvent::ConsolidateCompleted {
                candidates_found,
                consolidated,
                deleted,
                rounds,
            } => {
                info!(candidates_found, consolidated, deleted, rounds, "consolidate.completed");
            }
            EngineEvent::ConsolidateError { message } => {
                info!(message = %message, "consolidate.error");
            }
        }
    }
}
