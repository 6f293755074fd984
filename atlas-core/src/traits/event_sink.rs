//! IEventSink: best-effort event delivery to the embedding host.

use crate::models::EngineEvent;

/// Receives engine events. Implementations must not panic; emission is
/// fire-and-forget.
pub trait IEventSink: Send + Sync {
    fn emit(&self, event: &EngineEvent);
}
