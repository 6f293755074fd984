//! Engine events, emitted best-effort by the driver.

use serde::Serialize;

use super::chunk::ChunkId;
use super::classification::RelationType;

/// Events observable by the embedding host. Emission never fails and
/// carries no ordering guarantee beyond cause completion order.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum EngineEvent {
    ConsolidateTriggered {
        collection: String,
        dry_run: bool,
    },
    PairMerged {
        primary: ChunkId,
        secondary: ChunkId,
        relation: RelationType,
    },
    ConsolidateCompleted {
        candidates_found: u64,
        consolidated: u64,
        deleted: u64,
        rounds: u64,
    },
    ConsolidateError {
        message: String,
    },
}
