//! Driver invocation options and results.

use std::collections::BTreeMap;

use serde::Serialize;

use super::pair::ChunkPair;

/// Options for a single driver invocation.
#[derive(Debug, Clone, Copy)]
pub struct ConsolidateOptions {
    /// Collect candidates without writing.
    pub dry_run: bool,
    /// Minimum pair similarity accepted by the finder.
    pub threshold: f64,
}

impl ConsolidateOptions {
    pub fn run(threshold: f64) -> Self {
        Self {
            dry_run: false,
            threshold,
        }
    }

    pub fn dry_run(threshold: f64) -> Self {
        Self {
            dry_run: true,
            threshold,
        }
    }
}

/// Outcome of one merge attempt: either `{1, 1}` or `{0, 0}`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeOutcome {
    pub consolidated: u64,
    pub deleted: u64,
}

/// Aggregate result of a consolidation pass.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ConsolidateResult {
    /// Candidate pairs found across all rounds and levels.
    pub candidates_found: u64,
    /// Successful merges.
    pub consolidated: u64,
    /// Chunks soft-deleted as merge secondaries.
    pub deleted: u64,
    /// Scan rounds that produced candidates.
    pub rounds: u64,
    /// Highest level reached by a promoted survivor; 0 when nothing merged.
    pub max_level: u8,
    /// Successful merges per source level.
    pub level_stats: BTreeMap<u8, u64>,
    /// Populated in dry-run mode only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub candidates: Option<Vec<ChunkPair>>,
}
