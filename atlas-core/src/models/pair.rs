//! Canonical unordered chunk pairs.

use serde::{Deserialize, Serialize};

use super::chunk::ChunkId;

/// Unordered pair of chunk ids, canonicalized so that `a < b`
/// lexicographically. The canonical key `a~b` deduplicates pairs
/// within a consolidation round.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChunkPair {
    pub a: ChunkId,
    pub b: ChunkId,
}

impl ChunkPair {
    pub fn new(x: ChunkId, y: ChunkId) -> Self {
        if x <= y {
            Self { a: x, b: y }
        } else {
            Self { a: y, b: x }
        }
    }

    /// Canonical key, unique per unordered pair.
    pub fn key(&self) -> String {
        format!("{}~{}", self.a, self.b)
    }
}

impl std::fmt::Display for ChunkPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}~{}", self.a, self.b)
    }
}
