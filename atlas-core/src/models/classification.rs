//! Classifier output types.

use serde::{Deserialize, Serialize};

/// Relationship between the two chunks of a pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationType {
    DuplicateWork,
    SequentialIteration,
    ContextualConvergence,
}

/// Temporal direction of the relationship, when the classifier can tell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MergeDirection {
    Forward,
    Backward,
    Unknown,
}

/// Which side of the pair survives the merge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeepSide {
    First,
    Second,
    Merge,
}

/// Structured classifier verdict for a chunk pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classification {
    #[serde(rename = "type")]
    pub relation: RelationType,
    pub direction: MergeDirection,
    pub reasoning: String,
    pub keep: KeepSide,
}

impl Classification {
    /// Deterministic fallback used whenever the external classifier fails.
    ///
    /// Keeping the first chunk (by the store's id ordering) preserves data
    /// and lets a future pass revisit the pair.
    pub fn fallback() -> Self {
        Self {
            relation: RelationType::DuplicateWork,
            direction: MergeDirection::Unknown,
            reasoning: "classification unavailable, defaulting to keep-first".to_string(),
            keep: KeepSide::First,
        }
    }
}
