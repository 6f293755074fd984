//! Filter, scroll, and search request shapes for the vector store.

use serde_json::{Map, Value};

use super::chunk::{ChunkId, PointRecord};

/// Value matched exactly against a payload field.
#[derive(Debug, Clone, PartialEq)]
pub enum MatchValue {
    Keyword(String),
    Integer(i64),
    Bool(bool),
}

/// A single field condition.
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    /// Exact match on a keyword, integer, or bool field.
    Match { field: String, value: MatchValue },
    /// Numeric range, inclusive on both bounds.
    Range {
        field: String,
        gte: Option<f64>,
        lte: Option<f64>,
    },
    /// Matches when a list field contains any of the given values.
    AnyOf { field: String, values: Vec<String> },
    /// Matches when the field is absent, null, `""`, or `[]`.
    ///
    /// Under `must_not` this expresses "present and non-empty", the portable
    /// form of an `except: [null]` presence filter.
    IsEmpty { field: String },
}

impl Condition {
    pub fn match_keyword(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self::Match {
            field: field.into(),
            value: MatchValue::Keyword(value.into()),
        }
    }

    pub fn match_int(field: impl Into<String>, value: i64) -> Self {
        Self::Match {
            field: field.into(),
            value: MatchValue::Integer(value),
        }
    }

    pub fn match_bool(field: impl Into<String>, value: bool) -> Self {
        Self::Match {
            field: field.into(),
            value: MatchValue::Bool(value),
        }
    }

    pub fn is_empty(field: impl Into<String>) -> Self {
        Self::IsEmpty {
            field: field.into(),
        }
    }
}

/// Conjunctive filter with negation and id-exclusion.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    pub must: Vec<Condition>,
    pub must_not: Vec<Condition>,
    pub exclude_ids: Vec<ChunkId>,
}

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn must(mut self, condition: Condition) -> Self {
        self.must.push(condition);
        self
    }

    pub fn must_not(mut self, condition: Condition) -> Self {
        self.must_not.push(condition);
        self
    }

    pub fn exclude_id(mut self, id: ChunkId) -> Self {
        self.exclude_ids.push(id);
        self
    }

    /// Chunks that are not soft-deleted.
    pub fn live() -> Self {
        Self::new().must_not(Condition::match_bool("deletion_eligible", true))
    }

    /// Live chunks at the given consolidation level.
    pub fn live_at_level(level: u8) -> Self {
        Self::live().must(Condition::match_int("consolidation_level", i64::from(level)))
    }
}

/// Paged scan request. Paging is deterministic: results come back in id
/// order and `offset` resumes after the given id.
#[derive(Debug, Clone)]
pub struct ScrollRequest {
    pub limit: usize,
    pub offset: Option<ChunkId>,
    pub filter: Option<Filter>,
    pub with_vector: bool,
}

/// One page of a scroll.
#[derive(Debug, Clone)]
pub struct ScrollPage {
    pub points: Vec<PointRecord>,
    pub next_offset: Option<ChunkId>,
}

/// Similarity search request. The threshold and filter apply server-side.
#[derive(Debug, Clone)]
pub struct SearchRequest {
    pub vector: Vec<f32>,
    pub limit: usize,
    pub score_threshold: f32,
    pub filter: Option<Filter>,
}

/// Shallow payload patch: top-level keys replace their counterparts,
/// `null` clears an optional field.
pub type PayloadPatch = Map<String, Value>;
