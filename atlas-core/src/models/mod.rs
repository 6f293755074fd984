mod chunk;
mod classification;
mod consolidate_result;
mod engine_event;
mod pair;
mod query;

pub use chunk::{ChunkId, ChunkPayload, CollectionInfo, PointRecord, ScoredPoint, TERMINAL_LEVEL};
pub use classification::{Classification, KeepSide, MergeDirection, RelationType};
pub use consolidate_result::{ConsolidateOptions, ConsolidateResult, MergeOutcome};
pub use engine_event::EngineEvent;
pub use pair::ChunkPair;
pub use query::{Condition, Filter, MatchValue, PayloadPatch, ScrollPage, ScrollRequest, SearchRequest};
