use super::{ClassifierError, ConsolidationError, StoreError};

/// Top-level error type for the Atlas engine.
/// All subsystem errors convert into this via `From` impls.
#[derive(Debug, thiserror::Error)]
pub enum AtlasError {
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    #[error("classifier error: {0}")]
    Classifier(#[from] ClassifierError),

    #[error("consolidation error: {0}")]
    Consolidation(#[from] ConsolidationError),

    #[error("config error: {0}")]
    Config(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Convenience type alias.
pub type AtlasResult<T> = Result<T, AtlasError>;
