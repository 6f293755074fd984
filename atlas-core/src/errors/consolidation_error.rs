use thiserror::Error;

/// Errors raised by the consolidation driver and watchdog.
#[derive(Debug, Error)]
pub enum ConsolidationError {
    #[error("collection missing at consolidation entry: {name}")]
    CollectionMissing { name: String },

    #[error("consolidation already in progress")]
    AlreadyRunning,
}
