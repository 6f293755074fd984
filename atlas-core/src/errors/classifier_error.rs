use thiserror::Error;

/// Errors internal to the classifier adapter.
///
/// These never escape the adapter: every variant is converted into the
/// deterministic fallback classification before reaching callers.
#[derive(Debug, Error)]
pub enum ClassifierError {
    #[error("classifier request failed: {message}")]
    Request { message: String },

    #[error("classifier timed out after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    #[error("malformed classifier response: {message}")]
    MalformedResponse { message: String },
}
