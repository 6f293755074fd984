use thiserror::Error;

/// Errors surfaced by vector store implementations.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("collection not found: {name}")]
    CollectionNotFound { name: String },

    #[error("store transport error: {message}")]
    Transport { message: String },

    #[error("malformed payload for point {id}: {message}")]
    MalformedPayload { id: String, message: String },
}
