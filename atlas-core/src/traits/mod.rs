mod classifier;
mod event_sink;
mod vector_store;

pub use classifier::IChunkClassifier;
pub use event_sink::IEventSink;
pub use vector_store::IVectorStore;
