//! # atlas-store
//!
//! Store-side building blocks for the Atlas engine: filter evaluation
//! against payload JSON, and `MemoryStore`, a deterministic in-memory
//! implementation of `IVectorStore` used as the reference store in tests
//! and embedded hosts.

pub mod filter;
pub mod memory;

pub use memory::MemoryStore;
