//! # atlas-core
//!
//! Shared foundation for the Atlas chunk consolidation engine:
//! data models, error taxonomy, configuration, and the interface traits
//! implemented by the store, classifier, and event subsystems.

pub mod config;
pub mod errors;
pub mod models;
pub mod traits;

pub use errors::{AtlasError, AtlasResult};
