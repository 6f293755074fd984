//! # atlas-classifier
//!
//! Adapter around the external structured-JSON relationship classifier.
//! The adapter is total: every failure mode collapses into the
//! deterministic keep-first fallback so a consolidation pass never aborts
//! on classifier trouble.

pub mod http;
pub mod prompt;

pub use http::HttpClassifier;
