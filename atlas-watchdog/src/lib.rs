//! # atlas-watchdog
//!
//! Coordination between the ingestion producer and the consolidator: a
//! pause controller with one-shot waiters, the watchdog policy loop with a
//! circuit breaker, a gated ingest writer, and the process-wide singleton
//! factories.

pub mod global;
pub mod ingest;
pub mod pause;
pub mod watchdog;

pub use global::{global_pause_controller, global_watchdog, init_global_watchdog, reset_globals};
pub use ingest::GatedIngest;
pub use pause::IngestPauseController;
pub use watchdog::{ConsolidationWatchdog, WatchdogState, MAX_CONSECUTIVE_FAILURES};
