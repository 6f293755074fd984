//! # atlas-consolidation
//!
//! The consolidation core: the candidate finder scans one level for
//! near-duplicate pairs, the merge executor promotes a survivor and
//! soft-deletes the loser, and the driver iterates both to a fixed point
//! per level.

pub mod driver;
pub mod events;
pub mod executor;
pub mod finder;

pub use driver::ConsolidationDriver;
pub use events::TracingEventSink;
pub use executor::MergeExecutor;
pub use finder::CandidateFinder;
