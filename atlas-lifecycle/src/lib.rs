//! # atlas-lifecycle
//!
//! The chunk lifecycle tail: stability scoring for live chunks and the
//! vacuum that hard-deletes soft-deleted chunks once their grace period
//! expires.

pub mod stability;
pub mod vacuum;

pub use stability::stability_score;
pub use vacuum::{mark_for_deletion, unmark_for_deletion, LifecycleVacuum, VacuumReport};
