//! Chunk stability scoring.

use chrono::{DateTime, Utc};

use atlas_core::models::ChunkPayload;

/// Level span for the consolidation weight.
const CONSOLIDATION_LEVEL_SPAN: f64 = 3.0;
/// Access count at which the access weight saturates.
const ACCESS_SATURATION: f64 = 10.0;
/// Age in days at which the age weight saturates.
const AGE_SATURATION_DAYS: f64 = 30.0;

/// Stability score in `[0, 1]`, rounded to two decimals.
///
/// The mean of three weights: consolidation depth, access frequency, and
/// age. Each weight is monotone in its input, so the score is monotone
/// non-decreasing in level, access count, and age.
pub fn stability_score(payload: &ChunkPayload, now: DateTime<Utc>) -> f64 {
    let consolidation_weight = f64::from(payload.consolidation_level) / CONSOLIDATION_LEVEL_SPAN;
    let access_weight = (payload.access_count as f64 / ACCESS_SATURATION).min(1.0);
    let age_days = (now - payload.created_at).num_seconds().max(0) as f64 / 86_400.0;
    let age_weight = (age_days / AGE_SATURATION_DAYS).min(1.0);

    let raw = (consolidation_weight + access_weight + age_weight) / 3.0;
    (raw.clamp(0.0, 1.0) * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn payload(level: u8, access_count: u64, age_days: i64, now: DateTime<Utc>) -> ChunkPayload {
        let mut p = ChunkPayload::new("x", now - Duration::days(age_days));
        p.consolidation_level = level;
        p.access_count = access_count;
        p
    }

    #[test]
    fn fresh_unconsolidated_chunk_scores_zero() {
        let now = Utc::now();
        assert_eq!(stability_score(&payload(0, 0, 0, now), now), 0.0);
    }

    #[test]
    fn saturated_chunk_scores_one() {
        let now = Utc::now();
        assert_eq!(stability_score(&payload(3, 10, 30, now), now), 1.0);
        // level 4 pushes past the level span; still clamped to 1.0
        assert_eq!(stability_score(&payload(4, 100, 365, now), now), 1.0);
    }

    #[test]
    fn mid_range_score_rounds_to_two_decimals() {
        let now = Utc::now();
        // (1/3 + 0.5 + 0.5) / 3 = 0.4444... -> 0.44
        assert_eq!(stability_score(&payload(1, 5, 15, now), now), 0.44);
    }

    #[test]
    fn future_created_at_counts_as_zero_age() {
        let now = Utc::now();
        let mut p = ChunkPayload::new("x", now + Duration::days(2));
        p.consolidation_level = 0;
        assert_eq!(stability_score(&p, now), 0.0);
    }
}
