//! Simulated follower-growth and audience-quality series.
//!
//! These are NOT derived from the post batch. A single profile snapshot
//! carries no follower history, so both series are seeded random walks
//! around a baseline and must be presented to callers as estimates, not
//! measurements. The extractors deliberately accept only a window length,
//! baselines and a seed; swapping in a real historical-data source later
//! only has to preserve the output shape.

use chrono::{Duration, NaiveDate, Utc};
use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::{day_label, round2};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GrowthPoint {
    pub day: String,
    pub followers: u64,
    pub daily_change: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AudienceQualityPoint {
    pub day: String,
    pub ratio: f64,
    pub influential_followers: u64,
}

/// Simulated daily follower counts for the `window_days` calendar days
/// ending today. The walk drifts upward over the most recent half of the
/// window and never dips below zero.
pub fn follower_growth(window_days: u32, baseline: u64, seed: u64) -> Vec<GrowthPoint> {
    let mut rng = StdRng::seed_from_u64(seed);
    let today = Utc::now().date_naive();
    let mut followers = baseline as i64;
    let mut points = Vec::with_capacity(window_days as usize);

    for days_ago in (0..window_days).rev() {
        let trend = if days_ago < window_days / 2 { 100 } else { 0 };
        let change: i64 = rng.gen_range(-50..350) + trend;
        let next = (followers + change).max(0);
        let applied = next - followers;
        followers = next;

        points.push(GrowthPoint {
            day: window_day(today, days_ago),
            followers: followers as u64,
            daily_change: applied,
        });
    }

    points
}

/// Simulated followers-to-following ratio and influential-follower count
/// over the same calendar window.
pub fn audience_quality(
    window_days: u32,
    ratio_baseline: f64,
    influential_baseline: u64,
    seed: u64,
) -> Vec<AudienceQualityPoint> {
    let mut rng = StdRng::seed_from_u64(seed);
    let today = Utc::now().date_naive();
    let mut ratio = ratio_baseline;
    let mut influential = influential_baseline as i64;
    let mut points = Vec::with_capacity(window_days as usize);

    for days_ago in (0..window_days).rev() {
        ratio = (ratio + rng.gen_range(-0.1..0.3)).max(0.0);
        influential = (influential + rng.gen_range(-20..40)).max(0);

        points.push(AudienceQualityPoint {
            day: window_day(today, days_ago),
            ratio: round2(ratio),
            influential_followers: influential as u64,
        });
    }

    points
}

fn window_day(today: NaiveDate, days_ago: u32) -> String {
    day_label(today - Duration::days(days_ago as i64))
}
