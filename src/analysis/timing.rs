use chrono::{Datelike, Timelike};
use serde::{Deserialize, Serialize};

use crate::Post;

/// Weekday labels are fixed Sunday-first, independent of locale.
pub const WEEKDAY_LABELS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeekdayActivity {
    pub day: String,
    pub posts: u64,
    pub avg_engagement: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HourlyActivity {
    pub hour: u32,
    pub posts: u64,
    pub avg_engagement: u64,
}

/// Posts per weekday with the rounded average engagement per bucket.
/// Always emits all 7 buckets; empty buckets average to 0.
pub fn posting_frequency(posts: &[Post]) -> Vec<WeekdayActivity> {
    let mut counts = [0u64; 7];
    let mut totals = [0u64; 7];

    for post in posts {
        let index = post.created_at.weekday().num_days_from_sunday() as usize;
        counts[index] += 1;
        totals[index] += post.total_engagement();
    }

    WEEKDAY_LABELS
        .iter()
        .enumerate()
        .map(|(index, day)| WeekdayActivity {
            day: (*day).to_string(),
            posts: counts[index],
            avg_engagement: bucket_average(totals[index], counts[index]),
        })
        .collect()
}

/// Same aggregation bucketed by hour of day. Always emits all 24 buckets.
/// Hours read from the batch's consistent timezone (UTC after
/// normalization).
pub fn optimal_posting_time(posts: &[Post]) -> Vec<HourlyActivity> {
    let mut counts = [0u64; 24];
    let mut totals = [0u64; 24];

    for post in posts {
        let hour = post.created_at.hour() as usize;
        counts[hour] += 1;
        totals[hour] += post.total_engagement();
    }

    (0..24)
        .map(|hour| HourlyActivity {
            hour: hour as u32,
            posts: counts[hour],
            avg_engagement: bucket_average(totals[hour], counts[hour]),
        })
        .collect()
}

fn bucket_average(total: u64, count: u64) -> u64 {
    if count == 0 {
        return 0;
    }
    (total as f64 / count as f64).round() as u64
}
