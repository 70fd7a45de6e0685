use serde::{Deserialize, Serialize};
use std::cmp::Reverse;

use crate::{day_label, Post};

/// Fixed share of likes credited as follower gain. A heuristic stand-in
/// until per-post follower attribution exists.
const FOLLOWER_GAIN_PER_LIKE: f64 = 0.2;

/// Ordered first-match rule chain over the lowercased post text. A post
/// matching several rules resolves to the earliest one, not the most
/// specific.
const CAUSE_RULES: [(&[&str], &str); 3] = [
    (
        &["tech", "technology"],
        "Major viral post about technology trends",
    ),
    (&["business", "advice"], "Thread on business advice went viral"),
    (
        &["personal", "story"],
        "Personal story resonated with audience",
    ),
];

const DEFAULT_CAUSE: &str = "High-engagement post";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InflectionPoint {
    pub date: String,
    pub description: String,
    pub metrics: InflectionMetrics,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InflectionMetrics {
    pub likes: u64,
    pub retweets: u64,
    pub follower_gain: u64,
}

/// The `top_n` highest-engagement posts, most impactful first, each tagged
/// with a human-readable cause. Ties keep the batch's input order.
pub fn inflection_points(posts: &[Post], top_n: usize) -> Vec<InflectionPoint> {
    let mut ranked: Vec<&Post> = posts.iter().collect();
    ranked.sort_by_key(|post| Reverse(post.total_engagement()));

    ranked
        .into_iter()
        .take(top_n)
        .map(|post| InflectionPoint {
            date: day_label(post.created_at.date_naive()),
            description: classify_cause(&post.text).to_string(),
            metrics: InflectionMetrics {
                likes: post.metrics.like_count,
                retweets: post.metrics.retweet_count,
                follower_gain: (post.metrics.like_count as f64 * FOLLOWER_GAIN_PER_LIKE).round()
                    as u64,
            },
        })
        .collect()
}

fn classify_cause(text: &str) -> &'static str {
    let lowered = text.to_lowercase();
    for (keywords, description) in CAUSE_RULES {
        if keywords.iter().any(|keyword| lowered.contains(keyword)) {
            return description;
        }
    }
    DEFAULT_CAUSE
}
