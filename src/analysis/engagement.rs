use serde::{Deserialize, Serialize};

use crate::{day_label, engagement_rate, round2, truncate_text, Post, Profile};

const VIRALITY_TEXT_CHARS: usize = 30;

/// One row of the per-post engagement view. `index` is the display ordinal
/// within the truncated newest-first sequence, not a post identifier.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngagementRecord {
    pub index: usize,
    pub date: String,
    pub likes: u64,
    pub retweets: u64,
    pub replies: u64,
    pub quotes: u64,
    pub engagement_rate: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViralityRecord {
    pub index: usize,
    pub date: String,
    pub text: String,
    pub virality: f64,
    pub retweets: u64,
    pub quotes: u64,
}

/// Per-post engagement for the `cap` most recent posts. Expects the batch
/// already sorted newest-first; output order matches input order.
pub fn engagement_per_post(posts: &[Post], profile: &Profile, cap: usize) -> Vec<EngagementRecord> {
    posts
        .iter()
        .take(cap)
        .enumerate()
        .map(|(index, post)| EngagementRecord {
            index,
            date: day_label(post.created_at.date_naive()),
            likes: post.metrics.like_count,
            retweets: post.metrics.retweet_count,
            replies: post.metrics.reply_count,
            quotes: post.metrics.quote_count,
            engagement_rate: engagement_rate(post, profile),
        })
        .collect()
}

/// Virality quotient for the `cap` most recent posts: reshare-type
/// engagement over likes, with the denominator floored at 1. Output keeps
/// input recency order; ranking is a separate step ([`top_viral`]).
pub fn virality_quotient(posts: &[Post], cap: usize) -> Vec<ViralityRecord> {
    posts
        .iter()
        .take(cap)
        .enumerate()
        .map(|(index, post)| {
            let reshares = post.metrics.retweet_count + post.metrics.quote_count;
            let denominator = post.metrics.like_count.max(1);
            ViralityRecord {
                index,
                date: day_label(post.created_at.date_naive()),
                text: truncate_text(&post.text, VIRALITY_TEXT_CHARS),
                virality: round2(reshares as f64 / denominator as f64),
                retweets: post.metrics.retweet_count,
                quotes: post.metrics.quote_count,
            }
        })
        .collect()
}

/// Top `n` records by descending virality quotient.
pub fn top_viral(records: &[ViralityRecord], n: usize) -> Vec<ViralityRecord> {
    let mut ranked = records.to_vec();
    ranked.sort_by(|a, b| {
        b.virality
            .partial_cmp(&a.virality)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    ranked.truncate(n);
    ranked
}
