pub mod analysis;
pub mod classify;
pub mod config;
pub mod error;
pub mod normalize;
pub mod openai;

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// A single unit of user-generated content with its engagement counters.
/// Produced at the normalizer boundary; never mutated by the pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    pub id: String,
    pub text: String,
    pub created_at: DateTime<Utc>,
    pub metrics: PostMetrics,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entities: Option<PostEntities>,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct PostMetrics {
    #[serde(default)]
    pub like_count: u64,
    #[serde(default)]
    pub retweet_count: u64,
    #[serde(default)]
    pub reply_count: u64,
    #[serde(default)]
    pub quote_count: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PostEntities {
    #[serde(default)]
    pub hashtags: Vec<String>,
    #[serde(default)]
    pub mentions: Vec<String>,
    #[serde(default)]
    pub links: Vec<String>,
}

/// Account snapshot supplied alongside the post batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    pub id: String,
    pub handle: String,
    pub display_name: String,
    pub follower_count: u64,
    pub following_count: u64,
    pub post_count: u64,
    #[serde(default)]
    pub avatar_url: String,
    #[serde(default)]
    pub bio: String,
}

impl PostMetrics {
    pub fn total_engagement(&self) -> u64 {
        self.like_count + self.retweet_count + self.reply_count + self.quote_count
    }
}

impl Post {
    pub fn total_engagement(&self) -> u64 {
        self.metrics.total_engagement()
    }
}

/// Engagement as a percentage of the follower base, rounded to 2 decimals.
/// A zero-follower profile yields 0 rather than an error.
pub fn engagement_rate(post: &Post, profile: &Profile) -> f64 {
    if profile.follower_count == 0 {
        return 0.0;
    }
    let rate = post.total_engagement() as f64 / profile.follower_count as f64 * 100.0;
    round2(rate)
}

/// Returns a copy of the batch ordered newest-first. The input slice is
/// left untouched; every extractor consumes the sorted copy.
pub fn sort_newest_first(posts: &[Post]) -> Vec<Post> {
    let mut sorted = posts.to_vec();
    sorted.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    sorted
}

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

pub fn day_label(date: NaiveDate) -> String {
    format!("{:02}/{:02}", date.month(), date.day())
}

/// First `max_chars` code points, with an ellipsis when the text is longer.
pub fn truncate_text(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let head: String = text.chars().take(max_chars).collect();
    format!("{}...", head)
}

pub fn stable_hash64(value: &str) -> u64 {
    use sha2::{Digest, Sha256};

    let mut hasher = Sha256::new();
    hasher.update(value.as_bytes());
    let digest = hasher.finalize();
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&digest[..8]);
    u64::from_be_bytes(bytes)
}

pub fn format_number(value: f64) -> String {
    let rounded = value.round().max(0.0) as i64;
    let mut chars: Vec<char> = rounded.to_string().chars().collect();
    let mut result = String::new();
    let mut count = 0usize;

    while let Some(ch) = chars.pop() {
        if count == 3 {
            result.push(',');
            count = 0;
        }
        result.push(ch);
        count += 1;
    }

    result.chars().rev().collect()
}

pub fn format_float(value: f64, digits: usize) -> String {
    format!("{:.1$}", value, digits)
}
