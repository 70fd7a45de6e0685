pub mod engagement;
pub mod growth;
pub mod inflection;
pub mod timing;

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

pub use engagement::{engagement_per_post, top_viral, virality_quotient, EngagementRecord, ViralityRecord};
pub use growth::{audience_quality, follower_growth, AudienceQualityPoint, GrowthPoint};
pub use inflection::{inflection_points, InflectionMetrics, InflectionPoint};
pub use timing::{optimal_posting_time, posting_frequency, HourlyActivity, WeekdayActivity};

use crate::classify::{batch_texts, CategoryBreakdown, TextClassifier};
use crate::config::AnalyzerConfig;
use crate::error::AnalyzeError;
use crate::{sort_newest_first, stable_hash64, Post, Profile};

/// The complete report: eleven facets, all populated or none. Constructed
/// once per run and never mutated.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisReport {
    pub follower_growth: Vec<GrowthPoint>,
    pub engagement_per_post: Vec<EngagementRecord>,
    pub content_performance: Vec<CategoryBreakdown>,
    pub topic_analysis: Vec<CategoryBreakdown>,
    pub posting_frequency: Vec<WeekdayActivity>,
    pub optimal_posting_time: Vec<HourlyActivity>,
    pub audience_quality: Vec<AudienceQualityPoint>,
    pub virality_ranking: Vec<ViralityRecord>,
    pub emotion_analysis: Vec<CategoryBreakdown>,
    pub psychological_hooks: Vec<CategoryBreakdown>,
    pub inflection_points: Vec<InflectionPoint>,
}

/// Runs every extractor over one batch and assembles the report.
///
/// The two collaborator calls are driven concurrently so total latency is
/// bounded by the slower of the two; the local extractors are pure
/// functions of the sorted batch. Fails atomically: the first extractor or
/// collaborator error aborts the run and no partial report is returned.
pub async fn run<C: TextClassifier>(
    posts: &[Post],
    profile: &Profile,
    classifier: &C,
    config: &AnalyzerConfig,
) -> Result<AnalysisReport, AnalyzeError> {
    validate_batch(posts, profile)?;

    let sorted = sort_newest_first(posts);
    let texts = batch_texts(&sorted, config.limits.classifier_batch_limit);

    let (content, emotions) = tokio::try_join!(
        classifier.classify_content(&texts),
        classifier.classify_emotions(&texts),
    )?;

    let seed = growth_seed(profile, config);
    let follower_baseline = if profile.follower_count > 0 {
        profile.follower_count
    } else {
        config.growth.follower_baseline
    };
    let ratio_baseline = if profile.following_count > 0 {
        profile.follower_count as f64 / profile.following_count as f64
    } else {
        config.growth.ratio_baseline
    };

    Ok(AnalysisReport {
        follower_growth: follower_growth(config.growth.window_days, follower_baseline, seed),
        engagement_per_post: engagement_per_post(&sorted, profile, config.limits.recent_post_cap),
        content_performance: content.content_performance,
        topic_analysis: content.topic_analysis,
        posting_frequency: posting_frequency(&sorted),
        optimal_posting_time: optimal_posting_time(&sorted),
        audience_quality: audience_quality(
            config.growth.window_days,
            ratio_baseline,
            config.growth.influential_baseline,
            seed.wrapping_add(1),
        ),
        virality_ranking: virality_quotient(&sorted, config.limits.virality_post_cap),
        emotion_analysis: emotions.emotion_analysis,
        psychological_hooks: emotions.psychological_hooks,
        inflection_points: inflection_points(&sorted, config.limits.inflection_top_n),
    })
}

fn validate_batch(posts: &[Post], profile: &Profile) -> Result<(), AnalyzeError> {
    if posts.is_empty() {
        return Err(AnalyzeError::InvalidInput("post batch is empty".to_string()));
    }
    if profile.handle.trim().is_empty() {
        return Err(AnalyzeError::InvalidInput(
            "profile handle is empty".to_string(),
        ));
    }

    let mut seen = HashSet::new();
    for post in posts {
        if post.id.trim().is_empty() {
            return Err(AnalyzeError::InvalidInput(
                "post with an empty id".to_string(),
            ));
        }
        if !seen.insert(post.id.as_str()) {
            return Err(AnalyzeError::InvalidInput(format!(
                "duplicate post id: {}",
                post.id
            )));
        }
    }

    Ok(())
}

/// Simulated series are randomized per run unless a seed is pinned in the
/// config; the profile handle keeps distinct accounts from sharing a walk.
fn growth_seed(profile: &Profile, config: &AnalyzerConfig) -> u64 {
    if let Some(seed) = config.growth.seed {
        return seed;
    }
    let now = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|duration| duration.as_millis() as u64)
        .unwrap_or(0);
    stable_hash64(&profile.handle) ^ now
}
