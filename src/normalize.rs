//! Provider payload adapters.
//!
//! Captures arrive in one of two shapes: the X API v2 shape
//! (`public_metrics`, tagged entity objects) or the legacy scraper shape
//! (`id_str`, `full_text`, `favorite_count`). Each adapter maps its raw
//! shape onto the canonical [`Post`]/[`Profile`] records; nothing
//! downstream ever sees provider-specific fields. Retrieval itself is an
//! external concern; this module only consumes already-fetched captures.

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::error::AnalyzeError;
use crate::{Post, PostEntities, PostMetrics, Profile};

/// An already-fetched provider dump: one profile plus its post batch.
#[derive(Debug, Deserialize)]
pub struct ProviderCapture {
    pub profile: ProviderProfile,
    #[serde(alias = "tweets")]
    pub posts: Vec<ProviderPost>,
}

impl ProviderCapture {
    pub fn into_batch(self) -> Result<(Vec<Post>, Profile), AnalyzeError> {
        normalize_batch(self.posts, self.profile)
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ProviderPost {
    ApiV2(ApiV2Post),
    Scraper(ScraperPost),
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ProviderProfile {
    ApiV2(ApiV2Profile),
    Scraper(ScraperProfile),
}

#[derive(Debug, Deserialize)]
pub struct ApiV2Post {
    pub id: String,
    pub text: String,
    pub created_at: String,
    // Required so a legacy flat payload cannot silently match this shape
    // with zeroed counters.
    pub public_metrics: ApiV2Metrics,
    #[serde(default)]
    pub entities: Option<ApiV2Entities>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ApiV2Metrics {
    #[serde(default)]
    pub like_count: u64,
    #[serde(default)]
    pub retweet_count: u64,
    #[serde(default)]
    pub reply_count: u64,
    #[serde(default)]
    pub quote_count: u64,
}

#[derive(Debug, Default, Deserialize)]
pub struct ApiV2Entities {
    #[serde(default)]
    pub hashtags: Vec<TaggedEntity>,
    #[serde(default)]
    pub mentions: Vec<MentionEntity>,
    #[serde(default)]
    pub urls: Vec<UrlEntity>,
}

#[derive(Debug, Deserialize)]
pub struct TaggedEntity {
    pub tag: String,
}

#[derive(Debug, Deserialize)]
pub struct MentionEntity {
    pub username: String,
}

#[derive(Debug, Deserialize)]
pub struct UrlEntity {
    pub url: String,
}

#[derive(Debug, Deserialize)]
pub struct ApiV2Profile {
    pub id: String,
    pub username: String,
    pub name: String,
    #[serde(default)]
    pub followers_count: u64,
    #[serde(default)]
    pub following_count: u64,
    #[serde(default)]
    pub tweet_count: u64,
    #[serde(default)]
    pub profile_image_url: String,
    #[serde(default)]
    pub description: String,
}

/// Legacy scraper record. Field names follow the old statuses endpoint.
#[derive(Debug, Deserialize)]
pub struct ScraperPost {
    #[serde(alias = "id")]
    pub id_str: String,
    #[serde(alias = "text")]
    pub full_text: String,
    pub created_at: String,
    #[serde(default, alias = "likes")]
    pub favorite_count: u64,
    #[serde(default)]
    pub retweet_count: u64,
    #[serde(default)]
    pub reply_count: u64,
    #[serde(default)]
    pub quote_count: u64,
    #[serde(default)]
    pub entities: Option<ScraperEntities>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ScraperEntities {
    #[serde(default)]
    pub hashtags: Vec<ScraperHashtag>,
    #[serde(default)]
    pub user_mentions: Vec<ScraperMention>,
    #[serde(default)]
    pub urls: Vec<ScraperUrl>,
}

#[derive(Debug, Deserialize)]
pub struct ScraperHashtag {
    pub text: String,
}

#[derive(Debug, Deserialize)]
pub struct ScraperMention {
    pub screen_name: String,
}

#[derive(Debug, Deserialize)]
pub struct ScraperUrl {
    #[serde(alias = "url")]
    pub expanded_url: String,
}

#[derive(Debug, Deserialize)]
pub struct ScraperProfile {
    #[serde(alias = "id")]
    pub id_str: String,
    #[serde(alias = "username")]
    pub screen_name: String,
    pub name: String,
    #[serde(default)]
    pub followers_count: u64,
    #[serde(default, alias = "following_count")]
    pub friends_count: u64,
    #[serde(default, alias = "tweet_count")]
    pub statuses_count: u64,
    #[serde(default, alias = "profile_image_url")]
    pub profile_image_url_https: String,
    #[serde(default)]
    pub description: String,
}

pub fn normalize_batch(
    posts: Vec<ProviderPost>,
    profile: ProviderProfile,
) -> Result<(Vec<Post>, Profile), AnalyzeError> {
    if posts.is_empty() {
        return Err(AnalyzeError::InvalidInput("post batch is empty".to_string()));
    }

    let posts = posts
        .into_iter()
        .map(normalize_post)
        .collect::<Result<Vec<_>, _>>()?;

    Ok((posts, normalize_profile(profile)))
}

fn normalize_post(post: ProviderPost) -> Result<Post, AnalyzeError> {
    match post {
        ProviderPost::ApiV2(raw) => Ok(Post {
            created_at: parse_timestamp(&raw.created_at, &raw.id)?,
            id: raw.id,
            text: raw.text,
            metrics: PostMetrics {
                like_count: raw.public_metrics.like_count,
                retweet_count: raw.public_metrics.retweet_count,
                reply_count: raw.public_metrics.reply_count,
                quote_count: raw.public_metrics.quote_count,
            },
            entities: raw.entities.map(|entities| PostEntities {
                hashtags: entities.hashtags.into_iter().map(|h| h.tag).collect(),
                mentions: entities.mentions.into_iter().map(|m| m.username).collect(),
                links: entities.urls.into_iter().map(|u| u.url).collect(),
            }),
        }),
        ProviderPost::Scraper(raw) => Ok(Post {
            created_at: parse_timestamp(&raw.created_at, &raw.id_str)?,
            id: raw.id_str,
            text: raw.full_text,
            metrics: PostMetrics {
                like_count: raw.favorite_count,
                retweet_count: raw.retweet_count,
                reply_count: raw.reply_count,
                quote_count: raw.quote_count,
            },
            entities: raw.entities.map(|entities| PostEntities {
                hashtags: entities.hashtags.into_iter().map(|h| h.text).collect(),
                mentions: entities
                    .user_mentions
                    .into_iter()
                    .map(|m| m.screen_name)
                    .collect(),
                links: entities.urls.into_iter().map(|u| u.expanded_url).collect(),
            }),
        }),
    }
}

fn normalize_profile(profile: ProviderProfile) -> Profile {
    match profile {
        ProviderProfile::ApiV2(raw) => Profile {
            id: raw.id,
            handle: raw.username,
            display_name: raw.name,
            follower_count: raw.followers_count,
            following_count: raw.following_count,
            post_count: raw.tweet_count,
            avatar_url: raw.profile_image_url,
            bio: raw.description,
        },
        ProviderProfile::Scraper(raw) => Profile {
            id: raw.id_str,
            handle: raw.screen_name,
            display_name: raw.name,
            follower_count: raw.followers_count,
            following_count: raw.friends_count,
            post_count: raw.statuses_count,
            avatar_url: raw.profile_image_url_https,
            bio: raw.description,
        },
    }
}

/// Accepts RFC 3339 (API v2) or the legacy `Wed Oct 10 20:19:24 +0000 2018`
/// format. Anything else invalidates the batch.
fn parse_timestamp(value: &str, post_id: &str) -> Result<DateTime<Utc>, AnalyzeError> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Ok(parsed.with_timezone(&Utc));
    }
    if let Ok(parsed) = DateTime::parse_from_str(value, "%a %b %d %H:%M:%S %z %Y") {
        return Ok(parsed.with_timezone(&Utc));
    }
    Err(AnalyzeError::InvalidInput(format!(
        "post {} has an unparseable timestamp: {}",
        post_id, value
    )))
}
