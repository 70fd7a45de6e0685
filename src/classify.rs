//! Text-classification collaborator seam.
//!
//! The pipeline hands a capped batch of post texts to an external
//! classifier and expects back per-category counts and average engagement
//! for two fixed taxonomies: content type / topic, and emotion /
//! psychological hook. This module owns the taxonomies, the batching cap,
//! and the shape validation; the HTTP client lives in [`crate::openai`].

use serde::{Deserialize, Serialize};

use crate::error::AnalyzeError;
use crate::Post;

pub const CONTENT_TYPES: [&str; 5] = ["Text-only", "Image", "Video", "Thread", "Poll"];
pub const TOPICS: [&str; 5] = ["Technology", "Business", "Personal", "News", "Other"];
pub const EMOTIONS: [&str; 5] = ["Humor", "Curiosity", "Inspiration", "Surprise", "Anger"];
pub const HOOKS: [&str; 5] = [
    "Call-to-Action",
    "Controversial",
    "Personal Story",
    "Question",
    "Educational",
];

/// One taxonomy bucket as returned by the collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryBreakdown {
    pub label: String,
    pub count: u64,
    pub avg_engagement: f64,
}

#[derive(Debug, Clone)]
pub struct ContentClassification {
    pub content_performance: Vec<CategoryBreakdown>,
    pub topic_analysis: Vec<CategoryBreakdown>,
}

#[derive(Debug, Clone)]
pub struct EmotionClassification {
    pub emotion_analysis: Vec<CategoryBreakdown>,
    pub psychological_hooks: Vec<CategoryBreakdown>,
}

impl ContentClassification {
    /// Validates a collaborator response against the content/topic
    /// taxonomies and reorders each breakdown into canonical label order.
    pub fn validate(
        content_performance: Vec<CategoryBreakdown>,
        topic_analysis: Vec<CategoryBreakdown>,
    ) -> Result<Self, AnalyzeError> {
        Ok(Self {
            content_performance: check_taxonomy("content type", &CONTENT_TYPES, content_performance)?,
            topic_analysis: check_taxonomy("topic", &TOPICS, topic_analysis)?,
        })
    }
}

impl EmotionClassification {
    pub fn validate(
        emotion_analysis: Vec<CategoryBreakdown>,
        psychological_hooks: Vec<CategoryBreakdown>,
    ) -> Result<Self, AnalyzeError> {
        Ok(Self {
            emotion_analysis: check_taxonomy("emotion", &EMOTIONS, emotion_analysis)?,
            psychological_hooks: check_taxonomy("hook", &HOOKS, psychological_hooks)?,
        })
    }
}

/// The classification capability the pipeline depends on. The two calls
/// are independent and are driven concurrently by the assembler.
#[allow(async_fn_in_trait)]
pub trait TextClassifier {
    async fn classify_content(
        &self,
        texts: &[String],
    ) -> Result<ContentClassification, AnalyzeError>;

    async fn classify_emotions(
        &self,
        texts: &[String],
    ) -> Result<EmotionClassification, AnalyzeError>;
}

/// Collects at most `limit` texts from an already-sorted batch, newest
/// first, matching the collaborator's input cap.
pub fn batch_texts(posts: &[Post], limit: usize) -> Vec<String> {
    posts
        .iter()
        .take(limit)
        .map(|post| post.text.clone())
        .collect()
}

fn check_taxonomy(
    kind: &str,
    expected: &[&str],
    items: Vec<CategoryBreakdown>,
) -> Result<Vec<CategoryBreakdown>, AnalyzeError> {
    if items.len() != expected.len() {
        return Err(AnalyzeError::CollaboratorMalformed(format!(
            "expected {} {} categories, got {}",
            expected.len(),
            kind,
            items.len()
        )));
    }

    for item in &items {
        if !expected.contains(&item.label.as_str()) {
            return Err(AnalyzeError::CollaboratorMalformed(format!(
                "unknown {} category: {}",
                kind, item.label
            )));
        }
        if !item.avg_engagement.is_finite() || item.avg_engagement < 0.0 {
            return Err(AnalyzeError::CollaboratorMalformed(format!(
                "{} category {} has an invalid average engagement",
                kind, item.label
            )));
        }
    }

    // Reorder into canonical label order so repeated runs serialize
    // identically no matter how the collaborator ordered its answer.
    let mut ordered = Vec::with_capacity(expected.len());
    for label in expected {
        let matches: Vec<&CategoryBreakdown> =
            items.iter().filter(|item| item.label == *label).collect();
        match matches.as_slice() {
            [single] => ordered.push((*single).clone()),
            [] => {
                return Err(AnalyzeError::CollaboratorMalformed(format!(
                    "missing {} category: {}",
                    kind, label
                )))
            }
            _ => {
                return Err(AnalyzeError::CollaboratorMalformed(format!(
                    "duplicate {} category: {}",
                    kind, label
                )))
            }
        }
    }

    Ok(ordered)
}
