use reqwest::header::AUTHORIZATION;
use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;

use crate::classify::{
    CategoryBreakdown, ContentClassification, EmotionClassification, TextClassifier,
    CONTENT_TYPES, EMOTIONS, HOOKS, TOPICS,
};
use crate::config::ClassifierConfig;
use crate::error::AnalyzeError;

/// Chat-completions backed implementation of [`TextClassifier`].
#[derive(Clone)]
pub struct OpenAiClassifier {
    client: reqwest::Client,
    api_key: String,
    api_base: String,
    model: String,
}

impl OpenAiClassifier {
    /// Builds a client from `OPENAI_API_KEY` (or an explicit key) and the
    /// analyzer config. Returns `None` when no key is available.
    pub fn from_env(
        config: &ClassifierConfig,
        key_override: Option<String>,
    ) -> Option<Result<Self, AnalyzeError>> {
        let api_key = key_override
            .filter(|value| !value.trim().is_empty())
            .or_else(|| env::var("OPENAI_API_KEY").ok())?;
        Some(Self::new(config, api_key))
    }

    pub fn new(config: &ClassifierConfig, api_key: String) -> Result<Self, AnalyzeError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|err| {
                AnalyzeError::CollaboratorUnavailable(format!(
                    "failed to build classifier client: {}",
                    err
                ))
            })?;
        Ok(Self {
            client,
            api_key,
            api_base: config.api_base.clone(),
            model: config.model.clone(),
        })
    }

    async fn chat(&self, system: String, texts: &[String]) -> Result<String, AnalyzeError> {
        let url = format!("{}/chat/completions", self.api_base.trim_end_matches('/'));
        let user = serde_json::to_string(texts).map_err(|err| {
            AnalyzeError::InvalidInput(format!("failed to encode post texts: {}", err))
        })?;
        let request = ChatRequest {
            model: self.model.clone(),
            temperature: 0.0,
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: system,
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: user,
                },
            ],
        };

        let response = self
            .client
            .post(url)
            .header(AUTHORIZATION, format!("Bearer {}", self.api_key))
            .json(&request)
            .send()
            .await
            .map_err(|err| {
                AnalyzeError::CollaboratorUnavailable(format!("classifier request failed: {}", err))
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_else(|_| String::new());
            let detail = error_body.trim();
            if !detail.is_empty() {
                tracing::warn!(status = %status, body = detail, "classifier returned an error");
            }
            return Err(AnalyzeError::CollaboratorUnavailable(format!(
                "classifier API error: {}",
                status
            )));
        }

        let body: ChatResponse = response.json().await.map_err(|err| {
            AnalyzeError::CollaboratorMalformed(format!("classifier response parse failed: {}", err))
        })?;

        let content = body
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| {
                AnalyzeError::CollaboratorMalformed("classifier response missing choices".to_string())
            })?
            .message
            .content
            .trim()
            .to_string();

        Ok(content)
    }
}

impl TextClassifier for OpenAiClassifier {
    async fn classify_content(
        &self,
        texts: &[String],
    ) -> Result<ContentClassification, AnalyzeError> {
        let content = self.chat(content_prompt(), texts).await?;
        let payload: ContentPayload = parse_payload(&content)?;
        ContentClassification::validate(payload.content_performance, payload.topic_analysis)
    }

    async fn classify_emotions(
        &self,
        texts: &[String],
    ) -> Result<EmotionClassification, AnalyzeError> {
        let content = self.chat(emotion_prompt(), texts).await?;
        let payload: EmotionPayload = parse_payload(&content)?;
        EmotionClassification::validate(payload.emotion_analysis, payload.psychological_hooks)
    }
}

#[derive(Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f64,
}

#[derive(Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatMessageResponse,
}

#[derive(Deserialize)]
struct ChatMessageResponse {
    content: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ContentPayload {
    content_performance: Vec<CategoryBreakdown>,
    topic_analysis: Vec<CategoryBreakdown>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct EmotionPayload {
    emotion_analysis: Vec<CategoryBreakdown>,
    psychological_hooks: Vec<CategoryBreakdown>,
}

fn parse_payload<T: serde::de::DeserializeOwned>(content: &str) -> Result<T, AnalyzeError> {
    let json = extract_json(content).ok_or_else(|| {
        tracing::warn!(raw = content, "classifier answer carried no JSON object");
        AnalyzeError::CollaboratorMalformed("classifier answer carried no JSON object".to_string())
    })?;
    serde_json::from_str(&json).map_err(|err| {
        tracing::warn!(raw = content, error = %err, "classifier JSON did not match taxonomy schema");
        AnalyzeError::CollaboratorMalformed(format!("classifier JSON parse failed: {}", err))
    })
}

fn content_prompt() -> String {
    format!(
        r#"You are a strict JSON-only classifier for social media posts.
Given a JSON array of post texts, return a single JSON object:
- contentPerformance: array of {{label, count, avgEngagement}}, one entry per label, labels exactly: {}.
- topicAnalysis: array of {{label, count, avgEngagement}}, one entry per label, labels exactly: {}.
Rules:
- Output JSON only, no markdown or commentary.
- count is the number of posts assigned to the label; avgEngagement is the estimated mean engagement.
"#,
        CONTENT_TYPES.join(", "),
        TOPICS.join(", ")
    )
}

fn emotion_prompt() -> String {
    format!(
        r#"You are a strict JSON-only classifier for social media posts.
Given a JSON array of post texts, return a single JSON object:
- emotionAnalysis: array of {{label, count, avgEngagement}}, one entry per label, labels exactly: {}.
- psychologicalHooks: array of {{label, count, avgEngagement}}, one entry per label, labels exactly: {}.
Rules:
- Output JSON only, no markdown or commentary.
- count is the number of posts assigned to the label; avgEngagement is the estimated mean engagement.
"#,
        EMOTIONS.join(", "),
        HOOKS.join(", ")
    )
}

fn extract_json(text: &str) -> Option<String> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if start >= end {
        return None;
    }
    Some(text[start..=end].to_string())
}
