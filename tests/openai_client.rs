//! Integration tests for `OpenAiClassifier` using wiremock HTTP mocks.

use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use account_pulse::classify::{TextClassifier, CONTENT_TYPES, EMOTIONS, HOOKS, TOPICS};
use account_pulse::config::ClassifierConfig;
use account_pulse::error::AnalyzeError;
use account_pulse::openai::OpenAiClassifier;

fn test_client(base_url: &str) -> OpenAiClassifier {
    let config = ClassifierConfig {
        api_base: base_url.to_string(),
        model: "test-model".to_string(),
        timeout_ms: 5_000,
    };
    OpenAiClassifier::new(&config, "test-key".to_string())
        .expect("client construction should not fail")
}

fn breakdown_array(labels: &[&str]) -> serde_json::Value {
    let items: Vec<serde_json::Value> = labels
        .iter()
        .enumerate()
        .map(|(index, label)| {
            serde_json::json!({
                "label": label,
                "count": (index + 1) * 5,
                "avgEngagement": 1000.0 + index as f64
            })
        })
        .collect();
    serde_json::Value::Array(items)
}

fn chat_body(content: &str) -> serde_json::Value {
    serde_json::json!({
        "choices": [{"message": {"content": content}}]
    })
}

#[tokio::test]
async fn classify_content_parses_a_valid_answer() {
    let server = MockServer::start().await;

    let answer = serde_json::json!({
        "contentPerformance": breakdown_array(&CONTENT_TYPES),
        "topicAnalysis": breakdown_array(&TOPICS)
    })
    .to_string();

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("authorization", "Bearer test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(chat_body(&answer)))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let texts = vec!["a post".to_string()];
    let result = client
        .classify_content(&texts)
        .await
        .expect("valid answer should parse");

    assert_eq!(result.content_performance.len(), CONTENT_TYPES.len());
    assert_eq!(result.content_performance[0].label, "Text-only");
    assert_eq!(result.topic_analysis[4].label, "Other");
}

#[tokio::test]
async fn classify_emotions_parses_a_valid_answer() {
    let server = MockServer::start().await;

    // Markdown fences around the JSON object still parse.
    let answer = format!(
        "```json\n{}\n```",
        serde_json::json!({
            "emotionAnalysis": breakdown_array(&EMOTIONS),
            "psychologicalHooks": breakdown_array(&HOOKS)
        })
    );

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(chat_body(&answer)))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let texts = vec!["a post".to_string()];
    let result = client
        .classify_emotions(&texts)
        .await
        .expect("valid answer should parse");

    assert_eq!(result.emotion_analysis[0].label, "Humor");
    assert_eq!(result.psychological_hooks.len(), HOOKS.len());
}

#[tokio::test]
async fn server_error_maps_to_collaborator_unavailable() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let texts = vec!["a post".to_string()];
    let result = client.classify_content(&texts).await;

    assert!(matches!(
        result,
        Err(AnalyzeError::CollaboratorUnavailable(_))
    ));
}

#[tokio::test]
async fn non_json_answer_maps_to_collaborator_malformed() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(chat_body("no json here")))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let texts = vec!["a post".to_string()];
    let result = client.classify_content(&texts).await;

    assert!(matches!(
        result,
        Err(AnalyzeError::CollaboratorMalformed(_))
    ));
}

#[tokio::test]
async fn wrong_taxonomy_maps_to_collaborator_malformed() {
    let server = MockServer::start().await;

    let answer = serde_json::json!({
        "contentPerformance": breakdown_array(&["Haiku", "Limerick", "Sonnet", "Ode", "Epic"]),
        "topicAnalysis": breakdown_array(&TOPICS)
    })
    .to_string();

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(chat_body(&answer)))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let texts = vec!["a post".to_string()];
    let result = client.classify_content(&texts).await;

    assert!(matches!(
        result,
        Err(AnalyzeError::CollaboratorMalformed(_))
    ));
}
