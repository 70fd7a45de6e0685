use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{
        sse::{Event, KeepAlive, Sse},
        IntoResponse,
    },
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use std::{
    collections::HashMap,
    net::SocketAddr,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    },
    time::{Duration, SystemTime, UNIX_EPOCH},
};
use tokio::sync::{broadcast, Mutex};
use tokio_stream::{wrappers::BroadcastStream, StreamExt};
use tower_http::services::{ServeDir, ServeFile};

use crate::api::{error_status, ApiAnalyzeRequest, ApiAnalyzeResponse};
use account_pulse::analysis;
use account_pulse::config::AnalyzerConfig;
use account_pulse::openai::OpenAiClassifier;

#[derive(Clone)]
struct AppState {
    classifier: Option<OpenAiClassifier>,
    config: AnalyzerConfig,
    channels: Arc<Mutex<HashMap<String, broadcast::Sender<StreamEvent>>>>,
}

#[derive(Clone, Serialize)]
struct StreamEvent {
    event: String,
    message: String,
    timestamp_ms: u128,
}

#[derive(serde::Deserialize)]
struct StreamQuery {
    request_id: String,
}

static REQUEST_COUNTER: AtomicUsize = AtomicUsize::new(0);

pub async fn serve(args: crate::ServeArgs) -> Result<(), String> {
    let (config, _) = AnalyzerConfig::load(args.config.clone())?;
    let classifier = match OpenAiClassifier::from_env(&config.classifier, None) {
        Some(result) => Some(result.map_err(|err| err.to_string())?),
        None => None,
    };

    let state = AppState {
        classifier,
        config,
        channels: Arc::new(Mutex::new(HashMap::new())),
    };

    let web_root = args.web_root;
    let index_path = format!("{}/index.html", web_root.trim_end_matches('/'));
    let static_service = ServeDir::new(web_root).not_found_service(ServeFile::new(index_path));

    let app = Router::new()
        .route("/api/health", get(health))
        .route("/api/analyze", post(analyze_handler))
        .route("/api/analyze/stream", get(stream_handler))
        .nest_service("/", static_service)
        .with_state(state);

    let addr: SocketAddr = format!("{}:{}", args.host, args.port)
        .parse()
        .map_err(|err| format!("invalid bind address: {}", err))?;

    tracing::info!(%addr, "listening");
    axum::serve(
        tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|err| format!("failed to bind server: {}", err))?,
        app,
    )
    .await
    .map_err(|err| format!("server error: {}", err))?;

    Ok(())
}

async fn health() -> impl IntoResponse {
    StatusCode::OK
}

async fn analyze_handler(
    State(state): State<AppState>,
    Json(request): Json<ApiAnalyzeRequest>,
) -> Result<Json<ApiAnalyzeResponse>, (StatusCode, String)> {
    let request_id = request
        .request_id
        .clone()
        .unwrap_or_else(generate_request_id);
    let api_key = request.openai_api_key.clone();

    let classifier = match api_key {
        Some(key) => OpenAiClassifier::new(&state.config.classifier, key)
            .map_err(|err| (error_status(&err), err.to_string()))?,
        None => state.classifier.clone().ok_or_else(|| {
            (
                StatusCode::BAD_REQUEST,
                "openaiApiKey is required: no server-side key is configured".to_string(),
            )
        })?,
    };

    let channel = get_or_create_channel(&state, &request_id).await;
    send_event(&channel, "start", "Normalizing capture");

    let (posts, profile) = request.into_batch().map_err(|err| {
        send_event(&channel, "error", "Capture failed validation");
        schedule_cleanup(state.channels.clone(), request_id.clone());
        (error_status(&err), err.to_string())
    })?;

    send_event(&channel, "classifying", "Running extractors and classifiers");
    let result = analysis::run(&posts, &profile, &classifier, &state.config).await;
    let report = match result {
        Ok(report) => {
            send_event(&channel, "done", "Analysis complete");
            report
        }
        Err(err) => {
            tracing::warn!(request_id = %request_id, error = %err, "analysis run failed");
            send_event(&channel, "error", "Analysis failed");
            schedule_cleanup(state.channels.clone(), request_id.clone());
            return Err((error_status(&err), err.to_string()));
        }
    };
    schedule_cleanup(state.channels.clone(), request_id.clone());

    Ok(Json(ApiAnalyzeResponse { request_id, report }))
}

async fn stream_handler(
    State(state): State<AppState>,
    Query(query): Query<StreamQuery>,
) -> Result<Sse<impl tokio_stream::Stream<Item = Result<Event, std::convert::Infallible>>>, StatusCode>
{
    let sender = get_or_create_channel(&state, &query.request_id).await;
    let receiver = sender.subscribe();
    let stream = BroadcastStream::new(receiver).filter_map(|event| match event {
        Ok(event) => {
            let data = serde_json::to_string(&event).unwrap_or_default();
            Some(Ok(Event::default().data(data)))
        }
        Err(_) => None,
    });

    send_event(&sender, "connected", "Streaming analysis status");
    Ok(Sse::new(stream).keep_alive(KeepAlive::new().interval(Duration::from_secs(8))))
}

async fn get_or_create_channel(
    state: &AppState,
    request_id: &str,
) -> broadcast::Sender<StreamEvent> {
    let mut guard = state.channels.lock().await;
    if let Some(sender) = guard.get(request_id) {
        return sender.clone();
    }
    let (sender, _) = broadcast::channel(32);
    guard.insert(request_id.to_string(), sender.clone());
    sender
}

fn send_event(sender: &broadcast::Sender<StreamEvent>, event: &str, message: &str) {
    let _ = sender.send(StreamEvent {
        event: event.to_string(),
        message: message.to_string(),
        timestamp_ms: now_ms(),
    });
}

fn schedule_cleanup(
    channels: Arc<Mutex<HashMap<String, broadcast::Sender<StreamEvent>>>>,
    request_id: String,
) {
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_secs(10)).await;
        let mut guard = channels.lock().await;
        guard.remove(&request_id);
    });
}

fn generate_request_id() -> String {
    let counter = REQUEST_COUNTER.fetch_add(1, Ordering::Relaxed);
    format!("req-{}-{}", now_ms(), counter)
}

fn now_ms() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|duration| duration.as_millis())
        .unwrap_or(0)
}
