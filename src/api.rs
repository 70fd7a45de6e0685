use axum::http::StatusCode;
use serde::{Deserialize, Serialize};

use account_pulse::analysis::AnalysisReport;
use account_pulse::error::AnalyzeError;
use account_pulse::normalize::{normalize_batch, ProviderPost, ProviderProfile};
use account_pulse::{Post, Profile};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiAnalyzeRequest {
    #[serde(alias = "tweets")]
    pub posts: Vec<ProviderPost>,
    pub profile: ProviderProfile,
    pub openai_api_key: Option<String>,
    pub request_id: Option<String>,
}

impl ApiAnalyzeRequest {
    pub fn into_batch(self) -> Result<(Vec<Post>, Profile), AnalyzeError> {
        normalize_batch(self.posts, self.profile)
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiAnalyzeResponse {
    pub request_id: String,
    #[serde(flatten)]
    pub report: AnalysisReport,
}

/// Maps a run failure to a status code. The body carries only the
/// human-readable message; collaborator payloads stay in the logs.
pub fn error_status(err: &AnalyzeError) -> StatusCode {
    match err {
        AnalyzeError::InvalidInput(_) => StatusCode::BAD_REQUEST,
        AnalyzeError::CollaboratorUnavailable(_) | AnalyzeError::CollaboratorMalformed(_) => {
            StatusCode::BAD_GATEWAY
        }
    }
}
