//! Axum route handlers for the profile text API.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::generation::profile::{generate_profile, summarize_profile, SummaryLength};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct GenerateProfileRequest {
    pub prompt: String,
}

#[derive(Debug, Serialize)]
pub struct GenerateProfileResponse {
    pub profile: String,
}

#[derive(Debug, Deserialize)]
pub struct SummarizeProfileRequest {
    pub profile: String,
    #[serde(default)]
    pub length: SummaryLength,
}

#[derive(Debug, Serialize)]
pub struct SummarizeProfileResponse {
    pub summary: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/profile/generate
pub async fn handle_generate_profile(
    State(state): State<AppState>,
    Json(request): Json<GenerateProfileRequest>,
) -> Result<Json<GenerateProfileResponse>, AppError> {
    let profile = generate_profile(&request.prompt, state.llm.as_ref()).await?;
    Ok(Json(GenerateProfileResponse { profile }))
}

/// POST /api/v1/profile/summarize
pub async fn handle_summarize_profile(
    State(state): State<AppState>,
    Json(request): Json<SummarizeProfileRequest>,
) -> Result<Json<SummarizeProfileResponse>, AppError> {
    let summary = summarize_profile(&request.profile, request.length, state.llm.as_ref()).await?;
    Ok(Json(SummarizeProfileResponse { summary }))
}

#[cfg(test)]
mod tests {
    use crate::state::test_support::{test_state, StubLlm};
    use axum::{
        body::Body,
        http::{header, Request, StatusCode},
    };
    use serde_json::{json, Value};
    use std::sync::Arc;
    use tower::ServiceExt;

    async fn post_json(state: crate::state::AppState, uri: &str, body: Value) -> (StatusCode, Value) {
        let response = crate::routes::build_router(state)
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(uri)
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_generate_returns_profile() {
        let mut state = test_state();
        state.llm = Arc::new(StubLlm::replying("Hi, I'm Sam."));
        let (status, body) =
            post_json(state, "/api/v1/profile/generate", json!({"prompt": "Sam, baker"})).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["profile"], "Hi, I'm Sam.");
    }

    #[tokio::test]
    async fn test_generate_empty_prompt_is_400() {
        let (status, body) =
            post_json(test_state(), "/api/v1/profile/generate", json!({"prompt": ""})).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["message"], "Please enter a prompt for the AI.");
    }

    #[tokio::test]
    async fn test_generate_llm_failure_is_502() {
        let mut state = test_state();
        state.llm = Arc::new(StubLlm::failing());
        let (status, body) =
            post_json(state, "/api/v1/profile/generate", json!({"prompt": "x"})).await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body["error"]["code"], "LLM_ERROR");
    }

    #[tokio::test]
    async fn test_summarize_defaults_to_medium() {
        let llm = Arc::new(StubLlm::replying("Summary."));
        let mut state = test_state();
        state.llm = llm.clone();
        let (status, body) =
            post_json(state, "/api/v1/profile/summarize", json!({"profile": "Long text."})).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["summary"], "Summary.");
        assert!(llm.last_prompt().unwrap().contains("tailored to be medium:"));
    }
}
