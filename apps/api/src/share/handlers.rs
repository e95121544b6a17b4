//! Axum route handlers for image upload and share links.

use axum::{
    extract::{Multipart, State},
    Json,
};
use chrono::Utc;
use reqwest::Url;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::errors::AppError;
use crate::state::AppState;

/// Largest accepted profile image.
pub const MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;
const IMAGE_FIELD: &str = "image";

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct UploadImageResponse {
    pub url: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct ShareRequest {
    pub name: Option<String>,
    pub headline: Option<String>,
    pub content: Option<String>,
    pub interests: Option<String>,
    pub skills: Option<String>,
    pub image_url: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ShareResponse {
    pub url: String,
    pub shortened: bool,
    pub notice: Option<String>,
}

// ────────────────────────────────────────────────────────────────────────────
// Share URL
// ────────────────────────────────────────────────────────────────────────────

/// Builds `<base>/profile.pdf?...` carrying the non-empty profile fields and a
/// cache-busting `ts`. Image URLs that are not http(s) are left out.
pub fn build_share_url(base: &Url, request: &ShareRequest, ts_millis: i64) -> Result<Url, AppError> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|_| AppError::Internal(anyhow::anyhow!("PUBLIC_BASE_URL cannot be a base URL")))?
        .pop_if_empty()
        .push("profile.pdf");
    url.set_query(None);

    let image_url = request
        .image_url
        .as_deref()
        .filter(|u| u.starts_with("http://") || u.starts_with("https://"));

    let params = [
        ("name", request.name.as_deref()),
        ("headline", request.headline.as_deref()),
        ("content", request.content.as_deref()),
        ("interests", request.interests.as_deref()),
        ("skills", request.skills.as_deref()),
        ("imageUrl", image_url),
    ];

    {
        let mut query = url.query_pairs_mut();
        for (key, value) in params {
            if let Some(value) = value.filter(|v| !v.is_empty()) {
                query.append_pair(key, value);
            }
        }
        query.append_pair("ts", &ts_millis.to_string());
    }

    Ok(url)
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/images
///
/// Accepts a multipart `image` field and re-hosts it, returning the public URL.
pub async fn handle_upload_image(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadImageResponse>, AppError> {
    let host = state.image_host.clone().ok_or_else(|| {
        AppError::ServiceUnavailable(
            "Image hosting is not configured. Set IMGBB_API_KEY to enable uploads.".to_string(),
        )
    })?;

    let mut image = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(e.body_text()))?
    {
        if field.name() == Some(IMAGE_FIELD) {
            let bytes = field
                .bytes()
                .await
                .map_err(|e| AppError::Validation(e.body_text()))?;
            image = Some(bytes);
            break;
        }
    }

    let bytes = image
        .filter(|b| !b.is_empty())
        .ok_or_else(|| AppError::Validation("Missing `image` file field".to_string()))?;
    if bytes.len() > MAX_IMAGE_BYTES {
        return Err(AppError::Validation(
            "Image size should not exceed 5MB.".to_string(),
        ));
    }

    let url = host.upload(&bytes).await?;
    info!(bytes = bytes.len(), "Uploaded profile image");

    Ok(Json(UploadImageResponse { url }))
}

/// POST /api/v1/share
///
/// Returns a link to the rendered PDF, shortened when a shortener is
/// configured. Shortener failures fall back to the long URL.
pub async fn handle_share(
    State(state): State<AppState>,
    Json(request): Json<ShareRequest>,
) -> Result<Json<ShareResponse>, AppError> {
    let long_url = build_share_url(
        &state.config.public_base_url,
        &request,
        Utc::now().timestamp_millis(),
    )?
    .to_string();

    let Some(shortener) = state.shortener.clone() else {
        return Ok(Json(ShareResponse {
            url: long_url,
            shortened: false,
            notice: Some(
                "Link shortening is not configured. The full link has been returned.".to_string(),
            ),
        }));
    };

    match shortener.shorten(&long_url).await {
        Ok(short) => Ok(Json(ShareResponse {
            url: short,
            shortened: true,
            notice: None,
        })),
        Err(e) => {
            warn!(error = %e, "Link shortening failed; returning the full link");
            Ok(Json(ShareResponse {
                url: long_url,
                shortened: false,
                notice: Some(format!(
                    "Could not shorten link: {e}. The full link has been returned."
                )),
            }))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::test_support::{test_state, StubImageHost, StubShortener};
    use axum::{
        body::Body,
        http::{header, Request, StatusCode},
    };
    use serde_json::{json, Value};
    use std::sync::Arc;
    use tower::ServiceExt;

    fn base() -> Url {
        Url::parse("https://profiles.example").unwrap()
    }

    async fn send(state: AppState, request: Request<Body>) -> (StatusCode, Value) {
        let response = crate::routes::build_router(state)
            .oneshot(request)
            .await
            .unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
    }

    fn share_request(body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/api/v1/share")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn multipart_request(field: &str, payload: &[u8]) -> Request<Body> {
        let boundary = "XBOUNDARYX";
        let mut body = Vec::new();
        body.extend_from_slice(
            format!(
                "--{boundary}\r\nContent-Disposition: form-data; name=\"{field}\"; filename=\"a.png\"\r\nContent-Type: image/png\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(payload);
        body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());

        Request::builder()
            .method("POST")
            .uri("/api/v1/images")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={boundary}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    #[test]
    fn test_share_url_keeps_only_present_fields() {
        let request = ShareRequest {
            name: Some("Alex Johnson".into()),
            headline: Some(String::new()),
            skills: Some("Rust, Go".into()),
            ..Default::default()
        };
        let url = build_share_url(&base(), &request, 1700000000000).unwrap();
        assert_eq!(url.path(), "/profile.pdf");

        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert_eq!(
            pairs,
            vec![
                ("name".to_string(), "Alex Johnson".to_string()),
                ("skills".to_string(), "Rust, Go".to_string()),
                ("ts".to_string(), "1700000000000".to_string()),
            ]
        );
    }

    #[test]
    fn test_share_url_drops_non_http_image() {
        let request = ShareRequest {
            image_url: Some("blob:http://localhost/123".into()),
            ..Default::default()
        };
        let url = build_share_url(&base(), &request, 1).unwrap();
        assert!(!url.as_str().contains("imageUrl"));

        let request = ShareRequest {
            image_url: Some("https://i.ibb.co/x.png".into()),
            ..Default::default()
        };
        let url = build_share_url(&base(), &request, 1).unwrap();
        assert!(url.query_pairs().any(|(k, v)| k == "imageUrl" && v == "https://i.ibb.co/x.png"));
    }

    #[test]
    fn test_share_url_respects_base_path() {
        let base = Url::parse("https://example.com/app/").unwrap();
        let url = build_share_url(&base, &ShareRequest::default(), 5).unwrap();
        assert_eq!(url.as_str(), "https://example.com/app/profile.pdf?ts=5");
    }

    #[tokio::test]
    async fn test_share_without_shortener_returns_long_url() {
        let (status, body) = send(test_state(), share_request(json!({"name": "Sam"}))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["shortened"], false);
        assert!(body["url"].as_str().unwrap().contains("/profile.pdf?name=Sam&ts="));
        assert!(body["notice"].is_string());
    }

    #[tokio::test]
    async fn test_share_shortens_when_available() {
        let mut state = test_state();
        state.shortener = Some(Arc::new(StubShortener::replying("https://bit.ly/x")));
        let (status, body) = send(state, share_request(json!({"name": "Sam"}))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["url"], "https://bit.ly/x");
        assert_eq!(body["shortened"], true);
        assert!(body["notice"].is_null());
    }

    #[tokio::test]
    async fn test_share_falls_back_on_shortener_failure() {
        let mut state = test_state();
        state.shortener = Some(Arc::new(StubShortener::failing("quota exceeded")));
        let (status, body) = send(state, share_request(json!({"name": "Sam"}))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["shortened"], false);
        assert!(body["url"].as_str().unwrap().contains("profile.pdf"));
        assert!(body["notice"].as_str().unwrap().contains("quota exceeded"));
    }

    #[tokio::test]
    async fn test_upload_without_host_is_503() {
        let (status, body) = send(test_state(), multipart_request("image", b"png")).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["error"]["code"], "SERVICE_UNAVAILABLE");
    }

    #[tokio::test]
    async fn test_upload_returns_hosted_url() {
        let mut state = test_state();
        state.image_host = Some(Arc::new(StubImageHost::replying("https://i.ibb.co/y.png")));
        let (status, body) = send(state, multipart_request("image", b"\x89PNG....")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["url"], "https://i.ibb.co/y.png");
    }

    #[tokio::test]
    async fn test_upload_missing_field_is_400() {
        let mut state = test_state();
        state.image_host = Some(Arc::new(StubImageHost::replying("unused")));
        let (status, _) = send(state, multipart_request("avatar", b"data")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_upload_too_large_is_400() {
        let mut state = test_state();
        state.image_host = Some(Arc::new(StubImageHost::replying("unused")));
        let payload = vec![0u8; MAX_IMAGE_BYTES + 1];
        let (status, body) = send(state, multipart_request("image", &payload)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["message"], "Image size should not exceed 5MB.");
    }

    #[tokio::test]
    async fn test_upload_host_failure_is_502() {
        let mut state = test_state();
        state.image_host = Some(Arc::new(StubImageHost::failing("Invalid API v1 key.")));
        let (status, body) = send(state, multipart_request("image", b"data")).await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body["error"]["message"], "Invalid API v1 key.");
    }
}
