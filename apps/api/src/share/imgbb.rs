//! Image hosting via the ImgBB upload API.

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

const IMGBB_UPLOAD_URL: &str = "https://api.imgbb.com/1/upload";
const UPLOAD_TIMEOUT_SECS: u64 = 60;

#[derive(Debug, Error)]
pub enum ImageHostError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{0}")]
    Rejected(String),

    #[error("ImgBB API did not return a valid image URL.")]
    MissingUrl,
}

/// Bytes in, public URL out.
#[async_trait]
pub trait ImageHost: Send + Sync {
    async fn upload(&self, bytes: &[u8]) -> Result<String, ImageHostError>;
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    data: Option<UploadData>,
}

#[derive(Debug, Deserialize)]
struct UploadData {
    url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct UploadError {
    error: Option<UploadErrorBody>,
}

#[derive(Debug, Deserialize)]
struct UploadErrorBody {
    message: Option<String>,
}

#[derive(Clone)]
pub struct ImgBbClient {
    client: Client,
    api_key: String,
    upload_url: String,
}

impl ImgBbClient {
    pub fn new(api_key: String) -> Result<Self, ImageHostError> {
        Self::with_upload_url(api_key, IMGBB_UPLOAD_URL.to_string())
    }

    /// Points the client at a different upload endpoint.
    pub fn with_upload_url(api_key: String, upload_url: String) -> Result<Self, ImageHostError> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(UPLOAD_TIMEOUT_SECS))
            .build()?;
        Ok(Self {
            client,
            api_key,
            upload_url,
        })
    }
}

#[async_trait]
impl ImageHost for ImgBbClient {
    async fn upload(&self, bytes: &[u8]) -> Result<String, ImageHostError> {
        let encoded = BASE64.encode(bytes);

        let response = self
            .client
            .post(&self.upload_url)
            .query(&[("key", self.api_key.as_str())])
            .form(&[("image", encoded.as_str())])
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(ImageHostError::Rejected(rejection_message(
                &body,
                status.canonical_reason().unwrap_or("unknown status"),
            )));
        }

        let url = serde_json::from_str::<UploadResponse>(&body)
            .ok()
            .and_then(|r| r.data)
            .and_then(|d| d.url)
            .filter(|u| !u.is_empty())
            .ok_or(ImageHostError::MissingUrl)?;

        debug!(url = %url, "Image hosted");
        Ok(url)
    }
}

/// ImgBB's `error.message` when present, otherwise a generic status message.
fn rejection_message(body: &str, reason: &str) -> String {
    serde_json::from_str::<UploadError>(body)
        .ok()
        .and_then(|e| e.error)
        .and_then(|e| e.message)
        .unwrap_or_else(|| format!("ImgBB API error: {reason}"))
}
