//! Link shortening via the Bitly v4 API.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;

const BITLY_SHORTEN_URL: &str = "https://api-ssl.bitly.com/v4/shorten";
const SHORTEN_TIMEOUT_SECS: u64 = 15;

#[derive(Debug, Error)]
pub enum ShortenError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{0}")]
    Rejected(String),

    #[error("shortener response had no link")]
    MissingLink,
}

/// Long URL in, short URL out.
#[async_trait]
pub trait LinkShortener: Send + Sync {
    async fn shorten(&self, long_url: &str) -> Result<String, ShortenError>;
}

#[derive(Debug, Serialize)]
struct ShortenRequest<'a> {
    long_url: &'a str,
}

#[derive(Debug, Deserialize)]
struct ShortenResponse {
    link: Option<String>,
}

#[derive(Debug, Deserialize)]
struct BitlyError {
    description: Option<String>,
    message: Option<String>,
}

#[derive(Clone)]
pub struct BitlyClient {
    client: Client,
    access_token: String,
    endpoint: String,
}

impl BitlyClient {
    pub fn new(access_token: String) -> Result<Self, ShortenError> {
        Self::with_endpoint(access_token, BITLY_SHORTEN_URL.to_string())
    }

    pub fn with_endpoint(access_token: String, endpoint: String) -> Result<Self, ShortenError> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(SHORTEN_TIMEOUT_SECS))
            .build()?;
        Ok(Self {
            client,
            access_token,
            endpoint,
        })
    }
}

#[async_trait]
impl LinkShortener for BitlyClient {
    async fn shorten(&self, long_url: &str) -> Result<String, ShortenError> {
        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.access_token)
            .json(&ShortenRequest { long_url })
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<BitlyError>(&body)
                .ok()
                .and_then(|e| e.description.or(e.message))
                .unwrap_or_else(|| {
                    format!(
                        "Bitly API error: {}",
                        status.canonical_reason().unwrap_or("unknown status")
                    )
                });
            return Err(ShortenError::Rejected(message));
        }

        serde_json::from_str::<ShortenResponse>(&body)
            .ok()
            .and_then(|r| r.link)
            .filter(|l| !l.is_empty())
            .ok_or(ShortenError::MissingLink)
    }
}
