use anyhow::{bail, Context, Result};
use reqwest::Url;

use crate::llm_client::DEFAULT_MODEL;

/// Application configuration loaded from environment variables.
/// Startup fails if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub anthropic_api_key: String,
    pub llm_model: String,
    /// Enables `POST /api/v1/images` when set.
    pub imgbb_api_key: Option<String>,
    /// Enables link shortening for share links when set.
    pub bitly_access_token: Option<String>,
    /// Origin that share links point back to.
    pub public_base_url: Url,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let port = std::env::var("PORT")
            .unwrap_or_else(|_| "8080".to_string())
            .parse::<u16>()
            .context("PORT must be a valid port number")?;

        let public_base_url = optional_env("PUBLIC_BASE_URL")
            .unwrap_or_else(|| format!("http://localhost:{port}"));

        Ok(Config {
            anthropic_api_key: require_env("ANTHROPIC_API_KEY")?,
            llm_model: optional_env("LLM_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            imgbb_api_key: optional_env("IMGBB_API_KEY"),
            bitly_access_token: optional_env("BITLY_ACCESS_TOKEN"),
            public_base_url: parse_base_url(&public_base_url)?,
            port,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

/// Unset and blank both read as `None`.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_base_url(raw: &str) -> Result<Url> {
    let url = Url::parse(raw).with_context(|| format!("PUBLIC_BASE_URL '{raw}' is not a valid URL"))?;
    if url.cannot_be_a_base() {
        bail!("PUBLIC_BASE_URL '{raw}' cannot be used as a base URL");
    }
    Ok(url)
}
