mod config;
mod errors;
mod generation;
mod layout;
mod llm_client;
mod render;
mod routes;
mod share;
mod state;

use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::layout::PageGeometry;
use crate::llm_client::LlmClient;
use crate::render::HttpImageFetcher;
use crate::routes::build_router;
use crate::share::{BitlyClient, ImageHost, ImgBbClient, LinkShortener};
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={},tower_http={}",
                env!("CARGO_CRATE_NAME"),
                &config.rust_log,
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Profile API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize LLM client
    let llm = LlmClient::new(config.anthropic_api_key.clone(), config.llm_model.clone())
        .context("Failed to build LLM client")?;
    info!("LLM client initialized (model: {})", llm.model());

    let images = HttpImageFetcher::new().context("Failed to build image fetcher")?;

    let image_host: Option<Arc<dyn ImageHost>> = match &config.imgbb_api_key {
        Some(key) => Some(Arc::new(
            ImgBbClient::new(key.clone()).context("Failed to build ImgBB client")?,
        )),
        None => {
            warn!("IMGBB_API_KEY not set; image uploads are disabled");
            None
        }
    };

    let shortener: Option<Arc<dyn LinkShortener>> = match &config.bitly_access_token {
        Some(token) => Some(Arc::new(
            BitlyClient::new(token.clone()).context("Failed to build Bitly client")?,
        )),
        None => {
            warn!("BITLY_ACCESS_TOKEN not set; share links will not be shortened");
            None
        }
    };

    let page = PageGeometry::a4();
    info!(
        "Page geometry: {}x{}pt, content width {}pt",
        page.width,
        page.height,
        page.content_width()
    );
    info!("Share links point at {}", config.public_base_url);

    // Build app state
    let state = AppState {
        config: config.clone(),
        llm: Arc::new(llm),
        images: Arc::new(images),
        image_host,
        shortener,
        page,
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
