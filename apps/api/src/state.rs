use std::sync::Arc;

use crate::config::Config;
use crate::layout::PageGeometry;
use crate::llm_client::CompletionService;
use crate::render::ImageFetcher;
use crate::share::{ImageHost, LinkShortener};

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub llm: Arc<dyn CompletionService>,
    /// Fetches the profile image referenced by a render request.
    pub images: Arc<dyn ImageFetcher>,
    /// `None` when `IMGBB_API_KEY` is unset; uploads then answer 503.
    pub image_host: Option<Arc<dyn ImageHost>>,
    /// `None` when `BITLY_ACCESS_TOKEN` is unset; share links stay long.
    pub shortener: Option<Arc<dyn LinkShortener>>,
    pub page: PageGeometry,
}
