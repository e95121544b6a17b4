pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::generation::handlers as generation;
use crate::render::handlers as render;
use crate::share::handlers as share;
use crate::state::AppState;

/// Multipart framing allowance on top of the image size cap, so oversized
/// images reach the handler's own size check.
const UPLOAD_BODY_LIMIT: usize = share::MAX_IMAGE_BYTES + 1024 * 1024;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/profile.pdf", get(render::handle_profile_pdf))
        // Profile text API
        .route(
            "/api/v1/profile/generate",
            post(generation::handle_generate_profile),
        )
        .route(
            "/api/v1/profile/summarize",
            post(generation::handle_summarize_profile),
        )
        // Sharing API
        .route(
            "/api/v1/images",
            post(share::handle_upload_image).layer(DefaultBodyLimit::max(UPLOAD_BODY_LIMIT)),
        )
        .route("/api/v1/share", post(share::handle_share))
        .with_state(state)
}
