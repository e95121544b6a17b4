//! Axum route handler for the PDF rendering endpoint.

use axum::{
    extract::{Query, State},
    http::header,
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use tracing::{error, info, info_span, Instrument};
use uuid::Uuid;

use crate::errors::AppError;
use crate::layout::ProfileDocument;
use crate::render::image::load_profile_image;
use crate::render::build_profile_pdf;
use crate::state::AppState;

/// Query string accepted by `GET /profile.pdf`. Every field is optional.
#[derive(Debug, Default, Deserialize)]
pub struct ProfilePdfQuery {
    pub name: Option<String>,
    pub headline: Option<String>,
    pub content: Option<String>,
    pub interests: Option<String>,
    pub skills: Option<String>,
    #[serde(rename = "imageUrl")]
    pub image_url: Option<String>,
    /// Cache-buster appended by share links. Ignored.
    #[allow(dead_code)]
    pub ts: Option<String>,
}

impl ProfilePdfQuery {
    pub fn into_document(self) -> ProfileDocument {
        ProfileDocument::from_fields(
            self.name.as_deref(),
            self.headline.as_deref(),
            self.content.as_deref(),
            self.interests.as_deref(),
            self.skills.as_deref(),
            self.image_url.as_deref(),
        )
    }
}

/// `profile-<slug>.pdf`, where the slug is the lowercased name with every
/// non-alphanumeric ASCII character replaced by `_`.
pub fn disposition_filename(name: &str) -> String {
    let slug: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                '_'
            }
        })
        .collect();
    let slug = if slug.is_empty() { "unnamed".to_string() } else { slug };
    format!("profile-{slug}.pdf")
}

/// GET /profile.pdf
///
/// Renders the profile described by the query string as a single-page PDF.
pub async fn handle_profile_pdf(
    State(state): State<AppState>,
    Query(query): Query<ProfilePdfQuery>,
) -> Result<Response, AppError> {
    let filename = disposition_filename(query.name.as_deref().unwrap_or_default());
    let doc = query.into_document();
    let render_id = Uuid::new_v4();

    async move {
        let image = match doc.image_ref.as_deref() {
            Some(url) => load_profile_image(state.images.as_ref(), url).await,
            None => None,
        };

        let page = state.page;
        let rendered = tokio::task::spawn_blocking(move || {
            build_profile_pdf(&doc, image.as_ref(), &page)
        })
        .await
        .map_err(|e| {
            error!("PDF render task failed: {e}");
            AppError::PdfRender
        })?
        .map_err(|e| {
            error!("PDF render failed: {e}");
            AppError::PdfRender
        })?;

        info!(
            bytes = rendered.bytes.len(),
            truncated = rendered.outcome.truncated,
            image = rendered.outcome.image_placed,
            "Rendered profile PDF"
        );

        Ok::<_, AppError>((
            [
                (header::CONTENT_TYPE, "application/pdf".to_string()),
                (
                    header::CONTENT_DISPOSITION,
                    format!("inline; filename=\"{filename}\""),
                ),
            ],
            rendered.bytes,
        )
            .into_response())
    }
    .instrument(info_span!("render_profile", %render_id))
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{render_profile, ImagePlacement, Painter, Rule, TextRun};
    use crate::render::image::tests::png_bytes;
    use crate::render::image::{decode_image, ImageKind};
    use crate::state::test_support::{test_state, StubImages};
    use axum::{body::Body, http::Request, http::StatusCode};
    use tower::ServiceExt;

    #[test]
    fn test_filename_slug() {
        assert_eq!(disposition_filename("Alex Johnson!"), "profile-alex_johnson_.pdf");
        assert_eq!(disposition_filename("Zoë"), "profile-zo_.pdf");
    }

    #[test]
    fn test_filename_falls_back_when_empty() {
        assert_eq!(disposition_filename(""), "profile-unnamed.pdf");
    }

    #[test]
    fn test_query_maps_to_document() {
        let query = ProfilePdfQuery {
            name: Some("Sam".into()),
            interests: Some("a, b ,c".into()),
            image_url: Some(" ".into()),
            ..Default::default()
        };
        let doc = query.into_document();
        assert_eq!(doc.name, "Sam");
        assert_eq!(
            doc.interests,
            Some(vec!["a".to_string(), "b".to_string(), "c".to_string()])
        );
        assert_eq!(doc.image_ref, None);
    }

    #[tokio::test]
    async fn test_profile_pdf_headers() {
        let app = crate::routes::build_router(test_state());
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/profile.pdf?name=Alex%20Johnson!&headline=Engineer&skills=Rust,%20Go&ts=1")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "application/pdf"
        );
        assert_eq!(
            response.headers()[header::CONTENT_DISPOSITION],
            "inline; filename=\"profile-alex_johnson_.pdf\""
        );

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert!(body.starts_with(b"%PDF-"));
    }

    #[tokio::test]
    async fn test_missing_name_renders_placeholder() {
        let app = crate::routes::build_router(test_state());
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/profile.pdf")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_DISPOSITION],
            "inline; filename=\"profile-unnamed.pdf\""
        );
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let needle = b"N/A - Profile";
        assert!(body.windows(needle.len()).any(|w| w == needle));
    }

    #[tokio::test]
    async fn test_failed_image_still_renders() {
        let mut state = test_state();
        state.images = std::sync::Arc::new(StubImages::failing(404));
        let app = crate::routes::build_router(state);
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/profile.pdf?name=Sam&imageUrl=https%3A%2F%2Fi.example%2Fgone.png")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let needle = b"/XObject";
        assert!(!body.windows(needle.len()).any(|w| w == needle));
    }

    #[derive(Default)]
    struct TextLog(Vec<TextRun>);

    impl Painter for TextLog {
        fn draw_text(&mut self, run: &TextRun) {
            self.0.push(run.clone());
        }
        fn draw_rule(&mut self, _rule: &Rule) {}
        fn draw_image(&mut self, _placement: &ImagePlacement) {}
    }

    #[tokio::test]
    async fn test_failed_image_leaves_name_at_top_margin() {
        let state = test_state();
        let doc = ProfilePdfQuery {
            name: Some("Sam".into()),
            image_url: Some("https://i.example/gone.png".into()),
            ..Default::default()
        }
        .into_document();

        // Same path the handler takes: the fetch fails and the render gets no image
        let url = doc.image_ref.as_deref().unwrap();
        let image = load_profile_image(state.images.as_ref(), url).await;
        assert!(image.is_none());

        let rendered = build_profile_pdf(&doc, image.as_ref(), &state.page).unwrap();
        assert!(!rendered.outcome.image_placed);

        let mut log = TextLog::default();
        let replay = render_profile(&doc, None, &state.page, &mut log);
        assert_eq!(replay, rendered.outcome);
        assert_eq!(log.0[0].text, "Sam");
        assert_eq!(log.0[0].y, state.page.top());

        // A placed image would have pushed everything down
        let placed = decode_image(ImageKind::Png, &png_bytes(40, 40, false)).unwrap();
        let with_image = build_profile_pdf(&doc, Some(&placed), &state.page).unwrap();
        assert!(with_image.outcome.image_placed);
        assert!(with_image.outcome.end_y < rendered.outcome.end_y);
    }
}
