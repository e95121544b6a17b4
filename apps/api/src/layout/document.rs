//! Inputs to a single render: the profile fields and the page geometry.

use thiserror::Error;

/// Rendered in place of a missing name.
pub const NAME_PLACEHOLDER: &str = "N/A";

/// The profile fields that make up one document. Built per request, never stored.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfileDocument {
    pub name: String,
    pub headline: Option<String>,
    pub body: Option<String>,
    pub interests: Option<Vec<String>>,
    pub skills: Option<Vec<String>>,
    pub image_ref: Option<String>,
}

impl ProfileDocument {
    /// Builds a document from raw form values.
    ///
    /// Only absent or empty fields are dropped; whitespace is content. List
    /// fields are split on commas with every item kept, empty ones included.
    /// A missing name becomes [`NAME_PLACEHOLDER`].
    pub fn from_fields(
        name: Option<&str>,
        headline: Option<&str>,
        body: Option<&str>,
        interests: Option<&str>,
        skills: Option<&str>,
        image_ref: Option<&str>,
    ) -> Self {
        Self {
            name: present(name).unwrap_or_else(|| NAME_PLACEHOLDER.to_string()),
            headline: present(headline),
            body: present(body),
            interests: present(interests).as_deref().map(split_list),
            skills: present(skills).as_deref().map(split_list),
            image_ref: image_ref
                .map(str::trim)
                .filter(|url| !url.is_empty())
                .map(str::to_string),
        }
    }
}

fn present(value: Option<&str>) -> Option<String> {
    value.filter(|v| !v.is_empty()).map(str::to_string)
}

/// Splits a comma-separated list and trims each item. Empty items are kept.
pub fn split_list(raw: &str) -> Vec<String> {
    raw.split(',').map(|item| item.trim().to_string()).collect()
}

// ────────────────────────────────────────────────────────────────────────────
// Page geometry
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Error, PartialEq)]
pub enum GeometryError {
    #[error("content width must be positive (left margin {left}, right margin {right})")]
    NoContentWidth { left: f32, right: f32 },

    #[error("page floor {floor} is above the first baseline {top}")]
    NoContentHeight { floor: f32, top: f32 },
}

/// Page size and margins in PDF points. `right_margin` is an absolute x coordinate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageGeometry {
    pub width: f32,
    pub height: f32,
    pub left_margin: f32,
    pub right_margin: f32,
    pub top_inset: f32,
    pub bottom_margin: f32,
}

impl PageGeometry {
    pub fn new(
        width: f32,
        height: f32,
        left_margin: f32,
        right_margin: f32,
        top_inset: f32,
        bottom_margin: f32,
    ) -> Result<Self, GeometryError> {
        if right_margin - left_margin <= 0.0 {
            return Err(GeometryError::NoContentWidth {
                left: left_margin,
                right: right_margin,
            });
        }
        if bottom_margin > height - top_inset {
            return Err(GeometryError::NoContentHeight {
                floor: bottom_margin,
                top: height - top_inset,
            });
        }
        Ok(Self {
            width,
            height,
            left_margin,
            right_margin,
            top_inset,
            bottom_margin,
        })
    }

    /// A4 portrait with 50pt margins on every side.
    pub fn a4() -> Self {
        const WIDTH: f32 = 595.28;
        const HEIGHT: f32 = 841.89;
        const MARGIN: f32 = 50.0;
        Self {
            width: WIDTH,
            height: HEIGHT,
            left_margin: MARGIN,
            right_margin: WIDTH - MARGIN,
            top_inset: MARGIN,
            bottom_margin: MARGIN,
        }
    }

    pub fn content_width(&self) -> f32 {
        self.right_margin - self.left_margin
    }

    /// Baseline of the first block on the page.
    pub fn top(&self) -> f32 {
        self.height - self.top_inset
    }
}

impl Default for PageGeometry {
    fn default() -> Self {
        Self::a4()
    }
}
