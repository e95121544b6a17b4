//! Section renderer: lays out a whole profile page in a fixed block order.
//!
//! image → name → headline → rule → About Me → Interests → Skills
//!
//! Blocks with no source content are skipped outright, so later blocks move up
//! instead of leaving a gap. Every draw goes through the same floor check; once
//! the cursor drops below the page floor nothing else is drawn.

use tracing::warn;

use crate::layout::document::{PageGeometry, ProfileDocument};
use crate::layout::flow::{
    layout_lines, Cursor, ImagePlacement, Painter, Rgb, Rule, TextRun, TextStyle, BASE_LINE_HEIGHT,
};
use crate::layout::font_metrics::{measure_text, FontHandle};
use crate::layout::wrap::wrap_text;

pub const SECTION_SPACING: f32 = 20.0;
/// Gap between a section label and its first body line.
pub const LABEL_ADVANCE: f32 = BASE_LINE_HEIGHT * 1.2;
/// Bounding box the profile image is scaled into.
pub const IMAGE_MAX_WIDTH: f32 = 150.0;
pub const IMAGE_MAX_HEIGHT: f32 = 150.0;
/// Space between the bottom of the image and the name baseline.
pub const IMAGE_SPACING: f32 = 30.0;

pub const BULLET: &str = "•";

const NAME_STYLE: TextStyle = TextStyle::new(FontHandle::Bold, 24.0, Rgb::grey(0.1));
const HEADLINE_STYLE: TextStyle = TextStyle::new(FontHandle::Regular, 16.0, Rgb::grey(0.3));
const LABEL_STYLE: TextStyle = TextStyle::new(FontHandle::Bold, 14.0, Rgb::grey(0.2));
const BODY_STYLE: TextStyle = TextStyle::new(FontHandle::Regular, 11.0, Rgb::grey(0.2));
const RULE_THICKNESS: f32 = 0.5;
const RULE_COLOR: Rgb = Rgb::grey(0.7);

/// What a render did, for logging and tests.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderOutcome {
    pub end_y: f32,
    pub truncated: bool,
    pub image_placed: bool,
}

/// Joins list items into one bullet per hard line, ready for [`wrap_text`].
pub fn bullet_lines(items: &[String]) -> String {
    items
        .iter()
        .map(|item| format!("{BULLET} {}", item.trim()))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Scales an image of `pixel_width` × `pixel_height` into the image box,
/// preserving aspect ratio and never exceeding the content width.
///
/// Returns `None` for degenerate images.
pub fn fit_image(pixel_width: f32, pixel_height: f32, page: &PageGeometry) -> Option<(f32, f32)> {
    if pixel_width <= 0.0 || pixel_height <= 0.0 {
        return None;
    }
    let max_width = IMAGE_MAX_WIDTH.min(page.content_width());
    let scale = (max_width / pixel_width).min(IMAGE_MAX_HEIGHT / pixel_height);
    Some((pixel_width * scale, pixel_height * scale))
}

/// Lays out `doc` onto `painter`.
///
/// `image_size` is the intrinsic size of the already-fetched profile image, if any.
pub fn render_profile<P: Painter>(
    doc: &ProfileDocument,
    image_size: Option<(f32, f32)>,
    page: &PageGeometry,
    painter: &mut P,
) -> RenderOutcome {
    let mut renderer = SectionRenderer {
        page,
        painter,
        cursor: Cursor::new(page.top(), page.bottom_margin),
        truncated: false,
    };

    let image_placed = image_size
        .and_then(|(w, h)| fit_image(w, h, page))
        .map(|(w, h)| renderer.image(w, h))
        .unwrap_or(false);

    renderer.text_block(&doc.name, &NAME_STYLE);
    renderer.space(SECTION_SPACING / 2.0);

    if let Some(headline) = &doc.headline {
        renderer.text_block(headline, &HEADLINE_STYLE);
        renderer.space(SECTION_SPACING);
    }

    renderer.rule();
    renderer.space(SECTION_SPACING);

    if let Some(body) = &doc.body {
        renderer.section("About Me", body);
    }
    if let Some(interests) = &doc.interests {
        renderer.section("Interests", &bullet_lines(interests));
    }
    if let Some(skills) = &doc.skills {
        renderer.section("Skills", &bullet_lines(skills));
    }

    if renderer.truncated {
        warn!(
            name = %doc.name,
            "Profile content exceeded the page; remaining lines were dropped"
        );
    }

    RenderOutcome {
        end_y: renderer.cursor.y(),
        truncated: renderer.truncated,
        image_placed,
    }
}

struct SectionRenderer<'a, P: Painter> {
    page: &'a PageGeometry,
    painter: &'a mut P,
    cursor: Cursor,
    truncated: bool,
}

impl<P: Painter> SectionRenderer<'_, P> {
    /// True if another draw call is allowed. Latches `truncated` once the floor is crossed.
    fn can_draw(&mut self) -> bool {
        if !self.truncated && !self.cursor.has_room() {
            self.truncated = true;
        }
        !self.truncated
    }

    fn space(&mut self, amount: f32) {
        self.cursor.advance(amount);
    }

    fn image(&mut self, width: f32, height: f32) -> bool {
        if !self.can_draw() {
            return false;
        }
        let x = self.page.left_margin + (self.page.content_width() - width) / 2.0;
        let y = self.cursor.y() - height;
        self.painter.draw_image(&ImagePlacement {
            x,
            y,
            width,
            height,
        });
        self.cursor.advance(height + IMAGE_SPACING);
        true
    }

    fn text_block(&mut self, text: &str, style: &TextStyle) {
        if !self.can_draw() {
            return;
        }
        let lines = wrap_text(
            text,
            self.page.content_width(),
            style.font_size,
            style.font,
            measure_text,
        );
        let result = layout_lines(
            &lines,
            self.page.left_margin,
            self.cursor.y(),
            style,
            self.cursor.floor(),
        );
        for run in &result.runs {
            self.painter.draw_text(run);
        }
        self.cursor.move_to(result.end_y);
        if result.truncated {
            self.truncated = true;
        }
    }

    fn label(&mut self, label: &str) {
        if !self.can_draw() {
            return;
        }
        self.painter.draw_text(&TextRun {
            text: label.to_string(),
            x: self.page.left_margin,
            y: self.cursor.y(),
            font_size: LABEL_STYLE.font_size,
            font: LABEL_STYLE.font,
            color: LABEL_STYLE.color,
        });
        self.cursor.advance(LABEL_ADVANCE);
    }

    fn rule(&mut self) {
        if !self.can_draw() {
            return;
        }
        let y = self.cursor.y();
        self.painter.draw_rule(&Rule {
            from: (self.page.left_margin, y),
            to: (self.page.right_margin, y),
            thickness: RULE_THICKNESS,
            color: RULE_COLOR,
        });
    }

    fn section(&mut self, label: &str, text: &str) {
        self.label(label);
        self.text_block(text, &BODY_STYLE);
        self.space(SECTION_SPACING);
    }
}
