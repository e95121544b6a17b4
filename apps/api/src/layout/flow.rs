//! Vertical flow of wrapped lines down a single page.
//!
//! PDF space has its origin at the bottom-left, so "down the page" means a
//! decreasing `y`. The cursor never moves up. When it falls below the page
//! floor the rest of the block is dropped: there is no second page.

use crate::layout::font_metrics::FontHandle;

/// Line advance for 12pt text. Other sizes scale proportionally.
pub const BASE_LINE_HEIGHT: f32 = 18.0;
const BASE_FONT_SIZE: f32 = 12.0;

/// Fill colour with components in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Rgb {
    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    pub const fn grey(level: f32) -> Self {
        Self::new(level, level, level)
    }
}

/// Font, size and colour for one block of text.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    pub font: FontHandle,
    pub font_size: f32,
    pub color: Rgb,
}

impl TextStyle {
    pub const fn new(font: FontHandle, font_size: f32, color: Rgb) -> Self {
        Self {
            font,
            font_size,
            color,
        }
    }

    /// Vertical advance between consecutive baselines.
    pub fn line_height(&self) -> f32 {
        BASE_LINE_HEIGHT * (self.font_size / BASE_FONT_SIZE)
    }
}

/// A positioned line of text, ready for the painter.
#[derive(Debug, Clone, PartialEq)]
pub struct TextRun {
    pub text: String,
    pub x: f32,
    pub y: f32,
    pub font_size: f32,
    pub font: FontHandle,
    pub color: Rgb,
}

/// Output of [`layout_lines`].
#[derive(Debug, Clone, PartialEq)]
pub struct WrapResult {
    pub runs: Vec<TextRun>,
    /// Cursor position after the last emitted line.
    pub end_y: f32,
    /// True when lines were dropped because the page floor was reached.
    pub truncated: bool,
}

/// Positions `lines` top-down starting at `start_y`.
///
/// Before each line, if `y` is already below `floor` layout stops and the
/// remaining lines are dropped.
pub fn layout_lines(
    lines: &[String],
    x: f32,
    start_y: f32,
    style: &TextStyle,
    floor: f32,
) -> WrapResult {
    let line_height = style.line_height();
    let mut y = start_y;
    let mut runs = Vec::with_capacity(lines.len());

    for line in lines {
        if y < floor {
            return WrapResult {
                runs,
                end_y: y,
                truncated: true,
            };
        }
        runs.push(TextRun {
            text: line.clone(),
            x,
            y,
            font_size: style.font_size,
            font: style.font,
            color: style.color,
        });
        y -= line_height;
    }

    WrapResult {
        runs,
        end_y: y,
        truncated: false,
    }
}

/// Vertical position owned by a single render. Only ever moves down.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cursor {
    y: f32,
    floor: f32,
}

impl Cursor {
    pub fn new(start_y: f32, floor: f32) -> Self {
        Self { y: start_y, floor }
    }

    pub fn y(&self) -> f32 {
        self.y
    }

    pub fn floor(&self) -> f32 {
        self.floor
    }

    /// Moves the cursor down by `amount`. Negative amounts are ignored.
    pub fn advance(&mut self, amount: f32) {
        self.y -= amount.max(0.0);
    }

    /// Moves the cursor to `y` if that is further down the page.
    pub fn move_to(&mut self, y: f32) {
        self.y = self.y.min(y);
    }

    /// False once the cursor has dropped below the page floor.
    pub fn has_room(&self) -> bool {
        self.y >= self.floor
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Painting surface
// ────────────────────────────────────────────────────────────────────────────

/// A straight stroke between two points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rule {
    pub from: (f32, f32),
    pub to: (f32, f32),
    pub thickness: f32,
    pub color: Rgb,
}

/// Where the profile image lands on the page. `(x, y)` is the bottom-left corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImagePlacement {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

/// The low-level page-drawing surface the section renderer writes to.
pub trait Painter {
    fn draw_text(&mut self, run: &TextRun);
    fn draw_rule(&mut self, rule: &Rule);
    fn draw_image(&mut self, placement: &ImagePlacement);
}
