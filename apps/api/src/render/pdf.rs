//! PDF backend: turns a laid-out profile page into PDF bytes via pdf-writer.
//!
//! One page, two standard Type1 fonts (WinAnsi), at most one image XObject.

use chrono::{Datelike, Timelike, Utc};
use miniz_oxide::deflate::{compress_to_vec_zlib, CompressionLevel};
use pdf_writer::{Content, Date, Filter, Name, Pdf, Rect, Ref, Str, TextStr};
use thiserror::Error;

use crate::layout::font_metrics::encode_win_ansi;
use crate::layout::{
    render_profile, FontHandle, ImagePlacement, PageGeometry, Painter, ProfileDocument,
    RenderOutcome, Rule, TextRun,
};
use crate::render::image::{EmbeddedImage, ImageEncoding};

const IMAGE_RESOURCE: &str = "Im1";
const FONTS: [FontHandle; 2] = [FontHandle::Regular, FontHandle::Bold];

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("image dimensions {width}x{height} cannot be embedded")]
    ImageDimensions { width: u32, height: u32 },
}

/// Finished document plus what the layout pass reported.
#[derive(Debug, Clone)]
pub struct RenderedPdf {
    pub bytes: Vec<u8>,
    pub outcome: RenderOutcome,
}

/// [`Painter`] that writes straight into a PDF content stream.
pub struct PdfPainter {
    content: Content,
}

impl PdfPainter {
    pub fn new() -> Self {
        Self {
            content: Content::new(),
        }
    }

    /// Uncompressed content stream bytes.
    pub fn finish(self) -> Vec<u8> {
        self.content.finish()
    }
}

impl Default for PdfPainter {
    fn default() -> Self {
        Self::new()
    }
}

impl Painter for PdfPainter {
    fn draw_text(&mut self, run: &TextRun) {
        if run.text.is_empty() {
            return;
        }
        let encoded = encode_win_ansi(&run.text);
        self.content
            .set_fill_rgb(run.color.r, run.color.g, run.color.b)
            .begin_text()
            .set_font(Name(run.font.resource_name().as_bytes()), run.font_size)
            .next_line(run.x, run.y)
            .show(Str(&encoded))
            .end_text();
    }

    fn draw_rule(&mut self, rule: &Rule) {
        self.content
            .save_state()
            .set_stroke_rgb(rule.color.r, rule.color.g, rule.color.b)
            .set_line_width(rule.thickness)
            .move_to(rule.from.0, rule.from.1)
            .line_to(rule.to.0, rule.to.1)
            .stroke()
            .restore_state();
    }

    fn draw_image(&mut self, placement: &ImagePlacement) {
        self.content
            .save_state()
            .transform([
                placement.width,
                0.0,
                0.0,
                placement.height,
                placement.x,
                placement.y,
            ])
            .x_object(Name(IMAGE_RESOURCE.as_bytes()))
            .restore_state();
    }
}

/// Sequential object id allocator.
struct RefAlloc(i32);

impl RefAlloc {
    fn next(&mut self) -> Ref {
        self.0 += 1;
        Ref::new(self.0)
    }
}

/// Lays out `doc` on a single page and serializes the result.
pub fn build_profile_pdf(
    doc: &ProfileDocument,
    image: Option<&EmbeddedImage>,
    page: &PageGeometry,
) -> Result<RenderedPdf, RenderError> {
    let mut alloc = RefAlloc(0);
    let catalog_id = alloc.next();
    let pages_id = alloc.next();
    let page_id = alloc.next();
    let content_id = alloc.next();
    let info_id = alloc.next();
    let font_ids: Vec<(FontHandle, Ref)> = FONTS.iter().map(|f| (*f, alloc.next())).collect();

    let mut pdf = Pdf::new();

    let image_id = match image {
        Some(img) => Some(write_image(&mut pdf, img, &mut alloc)?),
        None => None,
    };

    let mut painter = PdfPainter::new();
    let outcome = render_profile(doc, image.map(EmbeddedImage::size), page, &mut painter);

    let level = CompressionLevel::DefaultLevel as u8;
    let compressed = compress_to_vec_zlib(&painter.finish(), level);
    pdf.stream(content_id, &compressed).filter(Filter::FlateDecode);

    for (font, id) in &font_ids {
        pdf.type1_font(*id)
            .base_font(Name(font.base_font().as_bytes()))
            .encoding_predefined(Name(b"WinAnsiEncoding"));
    }

    pdf.catalog(catalog_id).pages(pages_id);
    pdf.pages(pages_id).kids([page_id]).count(1);

    {
        let mut pdf_page = pdf.page(page_id);
        pdf_page
            .media_box(Rect::new(0.0, 0.0, page.width, page.height))
            .parent(pages_id)
            .contents(content_id);
        let mut resources = pdf_page.resources();
        {
            let mut fonts = resources.fonts();
            for (font, id) in &font_ids {
                fonts.pair(Name(font.resource_name().as_bytes()), *id);
            }
        }
        // Only referenced when the layout actually drew it
        if let (Some(id), true) = (image_id, outcome.image_placed) {
            resources
                .x_objects()
                .pair(Name(IMAGE_RESOURCE.as_bytes()), id);
        }
    }

    write_info(&mut pdf, info_id, doc);

    Ok(RenderedPdf {
        bytes: pdf.finish(),
        outcome,
    })
}

fn write_image(pdf: &mut Pdf, img: &EmbeddedImage, alloc: &mut RefAlloc) -> Result<Ref, RenderError> {
    let dims_err = || RenderError::ImageDimensions {
        width: img.width,
        height: img.height,
    };
    let width = i32::try_from(img.width).map_err(|_| dims_err())?;
    let height = i32::try_from(img.height).map_err(|_| dims_err())?;

    let mask_id = img.alpha.as_ref().map(|alpha| {
        let id = alloc.next();
        let mut mask = pdf.image_xobject(id, alpha);
        mask.filter(Filter::FlateDecode);
        mask.width(width);
        mask.height(height);
        mask.color_space().device_gray();
        mask.bits_per_component(8);
        id
    });

    let id = alloc.next();
    let mut xobj = pdf.image_xobject(id, &img.data);
    xobj.filter(match img.encoding {
        ImageEncoding::Dct => Filter::DctDecode,
        ImageEncoding::Flate => Filter::FlateDecode,
    });
    xobj.width(width);
    xobj.height(height);
    xobj.color_space().device_rgb();
    xobj.bits_per_component(8);
    if let Some(mask_id) = mask_id {
        xobj.s_mask(mask_id);
    }
    Ok(id)
}

fn write_info(pdf: &mut Pdf, id: Ref, doc: &ProfileDocument) {
    let title = format!("{} - Profile", doc.name);
    let now = Utc::now();
    let date = Date::new(now.year() as u16)
        .month(now.month() as u8)
        .day(now.day() as u8)
        .hour(now.hour() as u8)
        .minute(now.minute() as u8)
        .second(now.second() as u8)
        .utc_offset_hour(0)
        .utc_offset_minute(0);

    pdf.document_info(id)
        .title(TextStr(&title))
        .creator(TextStr(concat!(
            env!("CARGO_PKG_NAME"),
            " v",
            env!("CARGO_PKG_VERSION")
        )))
        .creation_date(date);
}
