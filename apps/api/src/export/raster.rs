//! Canvas rasterizer: draws a `PreviewDocument` onto an RGB canvas.
//!
//! Coordinates are laid out in points and multiplied by `canvas.scale` to get
//! pixels. Glyphs come from 8×8 bitmap fonts, stretched into the advance box
//! the font metrics measured for each character.

use font8x8::{UnicodeFonts, BASIC_FONTS, LATIN_FONTS};
use image::{imageops, Rgb, RgbImage};
use tracing::debug;

use crate::export::error::ExportError;
use crate::export::options::{ExportOptions, PageBreakMode};
use crate::layout::{BlockKind, PreviewDocument};

/// Upper bound on canvas size; a full-page Letter canvas at scale 2.5 is ~2.4M
/// pixels, so this allows a couple of dozen pages at the improved tier while
/// keeping one export's RGB buffer near 180 MB.
const MAX_CANVAS_PIXELS: u64 = 60_000_000;

const BACKGROUND: Rgb<u8> = Rgb([255, 255, 255]);

fn ink(kind: BlockKind) -> Rgb<u8> {
    match kind {
        BlockKind::Name => Rgb([17, 24, 39]),
        BlockKind::Headline | BlockKind::SectionHeading => Rgb([31, 78, 121]),
        BlockKind::Contact => Rgb([90, 90, 90]),
        BlockKind::Paragraph => Rgb([33, 33, 33]),
    }
}

/// A rendered canvas holding one or more printable pages stacked vertically.
pub struct Canvas {
    pub image: RgbImage,
    pub page_height_px: u32,
    pub page_count: u32,
}

impl Canvas {
    /// Page-sized images, top to bottom. Each page is copied out of the canvas
    /// only when the iterator reaches it.
    pub fn pages(&self) -> impl Iterator<Item = RgbImage> + '_ {
        (0..self.page_count).map(move |page| {
            imageops::crop_imm(
                &self.image,
                0,
                page * self.page_height_px,
                self.image.width(),
                self.page_height_px,
            )
            .to_image()
        })
    }
}

/// Top edge of each block's text, in points, on a continuous strip of pages
/// each `page_height_pt` tall.
///
/// With `AvoidBlocks`, a block that would cross a page boundary starts on the
/// next page instead, unless it is taller than a page on its own.
pub fn place_blocks(preview: &PreviewDocument, page_height_pt: f32, mode: PageBreakMode) -> Vec<f32> {
    let mut cursor = 0.0_f32;
    let mut tops = Vec::with_capacity(preview.blocks.len());

    for block in &preview.blocks {
        let mut top = cursor + block.kind.space_before_pt();
        let height = block.text_height_pt();

        if mode == PageBreakMode::AvoidBlocks && height <= page_height_pt {
            let page_start = (top / page_height_pt).floor() * page_height_pt;
            if top + height > page_start + page_height_pt {
                top = page_start + page_height_pt;
            }
        }

        tops.push(top);
        cursor = top + height;
    }
    tops
}

/// Renders the preview onto a canvas sized to whole pages of the printable area.
pub fn render_canvas(preview: &PreviewDocument, options: &ExportOptions) -> Result<Canvas, ExportError> {
    let scale = options.canvas.scale;
    let (content_w, content_h) = options.content_box_pt();

    let tops = place_blocks(preview, content_h, options.pagebreak);
    let used_height = preview
        .blocks
        .iter()
        .zip(&tops)
        .map(|(b, top)| top + b.text_height_pt())
        .fold(0.0_f32, f32::max);
    let page_count = ((used_height / content_h).ceil() as u32).max(1);

    let (width_px, page_height_px, height_px) = canvas_dimensions(content_w, content_h, scale, page_count)?;

    debug!(
        "Rasterizing {} lines onto {}x{} px ({} pages)",
        preview.line_count(),
        width_px,
        height_px,
        page_count
    );

    let mut image = RgbImage::from_pixel(width_px, height_px, BACKGROUND);
    let metrics = preview.theme.metrics();

    for (block, top) in preview.blocks.iter().zip(tops) {
        let size = block.kind.font_size_pt();
        let line_h = block.kind.line_height_pt();
        let color = ink(block.kind);

        for (i, line) in block.lines.iter().enumerate() {
            let glyph_top = top + i as f32 * line_h + (line_h - size) / 2.0;
            let mut x = 0.0_f32;
            for c in line.chars() {
                let advance = metrics.char_width(c) * size;
                draw_glyph(&mut image, c, x * scale, glyph_top * scale, advance * scale, size * scale, color);
                x += advance;
            }
        }

        if block.kind == BlockKind::SectionHeading {
            let rule_y = top + block.text_height_pt();
            fill_rect(&mut image, 0.0, rule_y * scale, content_w * scale, 0.75 * scale, color);
        }
    }

    Ok(Canvas {
        image,
        page_height_px,
        page_count,
    })
}

/// Width, page height and total height in pixels, or `InvalidOptions` when the
/// canvas would not fit within `MAX_CANVAS_PIXELS`.
fn canvas_dimensions(
    content_w: f32,
    content_h: f32,
    scale: f32,
    page_count: u32,
) -> Result<(u32, u32, u32), ExportError> {
    let too_large = || {
        ExportError::InvalidOptions(format!(
            "a {content_w:.0}pt x {content_h:.0}pt page at scale {scale} over {page_count} pages \
             exceeds the {MAX_CANVAS_PIXELS} pixel canvas limit"
        ))
    };
    let to_px = |pt: f32| {
        let px = (f64::from(pt) * f64::from(scale)).ceil();
        (px.is_finite() && px <= f64::from(u32::MAX)).then_some(px as u32)
    };

    let width_px = to_px(content_w).ok_or_else(too_large)?;
    let page_height_px = to_px(content_h).ok_or_else(too_large)?;
    let height_px = page_height_px.checked_mul(page_count).ok_or_else(too_large)?;
    let total = u64::from(width_px)
        .checked_mul(u64::from(height_px))
        .ok_or_else(too_large)?;
    if total > MAX_CANVAS_PIXELS {
        return Err(too_large());
    }
    Ok((width_px, page_height_px, height_px))
}

fn glyph_bitmap(c: char) -> Option<[u8; 8]> {
    if c == ' ' {
        return None;
    }
    BASIC_FONTS
        .get(c)
        .or_else(|| LATIN_FONTS.get(c))
        .or_else(|| BASIC_FONTS.get('?'))
}

/// Stretches the 8×8 bitmap for `c` over the box at (`x`, `y`) sized `w`×`h` pixels.
fn draw_glyph(image: &mut RgbImage, c: char, x: f32, y: f32, w: f32, h: f32, color: Rgb<u8>) {
    let Some(bitmap) = glyph_bitmap(c) else {
        return;
    };
    if w <= 0.0 || h <= 0.0 {
        return;
    }

    let x0 = x.floor().max(0.0) as u32;
    let y0 = y.floor().max(0.0) as u32;
    let x1 = ((x + w).ceil() as u32).min(image.width());
    let y1 = ((y + h).ceil() as u32).min(image.height());

    for py in y0..y1 {
        let gy = (((py as f32 + 0.5 - y) / h) * 8.0).floor();
        if !(0.0..8.0).contains(&gy) {
            continue;
        }
        let row = bitmap[gy as usize];
        for px in x0..x1 {
            let gx = (((px as f32 + 0.5 - x) / w) * 8.0).floor();
            if (0.0..8.0).contains(&gx) && row & (1 << gx as u32) != 0 {
                image.put_pixel(px, py, color);
            }
        }
    }
}

fn fill_rect(image: &mut RgbImage, x: f32, y: f32, w: f32, h: f32, color: Rgb<u8>) {
    let x0 = x.floor().max(0.0) as u32;
    let y0 = y.floor().max(0.0) as u32;
    let x1 = ((x + w).ceil() as u32).min(image.width());
    let y1 = ((y + h.max(1.0)).ceil() as u32).min(image.height());
    for py in y0..y1 {
        for px in x0..x1 {
            image.put_pixel(px, py, color);
        }
    }
}
