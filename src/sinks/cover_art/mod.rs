//! Generated cover art for novel volumes.
//!
//! Crawled novels have no cover images of their own, so each volume gets a
//! plain title card: a pale, randomly tinted background with the volume label
//! and the work title drawn on top. Titles are reduced to ASCII and wrapped
//! into a short narrow column so they stay legible on an e-reader thumbnail;
//! long titles are clipped rather than shrunk.
//!
//! The background colour comes from a caller-supplied random source so the
//! same seed always yields the same cover.

mod fonts;
pub use fonts::BUNDLED;

use ab_glyph::{point, Font, FontVec, GlyphId, PxScale, ScaleFont};
use anyhow::{Context, Result};
use image::{ImageFormat, Rgb, RgbImage};
use rand::{Rng, RngCore};
use std::io::Cursor;
use std::ops::Range;

pub const COVER_WIDTH: u32 = 625;
pub const COVER_HEIGHT: u32 = 1000;

/// Longest cleaned title kept before the ellipsis is appended
pub const MAX_TITLE_CHARS: usize = 35;
pub const ELLIPSIS: &str = "...";
/// Wrapped title column width, in characters
pub const WRAP_WIDTH: usize = 8;
pub const MAX_TITLE_LINES: usize = 6;

/// Each background channel is drawn from this range
pub const BACKGROUND_CHANNEL: Range<u8> = 200..255;

const VOLUME_POSITION: (f32, f32) = (100.0, 180.0);
const VOLUME_EM_PX: f32 = 80.0;
const VOLUME_COLOUR: Rgb<u8> = Rgb([0x44, 0x44, 0x44]);

const TITLE_POSITION: (f32, f32) = (100.0, 280.0);
const TITLE_EM_PX: f32 = 100.0;
const TITLE_COLOUR: Rgb<u8> = Rgb([0x00, 0x00, 0x00]);

/// Extra space between wrapped title lines, in pixels
const LINE_SPACING: f32 = 4.0;

/// Strip non-ASCII characters and parentheses, then clip overly long titles.
pub fn clean_title(raw: &str) -> String {
    let cleaned: String = raw
        .chars()
        .filter(|c| c.is_ascii() && *c != '(' && *c != ')')
        .collect();

    if cleaned.len() > MAX_TITLE_CHARS {
        format!("{}{ELLIPSIS}", &cleaned[..MAX_TITLE_CHARS])
    } else {
        cleaned
    }
}

/// Greedy word wrap at `width` characters per line.
///
/// Words longer than the width fill the rest of the current line and carry
/// on to the next ones. Whitespace runs inside a line are kept as they are;
/// a run is dropped where it ends a line or starts any line but the first.
pub fn wrap(text: &str, width: usize) -> Vec<String> {
    let mut chunks = chunks_of(text);
    chunks.reverse();

    let mut lines: Vec<String> = Vec::default();
    while !chunks.is_empty() {
        if !lines.is_empty() && chunks.last().is_some_and(|c| is_blank(c)) {
            chunks.pop();
        }

        let mut line: Vec<String> = Vec::default();
        let mut len = 0;
        while let Some(chunk_len) = chunks.last().map(|c| c.chars().count()) {
            if len + chunk_len > width {
                break;
            }
            if let Some(chunk) = chunks.pop() {
                line.push(chunk);
                len += chunk_len;
            }
        }

        if let Some(chunk) = chunks.last_mut() {
            if chunk.chars().count() > width {
                let space_left = if width < 1 { 1 } else { width - len };
                if space_left > 0 {
                    line.push(chunk.chars().take(space_left).collect());
                    *chunk = chunk.chars().skip(space_left).collect();
                }
            }
        }

        if line.last().is_some_and(|c| is_blank(c)) {
            line.pop();
        }
        let line = line.concat();
        if !line.is_empty() {
            lines.push(line);
        }
    }

    lines
}

/// Split text into alternating word and whitespace runs, with every
/// whitespace character turned into a plain space.
fn chunks_of(text: &str) -> Vec<String> {
    let mut chunks: Vec<String> = Vec::default();
    let mut previous_blank = None;
    for c in text.chars() {
        let blank = c.is_whitespace();
        let c = if blank { ' ' } else { c };
        match chunks.last_mut() {
            Some(chunk) if previous_blank == Some(blank) => chunk.push(c),
            _ => chunks.push(c.to_string()),
        }
        previous_blank = Some(blank);
    }
    chunks
}

fn is_blank(chunk: &str) -> bool {
    chunk.chars().all(|c| c == ' ')
}

/// The title lines actually drawn on a cover.
pub fn title_lines(raw_title: &str) -> Vec<String> {
    let mut lines = wrap(&clean_title(raw_title), WRAP_WIDTH);
    lines.truncate(MAX_TITLE_LINES);
    lines
}

/// Pick a pale background colour.
pub fn pick_background(rng: &mut dyn RngCore) -> Rgb<u8> {
    Rgb([
        rng.gen_range(BACKGROUND_CHANNEL),
        rng.gen_range(BACKGROUND_CHANNEL),
        rng.gen_range(BACKGROUND_CHANNEL),
    ])
}

/// Draws volume covers with a single loaded font.
pub struct CoverRenderer {
    font: FontVec,
}

impl CoverRenderer {
    /// Load the configured font, either "bundled" or a path to a font file.
    pub fn new(font_name: &str) -> Result<CoverRenderer> {
        let font = fonts::load(font_name).with_context(|| "Failed to load cover font")?;
        Ok(CoverRenderer { font })
    }

    /// Render a cover as PNG bytes, with a background drawn from `rng`.
    pub fn render(
        &self,
        raw_title: &str,
        display_volume: &str,
        rng: &mut dyn RngCore,
    ) -> Result<Vec<u8>> {
        let background = pick_background(rng);
        let image = self.draw(raw_title, display_volume, background);
        encode_png(&image)
    }

    /// Draw the cover canvas without encoding it.
    pub fn draw(&self, raw_title: &str, display_volume: &str, background: Rgb<u8>) -> RgbImage {
        let mut image = RgbImage::from_pixel(COVER_WIDTH, COVER_HEIGHT, background);

        self.draw_lines(
            &mut image,
            &[format!("Volume {display_volume}")],
            VOLUME_EM_PX,
            VOLUME_POSITION,
            VOLUME_COLOUR,
        );
        self.draw_lines(
            &mut image,
            &title_lines(raw_title),
            TITLE_EM_PX,
            TITLE_POSITION,
            TITLE_COLOUR,
        );

        image
    }

    /// Draw lines of text with their top-left corner at `origin`.
    fn draw_lines(
        &self,
        image: &mut RgbImage,
        lines: &[String],
        em_px: f32,
        origin: (f32, f32),
        colour: Rgb<u8>,
    ) {
        let scale = em_scale(&self.font, em_px);
        let scaled = self.font.as_scaled(scale);
        let line_advance = scaled.height() + LINE_SPACING;
        let (width, height) = image.dimensions();

        for (i, line) in lines.iter().enumerate() {
            let baseline = origin.1 + scaled.ascent() + i as f32 * line_advance;
            let mut caret = origin.0;
            let mut previous: Option<GlyphId> = None;

            for c in line.chars() {
                let id = scaled.glyph_id(c);
                if let Some(previous) = previous {
                    caret += scaled.kern(previous, id);
                }
                let glyph = id.with_scale_and_position(scale, point(caret, baseline));
                caret += scaled.h_advance(id);
                previous = Some(id);

                let Some(outline) = self.font.outline_glyph(glyph) else {
                    continue;
                };
                let bounds = outline.px_bounds();
                outline.draw(|gx, gy, coverage| {
                    let x = bounds.min.x as i64 + gx as i64;
                    let y = bounds.min.y as i64 + gy as i64;
                    if x < 0 || y < 0 || x >= width as i64 || y >= height as i64 {
                        return;
                    }
                    blend(image.get_pixel_mut(x as u32, y as u32), colour, coverage);
                });
            }
        }
    }
}

/// Convert an em size in pixels to the glyph height scale ab_glyph expects.
fn em_scale(font: &FontVec, em_px: f32) -> PxScale {
    match font.units_per_em() {
        Some(units_per_em) if units_per_em > 0.0 => {
            PxScale::from(em_px * font.height_unscaled() / units_per_em)
        }
        _ => PxScale::from(em_px),
    }
}

fn blend(pixel: &mut Rgb<u8>, colour: Rgb<u8>, coverage: f32) {
    let coverage = coverage.clamp(0.0, 1.0);
    for (dst, src) in pixel.0.iter_mut().zip(colour.0) {
        *dst = (*dst as f32 * (1.0 - coverage) + src as f32 * coverage).round() as u8;
    }
}

fn encode_png(image: &RgbImage) -> Result<Vec<u8>> {
    let mut bytes: Vec<u8> = Vec::default();
    image
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .with_context(|| "Failed to encode cover as PNG")?;
    Ok(bytes)
}
