#![forbid(unsafe_code)]

//! Font loading.
//!
//! A font spec is `PATH[:size=PX]`. `PATH` is a TrueType/OpenType file
//! rasterized with fontdue, or the word `builtin` for the block font.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use bevelbar_core::error::{BarError, BarResult};
use bevelbar_render::{BlockFont, Canvas, Font, FontMetrics, PackedRgba};
use fontdue::FontSettings;

use crate::cli::SpecError;

/// Pixel size used when a spec has no `:size=`.
pub const DEFAULT_SIZE: f32 = 12.0;

/// Largest accepted pixel size. The bar canvas is as tall as the font.
pub const MAX_SIZE: f32 = 1024.0;

/// Where glyphs come from.
#[derive(Debug, Clone, PartialEq)]
pub enum FontSource {
    /// The deterministic block font.
    Builtin,
    /// A font file on disk.
    File(PathBuf),
}

/// A parsed font spec.
#[derive(Debug, Clone, PartialEq)]
pub struct FontSpec {
    /// Glyph source.
    pub source: FontSource,
    /// Pixel size.
    pub size: f32,
}

impl FromStr for FontSpec {
    type Err = SpecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (path, size) = match s.rsplit_once(":size=") {
            Some((path, size)) => {
                let px: f32 = size
                    .parse()
                    .map_err(|_| SpecError::font(s, "size is not a number"))?;
                if !px.is_finite() || px <= 0.0 {
                    return Err(SpecError::font(s, "size must be positive"));
                }
                if px > MAX_SIZE {
                    return Err(SpecError::font(s, "size is larger than 1024px"));
                }
                (path, px)
            }
            None => (s, DEFAULT_SIZE),
        };
        if path.is_empty() {
            return Err(SpecError::font(s, "empty path"));
        }
        let source = if path == "builtin" {
            FontSource::Builtin
        } else {
            FontSource::File(PathBuf::from(path))
        };
        Ok(Self { source, size })
    }
}

impl FontSpec {
    /// Load the font.
    pub fn load(&self) -> BarResult<Box<dyn Font>> {
        match &self.source {
            FontSource::Builtin => Ok(Box::new(BlockFont::with_pixel_size(self.size.round() as u32))),
            FontSource::File(path) => {
                let name = path.display().to_string();
                let bytes = std::fs::read(path).map_err(|e| BarError::resource("font", &name, e))?;
                let font = FontdueFont::from_bytes(bytes, self.size)
                    .map_err(|e| BarError::resource("font", &name, e))?;
                tracing::info!(font = %name, size = self.size, "font loaded");
                Ok(Box::new(font))
            }
        }
    }
}

/// Outline font rasterized on the CPU.
pub struct FontdueFont {
    font: fontdue::Font,
    px: f32,
    metrics: FontMetrics,
}

impl fmt::Debug for FontdueFont {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FontdueFont")
            .field("px", &self.px)
            .field("metrics", &self.metrics)
            .finish_non_exhaustive()
    }
}

impl FontdueFont {
    /// Parse font data at pixel size `px`.
    pub fn from_bytes(bytes: Vec<u8>, px: f32) -> Result<Self, &'static str> {
        let font = fontdue::Font::from_bytes(
            bytes,
            FontSettings {
                scale: px,
                ..FontSettings::default()
            },
        )?;
        let metrics = match font.horizontal_line_metrics(px) {
            Some(line) => FontMetrics {
                ascent: line.ascent.ceil().max(0.0) as u32,
                descent: (-line.descent).ceil().max(0.0) as u32,
                line_height: line.new_line_size.ceil().max(0.0) as u32,
            },
            None => FontMetrics {
                ascent: px.ceil() as u32,
                descent: 0,
                line_height: px.ceil() as u32,
            },
        };
        Ok(Self { font, px, metrics })
    }

    fn advance(&self, ch: char) -> u32 {
        self.font.metrics(ch, self.px).advance_width.round().max(0.0) as u32
    }
}

impl Font for FontdueFont {
    fn metrics(&self) -> FontMetrics {
        self.metrics
    }

    fn text_advance(&self, text: &str) -> u32 {
        text.chars()
            .map(|ch| self.advance(ch))
            .fold(0u32, u32::saturating_add)
    }

    fn draw_text(&self, canvas: &mut Canvas, x: i32, baseline: i32, text: &str, color: PackedRgba) {
        let mut pen = x;
        for ch in text.chars() {
            if !ch.is_whitespace() && !ch.is_control() {
                let (glyph, coverage) = self.font.rasterize(ch, self.px);
                let left = pen.saturating_add(glyph.xmin);
                let top = baseline - glyph.ymin - glyph.height as i32;
                for (row, line) in coverage.chunks(glyph.width.max(1)).enumerate() {
                    for (col, &alpha) in line.iter().enumerate() {
                        canvas.blend_pixel(left + col as i32, top + row as i32, color, alpha);
                    }
                }
            }
            pen = pen.saturating_add_unsigned(self.advance(ch));
        }
    }
}
