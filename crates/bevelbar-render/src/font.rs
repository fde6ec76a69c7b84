#![forbid(unsafe_code)]

//! Font abstraction and the bar geometry derived from it.
//!
//! The renderer never touches a font file. It needs three things: vertical
//! metrics, the advance of a string, and a way to paint a string onto a
//! canvas. [`Font`] captures exactly that; the binary supplies a rasterizing
//! implementation and tests use the deterministic [`BlockFont`].

use std::fmt;

use bevelbar_core::geometry::Rect;
use unicode_width::UnicodeWidthChar;

use crate::canvas::Canvas;
use crate::pixel::PackedRgba;

/// Vertical font metrics in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FontMetrics {
    /// Distance from the baseline to the top of the tallest glyph.
    pub ascent: u32,
    /// Distance from the baseline to the bottom of the lowest glyph.
    pub descent: u32,
    /// Recommended distance between baselines.
    pub line_height: u32,
}

/// A source of glyph metrics and pixels.
pub trait Font: fmt::Debug {
    /// Vertical metrics.
    fn metrics(&self) -> FontMetrics;

    /// Horizontal advance of `text` in pixels.
    fn text_advance(&self, text: &str) -> u32;

    /// Paint `text` in `color`, pen starting at `x` on `baseline`.
    fn draw_text(&self, canvas: &mut Canvas, x: i32, baseline: i32, text: &str, color: PackedRgba);
}

/// Bar geometry derived from font metrics.
///
/// The glyph box is enlarged by a quarter to leave air around the text, and
/// a quarter of that becomes the horizontal margin on either side of a
/// segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FontGeometry {
    /// Height of a segment's content area.
    pub height: u32,
    /// Horizontal margin on each side of segment text.
    pub margin: u32,
    /// Baseline row, in canvas coordinates.
    pub baseline: i32,
}

impl FontGeometry {
    /// `height = trunc(1.25 * max(ascent + descent, line_height))`,
    /// `margin = trunc(0.25 * height)`, `baseline = height - descent`.
    pub fn from_metrics(metrics: FontMetrics) -> Self {
        let base = metrics
            .ascent
            .saturating_add(metrics.descent)
            .max(metrics.line_height);
        let height = base.saturating_add(base / 4);
        let margin = height / 4;
        let baseline = i64::from(height) - i64::from(metrics.descent);
        Self {
            height,
            margin,
            baseline: baseline.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32,
        }
    }

    /// Geometry of any [`Font`].
    pub fn of(font: &dyn Font) -> Self {
        Self::from_metrics(font.metrics())
    }

    /// Full bar height: content plus one pixel above and below for the
    /// segment bevel and one more on each side for the global bevel.
    #[inline]
    pub const fn bar_height(&self) -> u32 {
        self.height.saturating_add(4)
    }

    /// Cursor advance of an empty segment.
    #[inline]
    pub const fn empty_advance(&self) -> u32 {
        self.height / 2
    }

    /// Inner box width of a segment whose text advances `text_width`.
    #[inline]
    pub const fn box_width(&self, text_width: u32) -> u32 {
        text_width.saturating_add(self.margin.saturating_mul(2))
    }

    /// Total cursor advance of a segment, bevel included.
    #[inline]
    pub const fn segment_advance(&self, text_width: u32) -> u32 {
        self.box_width(text_width).saturating_add(2)
    }
}

/// Fixed-cell font that draws every visible character as a solid block.
///
/// Advances follow terminal column widths, so wide characters take two
/// cells and combining marks take none. Output depends only on the input,
/// which makes it the font of choice for headless runs and pixel tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockFont {
    cell_width: u32,
    metrics: FontMetrics,
}

impl BlockFont {
    /// A font with `cell_width`-pixel cells and the given vertical extents.
    pub const fn new(cell_width: u32, ascent: u32, descent: u32) -> Self {
        Self {
            cell_width,
            metrics: FontMetrics {
                ascent,
                descent,
                line_height: ascent.saturating_add(descent),
            },
        }
    }

    /// Scale a pixel size the way outline fonts roughly do: ascent is four
    /// fifths of the size, descent the rest, cells are half as wide.
    pub fn with_pixel_size(px: u32) -> Self {
        let px = px.max(2);
        let ascent = (u64::from(px) * 4 / 5) as u32;
        Self::new((px / 2).max(1), ascent, px - ascent)
    }

    /// Width of one cell.
    #[inline]
    pub const fn cell_width(&self) -> u32 {
        self.cell_width
    }

    fn columns(ch: char) -> u32 {
        ch.width().unwrap_or(0) as u32
    }
}

impl Default for BlockFont {
    fn default() -> Self {
        Self::new(6, 10, 2)
    }
}

impl Font for BlockFont {
    fn metrics(&self) -> FontMetrics {
        self.metrics
    }

    fn text_advance(&self, text: &str) -> u32 {
        text.chars()
            .map(|ch| Self::columns(ch).saturating_mul(self.cell_width))
            .fold(0u32, u32::saturating_add)
    }

    fn draw_text(&self, canvas: &mut Canvas, x: i32, baseline: i32, text: &str, color: PackedRgba) {
        let top = baseline.saturating_sub_unsigned(self.metrics.ascent);
        let mut pen = x;
        for ch in text.chars() {
            let advance = Self::columns(ch).saturating_mul(self.cell_width);
            if advance == 0 {
                continue;
            }
            if !ch.is_whitespace() {
                // One column of air on the right so neighbours stay apart.
                let glyph = Rect::new(
                    pen,
                    top,
                    advance.saturating_sub(1).max(1),
                    self.metrics.ascent,
                );
                canvas.fill(glyph, color);
            }
            pen = pen.saturating_add_unsigned(advance);
        }
    }
}
