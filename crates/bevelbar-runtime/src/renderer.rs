#![forbid(unsafe_code)]

//! Executes layout operations against per-monitor canvases.
//!
//! Each canvas is reset once per frame, then segments are appended left to
//! right. A text segment is a filled box `2 * margin + text_width` wide with
//! a one-pixel bevel around it; an empty segment is a gap of half the font
//! height. `EndFrame` closes every canvas with the outer border.

use std::borrow::Cow;

use bevelbar_core::error::BarResult;
use bevelbar_core::geometry::Rect;
use bevelbar_core::protocol::{LayoutOp, ParseError, ProtocolLimits, ProtocolParser, Target};
use bevelbar_render::{Canvas, Draw, Font, FontGeometry};
use bevelbar_style::{BaseColors, Style, StyleTable};

/// Draws segments with a font, a style table, and the base colors.
#[derive(Debug)]
pub struct BevelRenderer {
    font: Box<dyn Font>,
    geometry: FontGeometry,
    styles: StyleTable,
    base: BaseColors,
}

#[inline]
fn column(dw: u32) -> i32 {
    i32::try_from(dw).unwrap_or(i32::MAX)
}

impl BevelRenderer {
    /// Create a renderer. Geometry is derived from the font once, here.
    pub fn new(font: Box<dyn Font>, styles: StyleTable, base: BaseColors) -> Self {
        let geometry = FontGeometry::of(font.as_ref());
        Self {
            font,
            geometry,
            styles,
            base,
        }
    }

    /// Bar geometry derived from the font.
    #[inline]
    pub fn geometry(&self) -> FontGeometry {
        self.geometry
    }

    /// The style table.
    #[inline]
    pub fn styles(&self) -> &StyleTable {
        &self.styles
    }

    /// The base colors.
    #[inline]
    pub fn base(&self) -> BaseColors {
        self.base
    }

    /// Allocate one canvas per monitor width, already reset.
    pub fn canvases(&self, widths: impl IntoIterator<Item = u32>) -> Vec<Canvas> {
        widths
            .into_iter()
            .map(|w| Canvas::new(w, self.geometry.bar_height(), self.base.fill))
            .collect()
    }

    /// Reset every canvas for a new frame.
    pub fn begin_frame(&self, canvases: &mut [Canvas]) {
        let dh = self.geometry.bar_height();
        for canvas in canvases {
            canvas.reset(self.base.fill, dh);
        }
    }

    /// Apply one operation. `input` is the frame the op's span refers to.
    pub fn apply(&self, canvases: &mut [Canvas], op: &LayoutOp, input: &[u8]) -> BarResult<()> {
        match op {
            LayoutOp::SelectMonitor(_) | LayoutOp::EndMonitor => {}
            LayoutOp::DrawText { target, style, span } => {
                let Some(style_colors) = self.styles.get(*style) else {
                    // The style digit sits right before the text span.
                    let offset = span.start.saturating_sub(1);
                    return Err(ParseError::InvalidStyleIndex {
                        byte: input.get(offset).copied().unwrap_or(b'?'),
                        offset,
                        styles: self.styles.len(),
                    }
                    .into());
                };
                let text = op
                    .text(input)
                    .map(String::from_utf8_lossy)
                    .unwrap_or(Cow::Borrowed(""));
                for canvas in targeted(canvases, *target) {
                    self.draw_text(canvas, style_colors, &text);
                }
            }
            LayoutOp::DrawEmpty(target) => {
                let gap = self.geometry.empty_advance();
                for canvas in targeted(canvases, *target) {
                    canvas.advance(gap);
                }
            }
            LayoutOp::EndFrame => {
                for canvas in canvases.iter_mut() {
                    self.draw_global_border(canvas);
                }
            }
        }
        Ok(())
    }

    /// Parse `input` and render it, interleaving the two per operation.
    ///
    /// Returns the decoded operations so the frame can be replayed. On error
    /// the canvases hold a partial frame and must not be presented.
    pub fn render(
        &self,
        canvases: &mut [Canvas],
        input: &[u8],
        limits: ProtocolLimits,
    ) -> BarResult<Vec<LayoutOp>> {
        self.begin_frame(canvases);
        let mut ops = Vec::new();
        for op in ProtocolParser::new(input, limits) {
            let op = op?;
            tracing::trace!(?op, "apply");
            self.apply(canvases, &op, input)?;
            ops.push(op);
        }
        Ok(ops)
    }

    /// Render already-decoded operations again.
    pub fn replay(&self, canvases: &mut [Canvas], ops: &[LayoutOp], input: &[u8]) -> BarResult<()> {
        self.begin_frame(canvases);
        for op in ops {
            self.apply(canvases, op, input)?;
        }
        Ok(())
    }

    fn draw_text(&self, canvas: &mut Canvas, style: &Style, text: &str) {
        let geom = self.geometry;
        let text_width = self.font.text_advance(text);
        let x = column(canvas.dw());
        let rect = Rect::new(
            x,
            1,
            geom.box_width(text_width).saturating_add(2),
            geom.height.saturating_add(2),
        );

        canvas.draw_rect_filled(rect, style.fill);
        let pen = x.saturating_add(1).saturating_add(column(geom.margin));
        canvas.print_text(self.font.as_ref(), pen, geom.baseline, text, style.text);
        canvas.draw_bevel(rect, style.bevel());

        canvas.advance(geom.segment_advance(text_width));
    }

    fn draw_global_border(&self, canvas: &mut Canvas) {
        let rect = Rect::new(0, 0, canvas.dw().saturating_add(1), canvas.dh());
        canvas.draw_bevel(rect, self.base.bevel());
        canvas.advance(1);
    }
}

fn targeted(canvases: &mut [Canvas], target: Target) -> impl Iterator<Item = &mut Canvas> {
    canvases
        .iter_mut()
        .enumerate()
        .filter(move |(i, _)| target.matches(*i))
        .map(|(_, canvas)| canvas)
}
