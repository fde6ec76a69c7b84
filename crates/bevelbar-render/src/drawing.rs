#![forbid(unsafe_code)]

//! Drawing primitives for the canvas.
//!
//! Lines, filled rectangles, two-tone bevels, and text, on top of
//! [`Canvas::set_pixel`]. Everything clips silently at the canvas edge.

use bevelbar_core::geometry::Rect;

use crate::canvas::Canvas;
use crate::font::Font;
use crate::pixel::PackedRgba;

/// The two edge colors of a bevel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Bevel {
    /// Left and top edges.
    pub bright: PackedRgba,
    /// Right and bottom edges.
    pub dark: PackedRgba,
}

impl Bevel {
    /// Create a bevel from its bright and dark edge colors.
    #[inline]
    pub const fn new(bright: PackedRgba, dark: PackedRgba) -> Self {
        Self { bright, dark }
    }
}

/// Extension trait for drawing on a [`Canvas`].
pub trait Draw {
    /// Draw `width` pixels to the right of `(x, y)`, inclusive of `x`.
    fn draw_horizontal_line(&mut self, x: i32, y: i32, width: u32, color: PackedRgba);

    /// Draw `height` pixels below `(x, y)`, inclusive of `y`.
    fn draw_vertical_line(&mut self, x: i32, y: i32, height: u32, color: PackedRgba);

    /// Draw a filled rectangle.
    fn draw_rect_filled(&mut self, rect: Rect, color: PackedRgba);

    /// Draw a raised bevel on the outermost pixels of `rect`.
    ///
    /// The dark right column and bottom row go first, then the bright left
    /// column and top row, so the bright edge owns the top-right and
    /// bottom-left corners.
    fn draw_bevel(&mut self, rect: Rect, bevel: Bevel);

    /// Draw `text` with its baseline at `baseline`, starting at `x`.
    ///
    /// Returns the horizontal advance of the text.
    fn print_text(
        &mut self,
        font: &dyn Font,
        x: i32,
        baseline: i32,
        text: &str,
        color: PackedRgba,
    ) -> u32;
}

impl Draw for Canvas {
    fn draw_horizontal_line(&mut self, x: i32, y: i32, width: u32, color: PackedRgba) {
        self.fill(Rect::new(x, y, width, 1), color);
    }

    fn draw_vertical_line(&mut self, x: i32, y: i32, height: u32, color: PackedRgba) {
        self.fill(Rect::new(x, y, 1, height), color);
    }

    fn draw_rect_filled(&mut self, rect: Rect, color: PackedRgba) {
        self.fill(rect, color);
    }

    fn draw_bevel(&mut self, rect: Rect, bevel: Bevel) {
        if rect.is_empty() {
            return;
        }
        let right = rect.x.saturating_add_unsigned(rect.width - 1);
        let bottom = rect.y.saturating_add_unsigned(rect.height - 1);

        self.draw_vertical_line(right, rect.y, rect.height, bevel.dark);
        self.draw_horizontal_line(rect.x, bottom, rect.width, bevel.dark);

        self.draw_vertical_line(rect.x, rect.y, rect.height, bevel.bright);
        self.draw_horizontal_line(rect.x, rect.y, rect.width, bevel.bright);
    }

    fn print_text(
        &mut self,
        font: &dyn Font,
        x: i32,
        baseline: i32,
        text: &str,
        color: PackedRgba,
    ) -> u32 {
        font.draw_text(self, x, baseline, text, color);
        font.text_advance(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BG: PackedRgba = PackedRgba::BLACK;
    const BRIGHT: PackedRgba = PackedRgba::rgb(200, 200, 200);
    const DARK: PackedRgba = PackedRgba::rgb(50, 50, 50);
    const FILL: PackedRgba = PackedRgba::rgb(0, 0, 128);

    fn render(canvas: &Canvas) -> Vec<String> {
        (0..canvas.height() as i32)
            .map(|y| {
                (0..canvas.width() as i32)
                    .map(|x| match canvas.pixel(x, y) {
                        Some(BRIGHT) => 'B',
                        Some(DARK) => 'D',
                        Some(FILL) => '#',
                        Some(BG) => '.',
                        _ => '?',
                    })
                    .collect()
            })
            .collect()
    }

    #[test]
    fn horizontal_line_basic() {
        let mut canvas = Canvas::new(5, 1, BG);
        canvas.draw_horizontal_line(1, 0, 3, DARK);
        assert_eq!(render(&canvas), vec![".DDD."]);
    }

    #[test]
    fn vertical_line_clipped() {
        let mut canvas = Canvas::new(1, 3, BG);
        canvas.draw_vertical_line(0, 1, 10, DARK);
        assert_eq!(render(&canvas), vec![".", "D", "D"]);
    }

    #[test]
    fn zero_length_lines_draw_nothing() {
        let mut canvas = Canvas::new(3, 3, BG);
        canvas.draw_horizontal_line(0, 0, 0, DARK);
        canvas.draw_vertical_line(0, 0, 0, DARK);
        assert!(canvas.pixels().iter().all(|&p| p == BG));
    }

    #[test]
    fn bevel_corner_ownership() {
        let mut canvas = Canvas::new(6, 5, BG);
        canvas.draw_rect_filled(Rect::new(1, 1, 4, 3), FILL);
        canvas.draw_bevel(Rect::new(1, 1, 4, 3), Bevel::new(BRIGHT, DARK));
        assert_eq!(
            render(&canvas),
            vec![
                "......", //
                ".BBBB.",
                ".B##D.",
                ".BDDD.",
                "......",
            ]
        );
    }

    #[test]
    fn bevel_on_single_pixel_is_bright() {
        let mut canvas = Canvas::new(1, 1, BG);
        canvas.draw_bevel(Rect::new(0, 0, 1, 1), Bevel::new(BRIGHT, DARK));
        assert_eq!(render(&canvas), vec!["B"]);
    }

    #[test]
    fn empty_bevel_is_noop() {
        let mut canvas = Canvas::new(2, 2, BG);
        canvas.draw_bevel(Rect::new(0, 0, 0, 2), Bevel::new(BRIGHT, DARK));
        assert_eq!(render(&canvas), vec!["..", ".."]);
    }
}
