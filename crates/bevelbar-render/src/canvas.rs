#![forbid(unsafe_code)]

//! Per-monitor pixel canvas with a horizontal write cursor.
//!
//! A [`Canvas`] is as wide as its monitor and as tall as one bar. Segments
//! are laid out left to right: `dw` is the next free column and `dh` the
//! fixed bar height. Only the `[0, dw) x [0, dh)` region is ever shown.

use bevelbar_core::geometry::Rect;

use crate::pixel::PackedRgba;

/// Row-major RGBA pixels plus the layout cursor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Canvas {
    width: u32,
    height: u32,
    pixels: Vec<PackedRgba>,
    background: PackedRgba,
    dw: u32,
    dh: u32,
}

impl Canvas {
    /// Create a canvas filled with `background`, cursor at column 1.
    pub fn new(width: u32, height: u32, background: PackedRgba) -> Self {
        Self {
            width,
            height,
            pixels: vec![background; width as usize * height as usize],
            background,
            dw: 1,
            dh: height,
        }
    }

    /// Start a new frame: fill with `background`, set the height to `dh`,
    /// and put the cursor at column 1 (column 0 belongs to the border).
    pub fn reset(&mut self, background: PackedRgba, dh: u32) {
        let len = self.width as usize * dh as usize;
        if dh != self.height {
            #[cfg(feature = "tracing")]
            tracing::debug!(width = self.width, from = self.height, to = dh, "canvas resize");
            self.height = dh;
        }
        self.pixels.clear();
        self.pixels.resize(len, background);
        self.background = background;
        self.dw = 1;
        self.dh = dh;
    }

    /// Width in pixels (the monitor width).
    #[inline]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    #[inline]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Next free column.
    #[inline]
    pub const fn dw(&self) -> u32 {
        self.dw
    }

    /// Bar height.
    #[inline]
    pub const fn dh(&self) -> u32 {
        self.dh
    }

    /// Move the cursor right. Never moves left.
    #[inline]
    pub fn advance(&mut self, by: u32) {
        self.dw = self.dw.saturating_add(by);
    }

    /// All pixels, row-major.
    #[inline]
    pub fn pixels(&self) -> &[PackedRgba] {
        &self.pixels
    }

    /// The canvas bounds as a rectangle at the origin.
    #[inline]
    pub const fn bounds(&self) -> Rect {
        Rect::from_size(self.width, self.height)
    }

    #[inline]
    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if !self.bounds().contains(x, y) {
            return None;
        }
        Some(y as usize * self.width as usize + x as usize)
    }

    /// Pixel at `(x, y)`, or `None` outside the canvas.
    #[inline]
    pub fn pixel(&self, x: i32, y: i32) -> Option<PackedRgba> {
        self.index(x, y).map(|i| self.pixels[i])
    }

    /// Set a pixel; writes outside the canvas are dropped.
    #[inline]
    pub fn set_pixel(&mut self, x: i32, y: i32, color: PackedRgba) {
        if let Some(i) = self.index(x, y) {
            self.pixels[i] = color.opaque();
        }
    }

    /// Blend `color` into a pixel at glyph `coverage`.
    #[inline]
    pub fn blend_pixel(&mut self, x: i32, y: i32, color: PackedRgba, coverage: u8) {
        if coverage == 0 {
            return;
        }
        if let Some(i) = self.index(x, y) {
            self.pixels[i] = color.blend(self.pixels[i], coverage);
        }
    }

    /// Fill the part of `rect` that lies on the canvas.
    pub fn fill(&mut self, rect: Rect, color: PackedRgba) {
        let Some(clip) = rect.intersection_opt(&self.bounds()) else {
            return;
        };
        let width = self.width as usize;
        let x0 = clip.x as usize;
        let x1 = x0 + clip.width as usize;
        for y in clip.y as usize..clip.y as usize + clip.height as usize {
            self.pixels[y * width + x0..y * width + x1].fill(color.opaque());
        }
    }

    /// Copy the top-left `width x height` region into an [`Image`].
    ///
    /// Pixels outside the canvas read as the background.
    pub fn snapshot(&self, width: u32, height: u32) -> Image {
        let mut pixels = Vec::with_capacity(width as usize * height as usize);
        for y in 0..height {
            for x in 0..width {
                let px = i32::try_from(x)
                    .ok()
                    .zip(i32::try_from(y).ok())
                    .and_then(|(x, y)| self.pixel(x, y));
                pixels.push(px.unwrap_or(self.background));
            }
        }
        Image {
            width,
            height,
            pixels,
        }
    }

    /// The region that gets presented: `dw x dh`.
    pub fn visible(&self) -> Image {
        self.snapshot(self.dw, self.dh)
    }
}

/// An owned, immutable block of pixels handed to a display backend.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Image {
    width: u32,
    height: u32,
    pixels: Vec<PackedRgba>,
}

impl Image {
    /// Width in pixels.
    #[inline]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    #[inline]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Pixel at `(x, y)`.
    #[inline]
    pub fn get(&self, x: u32, y: u32) -> Option<PackedRgba> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.pixels
            .get(y as usize * self.width as usize + x as usize)
            .copied()
    }

    /// All pixels, row-major.
    #[inline]
    pub fn pixels(&self) -> &[PackedRgba] {
        &self.pixels
    }

    /// Write `0x00RRGGBB` words into `out`, row-major, stopping at whichever
    /// is shorter.
    pub fn write_xrgb(&self, out: &mut [u32]) {
        for (dst, src) in out.iter_mut().zip(&self.pixels) {
            *dst = src.to_xrgb();
        }
    }
}
