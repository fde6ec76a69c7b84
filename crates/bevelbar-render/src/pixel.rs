#![forbid(unsafe_code)]

//! Packed pixel colors.

/// A compact RGBA color.
///
/// - **Size:** 4 bytes.
/// - **Layout:** `0xRRGGBBAA` (R in bits 31..24, A in bits 7..0).
///
/// Canvases are opaque; alpha only matters while compositing glyph coverage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
#[repr(transparent)]
pub struct PackedRgba(pub u32);

impl PackedRgba {
    /// Opaque black.
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    /// Opaque white.
    pub const WHITE: Self = Self::rgb(255, 255, 255);

    /// Create an opaque RGB color (alpha = 255).
    #[inline]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::rgba(r, g, b, 255)
    }

    /// Create an RGBA color with explicit alpha.
    #[inline]
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self(((r as u32) << 24) | ((g as u32) << 16) | ((b as u32) << 8) | (a as u32))
    }

    /// Red channel.
    #[inline]
    pub const fn r(self) -> u8 {
        (self.0 >> 24) as u8
    }

    /// Green channel.
    #[inline]
    pub const fn g(self) -> u8 {
        (self.0 >> 16) as u8
    }

    /// Blue channel.
    #[inline]
    pub const fn b(self) -> u8 {
        (self.0 >> 8) as u8
    }

    /// Alpha channel.
    #[inline]
    pub const fn a(self) -> u8 {
        self.0 as u8
    }

    /// The same color with alpha forced to 255.
    #[inline]
    pub const fn opaque(self) -> Self {
        Self(self.0 | 0xff)
    }

    /// `0x00RRGGBB`, the layout most window-system framebuffers expect.
    #[inline]
    pub const fn to_xrgb(self) -> u32 {
        self.0 >> 8
    }

    #[inline]
    const fn mix_channel(src: u8, dst: u8, coverage: u8) -> u8 {
        let c = coverage as u32;
        ((src as u32 * c + dst as u32 * (255 - c) + 127) / 255) as u8
    }

    /// Paint `self` over `dst` at `coverage` (0 = untouched, 255 = replaced).
    ///
    /// The result is always opaque.
    #[inline]
    pub const fn blend(self, dst: Self, coverage: u8) -> Self {
        match coverage {
            0 => dst.opaque(),
            255 => self.opaque(),
            c => Self::rgb(
                Self::mix_channel(self.r(), dst.r(), c),
                Self::mix_channel(self.g(), dst.g(), c),
                Self::mix_channel(self.b(), dst.b(), c),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn channels_roundtrip() {
        let c = PackedRgba::rgba(0x12, 0x34, 0x56, 0x78);
        assert_eq!((c.r(), c.g(), c.b(), c.a()), (0x12, 0x34, 0x56, 0x78));
        assert_eq!(c.0, 0x1234_5678);
    }

    #[test]
    fn xrgb_drops_alpha() {
        assert_eq!(PackedRgba::rgb(0xab, 0xcd, 0xef).to_xrgb(), 0x00ab_cdef);
    }

    #[test]
    fn blend_extremes() {
        let fg = PackedRgba::WHITE;
        let bg = PackedRgba::rgb(10, 20, 30);
        assert_eq!(fg.blend(bg, 0), bg);
        assert_eq!(fg.blend(bg, 255), fg);
    }

    #[test]
    fn blend_midpoint_rounds() {
        let mid = PackedRgba::WHITE.blend(PackedRgba::BLACK, 128);
        assert_eq!(mid, PackedRgba::rgb(128, 128, 128));
        assert_eq!(mid.a(), 255);
    }
}
