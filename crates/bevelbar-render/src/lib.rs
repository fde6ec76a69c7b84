#![forbid(unsafe_code)]

//! Render kernel: packed pixels, per-monitor canvases, bevels, and fonts.

pub mod canvas;
pub mod drawing;
pub mod font;
pub mod pixel;

pub use canvas::{Canvas, Image};
pub use drawing::{Bevel, Draw};
pub use font::{BlockFont, Font, FontGeometry, FontMetrics};
pub use pixel::PackedRgba;
