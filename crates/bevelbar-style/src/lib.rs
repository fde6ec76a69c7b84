#![forbid(unsafe_code)]

//! Colors and styles: color spec parsing, segment styles, base colors.

pub mod color;
pub mod style;

pub use color::{ColorParseError, parse_color};
pub use style::{BaseColors, Style, StyleError, StyleTable};
