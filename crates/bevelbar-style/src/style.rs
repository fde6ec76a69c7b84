#![forbid(unsafe_code)]

//! Segment styles and the base colors of the bar.

use bevelbar_core::error::BarError;
use bevelbar_render::{Bevel, PackedRgba};
use thiserror::Error;

use crate::color::{ColorParseError, parse_color};

/// The colors of one segment style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Style {
    /// Box background.
    pub fill: PackedRgba,
    /// Text color.
    pub text: PackedRgba,
    /// Left and top bevel edges.
    pub bright: PackedRgba,
    /// Right and bottom bevel edges.
    pub dark: PackedRgba,
}

impl Style {
    /// The bevel edge colors of this style.
    #[inline]
    pub const fn bevel(&self) -> Bevel {
        Bevel::new(self.bright, self.dark)
    }
}

/// Canvas background and the colors of the outer border.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BaseColors {
    /// Canvas background.
    pub fill: PackedRgba,
    /// Left and top edge of the outer border.
    pub bright: PackedRgba,
    /// Right and bottom edge of the outer border.
    pub dark: PackedRgba,
}

impl BaseColors {
    /// Parse the three base color specs: fill, bright, dark.
    pub fn from_specs(fill: &str, bright: &str, dark: &str) -> Result<Self, StyleError> {
        let parse = |role: &'static str, spec: &str| {
            parse_color(spec).map_err(|source| StyleError::BaseColor { role, source })
        };
        Ok(Self {
            fill: parse("fill", fill)?,
            bright: parse("bright", bright)?,
            dark: parse("dark", dark)?,
        })
    }

    /// The outer border colors.
    #[inline]
    pub const fn bevel(&self) -> Bevel {
        Bevel::new(self.bright, self.dark)
    }
}

/// Why a style table could not be built.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StyleError {
    /// Style colors did not come in groups of four.
    #[error("style colors must come in groups of four, got {count}")]
    IncompleteGroup {
        /// Number of style color specs given.
        count: usize,
    },
    /// A base color failed to parse.
    #[error("base {role} color: {source}")]
    BaseColor {
        /// `fill`, `bright`, or `dark`.
        role: &'static str,
        /// Underlying parse failure.
        source: ColorParseError,
    },
    /// A style color failed to parse.
    #[error("style {style} color {slot}: {source}")]
    StyleColor {
        /// Index of the style.
        style: usize,
        /// Position within the group (0 fill, 1 text, 2 bright, 3 dark).
        slot: usize,
        /// Underlying parse failure.
        source: ColorParseError,
    },
}

impl From<StyleError> for BarError {
    fn from(err: StyleError) -> Self {
        let name = match &err {
            StyleError::IncompleteGroup { count } => format!("{count} style colors"),
            StyleError::BaseColor { source, .. } | StyleError::StyleColor { source, .. } => {
                match source {
                    ColorParseError::Empty => String::new(),
                    ColorParseError::Malformed(spec) | ColorParseError::UnknownName(spec) => {
                        spec.clone()
                    }
                }
            }
        };
        let kind = match err {
            StyleError::IncompleteGroup { .. } => "styles",
            _ => "color",
        };
        BarError::resource(kind, name, err)
    }
}

/// The ordered, immutable table of segment styles.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StyleTable {
    styles: Vec<Style>,
}

impl StyleTable {
    /// Build a table from already-parsed styles.
    pub fn new(styles: Vec<Style>) -> Self {
        Self { styles }
    }

    /// Parse style color specs in groups of four: fill, text, bright, dark.
    ///
    /// An empty list is a valid, empty table; any segment drawn with it is
    /// then rejected by the parser.
    pub fn from_specs<S: AsRef<str>>(specs: &[S]) -> Result<Self, StyleError> {
        if specs.len() % 4 != 0 {
            return Err(StyleError::IncompleteGroup { count: specs.len() });
        }

        let mut styles = Vec::with_capacity(specs.len() / 4);
        for (style, group) in specs.chunks_exact(4).enumerate() {
            let mut colors = [PackedRgba::BLACK; 4];
            for (slot, spec) in group.iter().enumerate() {
                colors[slot] = parse_color(spec.as_ref())
                    .map_err(|source| StyleError::StyleColor { style, slot, source })?;
            }
            let [fill, text, bright, dark] = colors;
            styles.push(Style {
                fill,
                text,
                bright,
                dark,
            });
        }

        tracing::debug!(styles = styles.len(), "style table loaded");
        Ok(Self { styles })
    }

    /// Number of styles.
    #[inline]
    pub fn len(&self) -> usize {
        self.styles.len()
    }

    /// Whether the table is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.styles.is_empty()
    }

    /// Style by index.
    #[inline]
    pub fn get(&self, index: usize) -> Option<&Style> {
        self.styles.get(index)
    }

    /// Iterate in index order.
    pub fn iter(&self) -> std::slice::Iter<'_, Style> {
        self.styles.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn groups_of_four() {
        let table = StyleTable::from_specs(&[
            "#000000", "#ffffff", "#808080", "#404040", //
            "red", "white", "pink", "darkred",
        ])
        .unwrap();
        assert_eq!(table.len(), 2);
        let second = table.get(1).unwrap();
        assert_eq!(second.fill, PackedRgba::rgb(255, 0, 0));
        assert_eq!(second.bevel(), Bevel::new(PackedRgba::rgb(255, 192, 203), PackedRgba::rgb(139, 0, 0)));
        assert!(table.get(2).is_none());
    }

    #[test]
    fn empty_table_is_allowed() {
        let table = StyleTable::from_specs::<&str>(&[]).unwrap();
        assert!(table.is_empty());
    }

    #[test]
    fn incomplete_group_is_rejected() {
        let err = StyleTable::from_specs(&["red", "white", "pink"]).unwrap_err();
        assert_eq!(err, StyleError::IncompleteGroup { count: 3 });
        let bar: BarError = err.into();
        assert!(matches!(bar, BarError::ResourceLoadFailure { kind: "styles", .. }));
    }

    #[test]
    fn bad_style_color_names_its_position() {
        let err = StyleTable::from_specs(&["red", "white", "pink", "nope"]).unwrap_err();
        assert!(matches!(err, StyleError::StyleColor { style: 0, slot: 3, .. }));
        let bar: BarError = err.into();
        assert_eq!(
            bar.to_string(),
            "cannot load color 'nope': style 0 color 3: unknown color name 'nope'"
        );
    }

    #[test]
    fn base_colors_parse_in_order() {
        let base = BaseColors::from_specs("black", "#fff", "gray30").unwrap();
        assert_eq!(base.fill, PackedRgba::BLACK);
        assert_eq!(base.bright, PackedRgba::rgb(0xf0, 0xf0, 0xf0));
        assert_eq!(base.dark, PackedRgba::rgb(77, 77, 77));
        assert!(matches!(
            BaseColors::from_specs("black", "bogus", "white"),
            Err(StyleError::BaseColor { role: "bright", .. })
        ));
    }
}
