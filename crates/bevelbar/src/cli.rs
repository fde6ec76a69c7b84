#![forbid(unsafe_code)]

//! Command-line surface.
//!
//! ```text
//! bevelbar HORIZ VERT PADX PADY FONT FILL BRIGHT DARK [STYLE...]
//! ```
//!
//! `HORIZ` starting with `left` anchors bars to the left edge, anything else
//! to the right; `VERT` starting with `top` anchors to the top, anything
//! else to the bottom. `STYLE` colors come in groups of four: fill, text,
//! bright, dark.

use std::str::FromStr;

use bevelbar_core::error::BarResult;
use bevelbar_core::geometry::Rect;
use bevelbar_core::monitor::OutputInfo;
use bevelbar_runtime::{HorizontalAnchor, PlacementPolicy, VerticalAnchor};
use bevelbar_style::{BaseColors, StyleTable};
use clap::Parser;
use thiserror::Error;

use crate::font::FontSpec;

/// Virtual output used by `--headless` when none is given.
pub const DEFAULT_OUTPUT: Rect = Rect::new(0, 0, 1920, 1080);

/// Rejected option value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SpecError {
    /// Font spec that is not `PATH[:size=PX]`.
    #[error("invalid font spec '{spec}': {reason}")]
    Font {
        /// The argument as given.
        spec: String,
        /// What is wrong with it.
        reason: &'static str,
    },
    /// Output geometry that is not `WxH+X+Y`.
    #[error("invalid output geometry '{0}': expected WxH+X+Y")]
    Output(String),
}

impl SpecError {
    pub(crate) fn font(spec: &str, reason: &'static str) -> Self {
        Self::Font {
            spec: spec.to_owned(),
            reason,
        }
    }
}

/// Geometry of one virtual output, X11 style: `WxH+X+Y`.
///
/// Offsets may be negative (`1280x1024-1280+0`) and may be omitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputSpec(pub Rect);

impl FromStr for OutputSpec {
    type Err = SpecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_geometry(s)
            .map(Self)
            .ok_or_else(|| SpecError::Output(s.to_owned()))
    }
}

fn parse_geometry(s: &str) -> Option<Rect> {
    let (width, rest) = s.split_once('x')?;
    let split = rest.find(['+', '-']).unwrap_or(rest.len());
    let (height, offsets) = rest.split_at(split);
    let (x, y) = if offsets.is_empty() {
        (0, 0)
    } else {
        let second = offsets.get(1..)?.find(['+', '-'])? + 1;
        let (x, y) = offsets.split_at(second);
        (x.parse().ok()?, y.parse().ok()?)
    };
    Some(Rect::new(x, y, width.parse().ok()?, height.parse().ok()?))
}

/// Raw command line.
#[derive(Debug, Parser)]
#[command(
    name = "bevelbar",
    version,
    about = "Status bar that paints bevelled text segments read from stdin"
)]
pub struct Cli {
    /// Horizontal anchor: `left` or `right`.
    pub horiz_anchor: String,

    /// Vertical anchor: `top` or `bottom`.
    pub vert_anchor: String,

    /// Distance in pixels from the horizontal anchor edge.
    #[arg(allow_negative_numbers = true)]
    pub horiz_padding: i32,

    /// Distance in pixels from the vertical anchor edge.
    #[arg(allow_negative_numbers = true)]
    pub vert_padding: i32,

    /// Font: `PATH[:size=PX]`, or `builtin`.
    pub font: FontSpec,

    /// Global fill color.
    pub fill: String,

    /// Global bright bevel color.
    pub bright: String,

    /// Global dark bevel color.
    pub dark: String,

    /// Style colors, four per style: fill, text, bright, dark.
    #[arg(value_name = "STYLE")]
    pub styles: Vec<String>,

    /// Run without a display server, printing placements to stdout.
    #[arg(long)]
    pub headless: bool,

    /// Virtual output for `--headless` (repeatable).
    #[arg(long = "output", value_name = "WxH+X+Y", requires = "headless")]
    pub outputs: Vec<OutputSpec>,

    /// Log filter, e.g. `debug` or `bevelbar_runtime=trace`.
    #[arg(long, value_name = "FILTER")]
    pub log_level: Option<String>,
}

/// Validated configuration.
#[derive(Debug)]
pub struct Config {
    pub policy: PlacementPolicy,
    pub font: FontSpec,
    pub base: BaseColors,
    pub styles: StyleTable,
    pub headless: bool,
    /// Virtual outputs; only used when `headless`.
    pub outputs: Vec<OutputInfo>,
}

impl Cli {
    /// Resolve colors and placement. Bad colors or an incomplete style
    /// group fail with `ResourceLoadFailure`.
    pub fn into_config(self) -> BarResult<Config> {
        let base = BaseColors::from_specs(&self.fill, &self.bright, &self.dark)?;
        let styles = StyleTable::from_specs(&self.styles)?;
        let policy = PlacementPolicy {
            horizontal: HorizontalAnchor::from_arg(&self.horiz_anchor),
            vertical: VerticalAnchor::from_arg(&self.vert_anchor),
            padding_x: self.horiz_padding,
            padding_y: self.vert_padding,
        };

        let outputs = if self.outputs.is_empty() {
            vec![OutputInfo::active(DEFAULT_OUTPUT).with_name("virtual-0")]
        } else {
            self.outputs
                .iter()
                .enumerate()
                .map(|(i, spec)| OutputInfo::active(spec.0).with_name(format!("virtual-{i}")))
                .collect()
        };

        Ok(Config {
            policy,
            font: self.font,
            base,
            styles,
            headless: self.headless,
            outputs,
        })
    }
}
