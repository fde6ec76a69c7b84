#![forbid(unsafe_code)]

//! Window placement and presentation.
//!
//! Each bar window is exactly as large as the used part of its canvas and
//! is pinned to one corner of its monitor, inset by the configured padding.

use bevelbar_core::error::BarResult;
use bevelbar_core::geometry::Rect;
use bevelbar_core::monitor::{Monitor, MonitorSet};
use bevelbar_render::{Canvas, Image};

/// Horizontal edge the bar hugs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HorizontalAnchor {
    /// Left edge.
    #[default]
    Left,
    /// Right edge.
    Right,
}

impl HorizontalAnchor {
    /// Anything starting with `left` anchors left; everything else right.
    pub fn from_arg(arg: &str) -> Self {
        if arg.starts_with("left") {
            Self::Left
        } else {
            Self::Right
        }
    }
}

/// Vertical edge the bar hugs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VerticalAnchor {
    /// Top edge.
    #[default]
    Top,
    /// Bottom edge.
    Bottom,
}

impl VerticalAnchor {
    /// Anything starting with `top` anchors top; everything else bottom.
    pub fn from_arg(arg: &str) -> Self {
        if arg.starts_with("top") {
            Self::Top
        } else {
            Self::Bottom
        }
    }
}

/// Where bars go on their monitors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PlacementPolicy {
    /// Horizontal anchor.
    pub horizontal: HorizontalAnchor,
    /// Vertical anchor.
    pub vertical: VerticalAnchor,
    /// Distance from the horizontal anchor edge.
    pub padding_x: i32,
    /// Distance from the vertical anchor edge.
    pub padding_y: i32,
}

impl PlacementPolicy {
    /// Window rectangle for a `width x height` bar on `monitor`.
    pub fn place(&self, monitor: Rect, width: u32, height: u32) -> Rect {
        let mx = i64::from(monitor.x);
        let my = i64::from(monitor.y);
        let x = match self.horizontal {
            HorizontalAnchor::Left => mx + i64::from(self.padding_x),
            HorizontalAnchor::Right => {
                mx + i64::from(monitor.width) - i64::from(width) - i64::from(self.padding_x)
            }
        };
        let y = match self.vertical {
            VerticalAnchor::Top => my + i64::from(self.padding_y),
            VerticalAnchor::Bottom => {
                my + i64::from(monitor.height) - i64::from(height) - i64::from(self.padding_y)
            }
        };
        Rect::new(clamp_i32(x), clamp_i32(y), width, height)
    }
}

#[inline]
fn clamp_i32(v: i64) -> i32 {
    v.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
}

/// Window-system side of presentation.
pub trait DisplayBackend {
    /// Show `image` in the bar window of `monitor`, moved and resized to
    /// exactly `placement`.
    fn present(&mut self, monitor: &Monitor, placement: Rect, image: &Image) -> BarResult<()>;
}

/// Copies each canvas's visible region to its window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Presenter {
    policy: PlacementPolicy,
}

impl Presenter {
    /// Create a presenter for `policy`.
    pub const fn new(policy: PlacementPolicy) -> Self {
        Self { policy }
    }

    /// Present every monitor's canvas.
    pub fn present<B: DisplayBackend + ?Sized>(
        &self,
        backend: &mut B,
        monitors: &MonitorSet,
        canvases: &[Canvas],
    ) -> BarResult<()> {
        for (monitor, canvas) in monitors.iter().zip(canvases) {
            let image = canvas.visible();
            let placement = self
                .policy
                .place(monitor.geometry(), image.width(), image.height());
            tracing::trace!(
                monitor = monitor.index(),
                x = placement.x,
                y = placement.y,
                width = placement.width,
                height = placement.height,
                "present"
            );
            backend.present(monitor, placement, &image)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MONITOR: Rect = Rect::new(1920, 0, 1280, 1024);

    fn policy(h: HorizontalAnchor, v: VerticalAnchor) -> PlacementPolicy {
        PlacementPolicy {
            horizontal: h,
            vertical: v,
            padding_x: 10,
            padding_y: 5,
        }
    }

    #[test]
    fn anchors_from_args() {
        assert_eq!(HorizontalAnchor::from_arg("left"), HorizontalAnchor::Left);
        assert_eq!(HorizontalAnchor::from_arg("leftish"), HorizontalAnchor::Left);
        assert_eq!(HorizontalAnchor::from_arg("right"), HorizontalAnchor::Right);
        assert_eq!(HorizontalAnchor::from_arg("Left"), HorizontalAnchor::Right);
        assert_eq!(VerticalAnchor::from_arg("top"), VerticalAnchor::Top);
        assert_eq!(VerticalAnchor::from_arg("bottom"), VerticalAnchor::Bottom);
        assert_eq!(VerticalAnchor::from_arg(""), VerticalAnchor::Bottom);
    }

    #[test]
    fn top_left() {
        let p = policy(HorizontalAnchor::Left, VerticalAnchor::Top);
        assert_eq!(p.place(MONITOR, 300, 20), Rect::new(1930, 5, 300, 20));
    }

    #[test]
    fn bottom_right() {
        let p = policy(HorizontalAnchor::Right, VerticalAnchor::Bottom);
        // x = 1920 + 1280 - 300 - 10, y = 0 + 1024 - 20 - 5
        assert_eq!(p.place(MONITOR, 300, 20), Rect::new(2890, 999, 300, 20));
    }

    #[test]
    fn negative_padding_and_oversized_bar() {
        let p = PlacementPolicy {
            horizontal: HorizontalAnchor::Right,
            vertical: VerticalAnchor::Top,
            padding_x: -4,
            padding_y: -2,
        };
        assert_eq!(p.place(MONITOR, 2000, 20), Rect::new(1204, -2, 2000, 20));
    }
}
