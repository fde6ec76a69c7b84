#![forbid(unsafe_code)]

//! Headless display: virtual outputs and recorded windows.
//!
//! Stands in for a display server in tests and in `--headless` runs. It
//! reports a fixed list of outputs and keeps the last image and placement
//! presented for each monitor.

use std::collections::BTreeMap;

use bevelbar_core::error::BarResult;
use bevelbar_core::geometry::Rect;
use bevelbar_core::monitor::{Monitor, OutputInfo, OutputSource};
use bevelbar_render::Image;

use crate::presenter::DisplayBackend;

/// The state of one bar window after a present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresentedWindow {
    /// Window rectangle in root coordinates.
    pub placement: Rect,
    /// Window contents.
    pub image: Image,
}

/// In-memory display.
#[derive(Debug, Clone, Default)]
pub struct HeadlessDisplay {
    outputs: Vec<OutputInfo>,
    windows: BTreeMap<usize, PresentedWindow>,
    presents: u64,
}

impl HeadlessDisplay {
    /// A display with the given candidate outputs.
    pub fn new(outputs: Vec<OutputInfo>) -> Self {
        Self {
            outputs,
            windows: BTreeMap::new(),
            presents: 0,
        }
    }

    /// Last window state of monitor `index`.
    pub fn window(&self, index: usize) -> Option<&PresentedWindow> {
        self.windows.get(&index)
    }

    /// All windows, in monitor order.
    pub fn windows(&self) -> impl Iterator<Item = (usize, &PresentedWindow)> {
        self.windows.iter().map(|(i, w)| (*i, w))
    }

    /// Total number of per-monitor presents.
    pub fn present_count(&self) -> u64 {
        self.presents
    }
}

impl OutputSource for HeadlessDisplay {
    fn outputs(&self) -> BarResult<Vec<OutputInfo>> {
        Ok(self.outputs.clone())
    }
}

impl DisplayBackend for HeadlessDisplay {
    fn present(&mut self, monitor: &Monitor, placement: Rect, image: &Image) -> BarResult<()> {
        self.presents += 1;
        self.windows.insert(
            monitor.index(),
            PresentedWindow {
                placement,
                image: image.clone(),
            },
        );
        Ok(())
    }
}
