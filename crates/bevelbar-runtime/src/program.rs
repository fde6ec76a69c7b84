#![forbid(unsafe_code)]

//! The bar's frame pipeline.
//!
//! [`BarProgram`] owns the monitors, the renderer, and two sets of canvases.
//! Each frame is rendered into the back set while it is parsed; only when
//! the frame completes are the sets swapped and the result presented. A
//! malformed frame therefore never disturbs what is on screen, and the
//! error it returns is fatal to the caller.
//!
//! The last good frame is retained (its bytes and decoded operations) so an
//! expose notification can repaint it without reading new input.
//!
//! # Example
//!
//! ```
//! use bevelbar_core::geometry::Rect;
//! use bevelbar_core::input::InputBuffer;
//! use bevelbar_core::monitor::{MonitorSet, OutputInfo};
//! use bevelbar_render::{BlockFont, PackedRgba};
//! use bevelbar_runtime::headless::HeadlessDisplay;
//! use bevelbar_runtime::presenter::PlacementPolicy;
//! use bevelbar_runtime::program::BarProgram;
//! use bevelbar_style::{BaseColors, StyleTable};
//!
//! let mut display = HeadlessDisplay::new(vec![OutputInfo::active(Rect::new(0, 0, 800, 600))]);
//! let monitors = MonitorSet::discover(&display).unwrap();
//! let styles = StyleTable::from_specs(&["navy", "white", "blue", "black"]).unwrap();
//! let base = BaseColors::from_specs("gray20", "gray40", "gray10").unwrap();
//! let mut program = BarProgram::new(
//!     monitors,
//!     Box::new(BlockFont::default()),
//!     styles,
//!     base,
//!     PlacementPolicy::default(),
//! );
//!
//! program
//!     .handle_frame(InputBuffer::from_frame(&b"0\n0hello\ne\nf\n"[..]), &mut display)
//!     .unwrap();
//! assert_eq!(display.present_count(), 1);
//! ```

use std::mem;

use bevelbar_core::error::BarResult;
use bevelbar_core::input::InputBuffer;
use bevelbar_core::monitor::MonitorSet;
use bevelbar_core::protocol::{LayoutOp, ProtocolLimits};
use bevelbar_render::{Canvas, Font, FontGeometry};
use bevelbar_style::{BaseColors, StyleTable};

use crate::presenter::{DisplayBackend, PlacementPolicy, Presenter};
use crate::renderer::BevelRenderer;

/// Something that happened to the bar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BarEvent {
    /// A complete frame arrived on the input stream.
    Input(InputBuffer),
    /// The display server asked for a repaint.
    Expose,
}

/// A frame that rendered successfully.
#[derive(Debug, Clone)]
struct RetainedFrame {
    input: InputBuffer,
    ops: Vec<LayoutOp>,
}

/// Owns everything needed to turn frames into windows.
#[derive(Debug)]
pub struct BarProgram {
    monitors: MonitorSet,
    renderer: BevelRenderer,
    presenter: Presenter,
    front: Vec<Canvas>,
    back: Vec<Canvas>,
    retained: Option<RetainedFrame>,
    frames: u64,
}

impl BarProgram {
    /// Assemble a program. Canvases are allocated here, one per monitor.
    pub fn new(
        monitors: MonitorSet,
        font: Box<dyn Font>,
        styles: StyleTable,
        base: BaseColors,
        policy: PlacementPolicy,
    ) -> Self {
        let renderer = BevelRenderer::new(font, styles, base);
        let widths = || monitors.iter().map(|m| m.geometry().width);
        let front = renderer.canvases(widths());
        let back = renderer.canvases(widths());

        let geometry = renderer.geometry();
        tracing::info!(
            monitors = monitors.len(),
            styles = renderer.styles().len(),
            font_height = geometry.height,
            margin = geometry.margin,
            bar_height = geometry.bar_height(),
            "bar program ready"
        );

        Self {
            monitors,
            renderer,
            presenter: Presenter::new(policy),
            front,
            back,
            retained: None,
            frames: 0,
        }
    }

    /// Index bounds the input stream is checked against.
    pub fn limits(&self) -> ProtocolLimits {
        ProtocolLimits::new(self.monitors.len(), self.renderer.styles().len())
    }

    /// The discovered monitors.
    pub fn monitors(&self) -> &MonitorSet {
        &self.monitors
    }

    /// Bar geometry.
    pub fn geometry(&self) -> FontGeometry {
        self.renderer.geometry()
    }

    /// The committed canvases, one per monitor.
    pub fn canvases(&self) -> &[Canvas] {
        &self.front
    }

    /// Whether any frame has completed.
    pub fn has_frame(&self) -> bool {
        self.retained.is_some()
    }

    /// Number of frames that rendered successfully.
    pub fn frames_rendered(&self) -> u64 {
        self.frames
    }

    /// Render and present a newly read frame.
    ///
    /// On error the committed canvases and the retained frame are left as
    /// they were.
    pub fn handle_frame<B: DisplayBackend + ?Sized>(
        &mut self,
        input: InputBuffer,
        backend: &mut B,
    ) -> BarResult<()> {
        let limits = self.limits();
        let ops = match self.renderer.render(&mut self.back, input.as_bytes(), limits) {
            Ok(ops) => ops,
            Err(err) => {
                tracing::debug!(error = %err, bytes = input.len(), "frame rejected");
                return Err(err);
            }
        };

        mem::swap(&mut self.front, &mut self.back);
        self.frames += 1;
        tracing::debug!(
            frame = self.frames,
            ops = ops.len(),
            bytes = input.len(),
            "frame rendered"
        );
        self.retained = Some(RetainedFrame { input, ops });
        self.present(backend)
    }

    /// Repaint the last complete frame. Does nothing before the first one.
    pub fn redraw<B: DisplayBackend + ?Sized>(&mut self, backend: &mut B) -> BarResult<()> {
        let Some(frame) = &self.retained else {
            tracing::debug!("redraw before first frame ignored");
            return Ok(());
        };
        self.renderer
            .replay(&mut self.back, &frame.ops, frame.input.as_bytes())?;
        mem::swap(&mut self.front, &mut self.back);
        self.present(backend)
    }

    /// Dispatch one event.
    pub fn handle_event<B: DisplayBackend + ?Sized>(
        &mut self,
        event: BarEvent,
        backend: &mut B,
    ) -> BarResult<()> {
        match event {
            BarEvent::Input(input) => self.handle_frame(input, backend),
            BarEvent::Expose => self.redraw(backend),
        }
    }

    /// Drive the program from an event source until it runs dry or fails.
    pub fn run<I, B>(&mut self, events: I, backend: &mut B) -> BarResult<()>
    where
        I: IntoIterator<Item = BarResult<BarEvent>>,
        B: DisplayBackend + ?Sized,
    {
        for event in events {
            self.handle_event(event?, backend)?;
        }
        Ok(())
    }

    fn present<B: DisplayBackend + ?Sized>(&self, backend: &mut B) -> BarResult<()> {
        if self.retained.is_none() {
            return Ok(());
        }
        self.presenter.present(backend, &self.monitors, &self.front)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::headless::HeadlessDisplay;
    use bevelbar_core::error::BarError;
    use bevelbar_core::geometry::Rect;
    use bevelbar_core::monitor::OutputInfo;
    use bevelbar_core::protocol::ParseError;
    use bevelbar_render::BlockFont;

    fn setup() -> (BarProgram, HeadlessDisplay) {
        let display = HeadlessDisplay::new(vec![
            OutputInfo::active(Rect::new(0, 0, 640, 480)),
            OutputInfo::active(Rect::new(640, 0, 640, 480)),
        ]);
        let monitors = MonitorSet::discover(&display).unwrap();
        let styles = StyleTable::from_specs(&[
            "black", "white", "gray80", "gray20", //
            "navy", "yellow", "blue", "black",
        ])
        .unwrap();
        let base = BaseColors::from_specs("gray30", "gray60", "gray10").unwrap();
        let program = BarProgram::new(
            monitors,
            Box::new(BlockFont::new(4, 8, 2)),
            styles,
            base,
            PlacementPolicy::default(),
        );
        (program, display)
    }

    fn frame(bytes: &[u8]) -> InputBuffer {
        InputBuffer::from_frame(bytes)
    }

    #[test]
    fn redraw_before_first_frame_is_noop() {
        let (mut program, mut display) = setup();
        program.redraw(&mut display).unwrap();
        assert_eq!(display.present_count(), 0);
        assert!(!program.has_frame());
    }

    #[test]
    fn frame_presents_every_monitor() {
        let (mut program, mut display) = setup();
        program
            .handle_frame(frame(b"0\n1cpu\ne\nf\n"), &mut display)
            .unwrap();
        assert_eq!(display.present_count(), 2);
        assert!(display.window(0).is_some());
        assert!(display.window(1).is_some());
        assert_eq!(program.frames_rendered(), 1);
    }

    #[test]
    fn bad_frame_keeps_committed_canvases() {
        let (mut program, mut display) = setup();
        program
            .handle_frame(frame(b"a\n0ok\ne\nf\n"), &mut display)
            .unwrap();
        let committed = program.canvases().to_vec();

        let err = program
            .handle_frame(frame(b"a\n1first\n7bad\ne\nf\n"), &mut display)
            .unwrap_err();
        assert!(matches!(
            err,
            BarError::MalformedInput(ParseError::InvalidStyleIndex { byte: b'7', .. })
        ));
        assert_eq!(program.canvases(), committed.as_slice());
        assert_eq!(display.present_count(), 2);
        assert_eq!(program.frames_rendered(), 1);
    }

    #[test]
    fn expose_replays_identically() {
        let (mut program, mut display) = setup();
        program
            .handle_frame(frame(b"0\n0left\n-\n1x\ne\n1\n1right\ne\nf\n"), &mut display)
            .unwrap();
        let first: Vec<_> = (0..2).map(|i| display.window(i).cloned()).collect();
        program.handle_event(BarEvent::Expose, &mut display).unwrap();
        let second: Vec<_> = (0..2).map(|i| display.window(i).cloned()).collect();
        assert_eq!(first, second);
        assert_eq!(display.present_count(), 4);
    }

    #[test]
    fn run_stops_at_first_error() {
        let (mut program, mut display) = setup();
        let events = vec![
            Ok(BarEvent::Input(frame(b"f\n"))),
            Ok(BarEvent::Expose),
            Err(BarError::NoDisplaysFound),
            Ok(BarEvent::Expose),
        ];
        assert!(program.run(events, &mut display).is_err());
        assert_eq!(display.present_count(), 4);
    }
}
