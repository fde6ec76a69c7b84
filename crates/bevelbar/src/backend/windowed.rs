#![forbid(unsafe_code)]

//! winit + softbuffer backend.
//!
//! One borderless, always-on-top window per monitor, painted from the
//! canvas snapshot on the CPU. Stdin is read on its own thread, which only
//! assembles complete frames and forwards them to the event loop; parsing,
//! rendering and presentation all happen on the event-loop thread.

use std::io;
use std::num::NonZeroU32;
use std::rc::Rc;
use std::thread;

use bevelbar_core::error::{BarError, BarResult};
use bevelbar_core::geometry::Rect;
use bevelbar_core::input::{FrameReader, InputBuffer};
use bevelbar_core::monitor::{Monitor, MonitorSet, OutputInfo, OutputSource};
use bevelbar_render::{Font, Image};
use bevelbar_runtime::{BarEvent, BarProgram, DisplayBackend};
use softbuffer::{Context, Surface};
use winit::application::ApplicationHandler;
use winit::dpi::{PhysicalPosition, PhysicalSize};
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, EventLoop, EventLoopProxy};
use winit::window::{Window, WindowId, WindowLevel};

use crate::cli::Config;

fn display_err(err: impl std::fmt::Display) -> BarError {
    BarError::Display(err.to_string())
}

/// Messages from the stdin thread.
enum UserEvent {
    Frame(InputBuffer),
    InputFailed(BarError),
}

/// Monitors as reported by winit.
struct WinitOutputs<'a>(&'a ActiveEventLoop);

impl OutputSource for WinitOutputs<'_> {
    fn outputs(&self) -> BarResult<Vec<OutputInfo>> {
        Ok(self
            .0
            .available_monitors()
            .map(|handle| {
                let pos = handle.position();
                let size = handle.size();
                // winit only lists outputs that are currently driven.
                OutputInfo {
                    name: handle.name(),
                    geometry: Rect::new(pos.x, pos.y, size.width, size.height),
                    has_mode: true,
                    connected: 1,
                }
            })
            .collect())
    }
}

struct BarWindow {
    window: Rc<Window>,
    surface: Surface<Rc<Window>, Rc<Window>>,
    _context: Context<Rc<Window>>,
    placement: Option<Rect>,
}

impl BarWindow {
    fn create(event_loop: &ActiveEventLoop, monitor: &Monitor) -> BarResult<Self> {
        let g = monitor.geometry();
        let attrs = Window::default_attributes()
            .with_title("bevelbar")
            .with_decorations(false)
            .with_resizable(false)
            .with_visible(false)
            .with_window_level(WindowLevel::AlwaysOnTop)
            .with_position(PhysicalPosition::new(g.x, g.y))
            .with_inner_size(PhysicalSize::new(1u32, 1u32));
        #[cfg(target_os = "linux")]
        let attrs = {
            use winit::platform::x11::WindowAttributesExtX11;
            attrs.with_override_redirect(true)
        };

        let window = Rc::new(event_loop.create_window(attrs).map_err(display_err)?);
        let context = Context::new(Rc::clone(&window)).map_err(display_err)?;
        let surface = Surface::new(&context, Rc::clone(&window)).map_err(display_err)?;
        tracing::debug!(monitor = monitor.index(), "window created");
        Ok(Self {
            window,
            surface,
            _context: context,
            placement: None,
        })
    }
}

struct WinitDisplay {
    windows: Vec<BarWindow>,
}

impl DisplayBackend for WinitDisplay {
    fn present(&mut self, monitor: &Monitor, placement: Rect, image: &Image) -> BarResult<()> {
        let bar = self
            .windows
            .get_mut(monitor.index())
            .ok_or_else(|| BarError::Display(format!("no window for monitor {}", monitor.index())))?;
        let (Some(width), Some(height)) =
            (NonZeroU32::new(image.width()), NonZeroU32::new(image.height()))
        else {
            return Ok(());
        };

        // Moving or resizing an unchanged window would only queue another expose.
        if bar.placement != Some(placement) {
            bar.window
                .set_outer_position(PhysicalPosition::new(placement.x, placement.y));
            let _ = bar
                .window
                .request_inner_size(PhysicalSize::new(placement.width, placement.height));
            bar.placement = Some(placement);
        }

        bar.surface.resize(width, height).map_err(display_err)?;
        let mut buffer = bar.surface.buffer_mut().map_err(display_err)?;
        image.write_xrgb(&mut buffer);
        buffer.present().map_err(display_err)?;
        bar.window.set_visible(true);
        Ok(())
    }
}

/// Inputs kept until the event loop can open windows.
struct Pending {
    font: Box<dyn Font>,
    config: Config,
}

struct Running {
    program: BarProgram,
    display: WinitDisplay,
}

struct BarApp {
    pending: Option<Pending>,
    running: Option<Running>,
    /// Latest frame that arrived before the windows existed.
    queued: Option<InputBuffer>,
    error: Option<BarError>,
}

impl BarApp {
    fn fail(&mut self, event_loop: &ActiveEventLoop, err: BarError) {
        tracing::debug!(error = %err, "stopping event loop");
        if self.error.is_none() {
            self.error = Some(err);
        }
        event_loop.exit();
    }

    fn start(&mut self, event_loop: &ActiveEventLoop) -> BarResult<()> {
        let Some(Pending { font, config }) = self.pending.take() else {
            return Ok(());
        };

        let monitors = MonitorSet::discover(&WinitOutputs(event_loop))?;
        let windows = monitors
            .iter()
            .map(|monitor| BarWindow::create(event_loop, monitor))
            .collect::<BarResult<Vec<_>>>()?;
        let program = BarProgram::new(monitors, font, config.styles, config.base, config.policy);
        let mut running = Running {
            program,
            display: WinitDisplay { windows },
        };

        if let Some(frame) = self.queued.take() {
            running.program.handle_frame(frame, &mut running.display)?;
        }
        self.running = Some(running);
        Ok(())
    }

    fn dispatch(&mut self, event: BarEvent) -> BarResult<()> {
        match (self.running.as_mut(), event) {
            (Some(running), event) => running.program.handle_event(event, &mut running.display),
            (None, BarEvent::Input(frame)) => {
                self.queued = Some(frame);
                Ok(())
            }
            (None, BarEvent::Expose) => Ok(()),
        }
    }
}

impl ApplicationHandler<UserEvent> for BarApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if let Err(err) = self.start(event_loop) {
            self.fail(event_loop, err);
        }
    }

    fn user_event(&mut self, event_loop: &ActiveEventLoop, event: UserEvent) {
        let result = match event {
            UserEvent::Frame(frame) => self.dispatch(BarEvent::Input(frame)),
            UserEvent::InputFailed(err) => Err(err),
        };
        if let Err(err) = result {
            self.fail(event_loop, err);
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        let result = match event {
            WindowEvent::RedrawRequested => self.dispatch(BarEvent::Expose),
            WindowEvent::CloseRequested => {
                event_loop.exit();
                Ok(())
            }
            _ => Ok(()),
        };
        if let Err(err) = result {
            self.fail(event_loop, err);
        }
    }
}

fn spawn_reader(proxy: EventLoopProxy<UserEvent>) -> BarResult<()> {
    thread::Builder::new()
        .name("bevelbar-stdin".to_owned())
        .spawn(move || {
            let mut reader = FrameReader::new(io::stdin().lock());
            loop {
                let (event, last) = match reader.read_frame() {
                    Ok(frame) => (UserEvent::Frame(frame), false),
                    Err(err) => (UserEvent::InputFailed(err), true),
                };
                // A closed event loop means the bar is shutting down.
                if proxy.send_event(event).is_err() || last {
                    break;
                }
            }
        })?;
    Ok(())
}

/// Open the windows and run until a fatal error or the event loop exits.
pub fn run(config: Config) -> BarResult<()> {
    let font = config.font.load()?;
    let event_loop = EventLoop::<UserEvent>::with_user_event()
        .build()
        .map_err(display_err)?;
    spawn_reader(event_loop.create_proxy())?;

    let mut app = BarApp {
        pending: Some(Pending { font, config }),
        running: None,
        queued: None,
        error: None,
    };
    event_loop.run_app(&mut app).map_err(display_err)?;

    match app.error {
        Some(err) => Err(err),
        None => Ok(()),
    }
}
