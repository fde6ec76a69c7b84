#![forbid(unsafe_code)]

//! Display-less runner.
//!
//! Renders against the virtual outputs of the config and prints, for every
//! presented frame, one line per monitor:
//!
//! ```text
//! monitor 0 57x20+0+1060
//! ```

use std::io::{Read, Write};

use bevelbar_core::error::{BarError, BarResult};
use bevelbar_core::input::FrameReader;
use bevelbar_core::monitor::MonitorSet;
use bevelbar_runtime::{BarProgram, HeadlessDisplay};

use crate::cli::Config;

/// Process frames from `input` until it fails or ends.
///
/// The stream never ends cleanly: end of input is `InputStreamFailure`,
/// exactly as with a real display.
pub fn run<R: Read, W: Write>(config: Config, input: R, mut out: W) -> BarResult<()> {
    let mut display = HeadlessDisplay::new(config.outputs);
    let monitors = MonitorSet::discover(&display)?;
    let font = config.font.load()?;
    let mut program = BarProgram::new(monitors, font, config.styles, config.base, config.policy);

    for frame in FrameReader::new(input) {
        program.handle_frame(frame?, &mut display)?;
        for (index, window) in display.windows() {
            let p = window.placement;
            writeln!(out, "monitor {index} {}x{}{:+}{:+}", p.width, p.height, p.x, p.y)
                .map_err(|e| BarError::Display(format!("stdout: {e}")))?;
        }
        out.flush()
            .map_err(|e| BarError::Display(format!("stdout: {e}")))?;
    }
    Ok(())
}
