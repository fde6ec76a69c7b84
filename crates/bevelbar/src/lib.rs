#![forbid(unsafe_code)]

//! The `bevelbar` executable: argument parsing, logging, font loading and
//! the display backends that drive [`bevelbar_runtime::BarProgram`].

pub mod backend;
pub mod cli;
pub mod font;
pub mod headless;
pub mod logging;

use std::io;

use bevelbar_core::error::BarResult;

pub use cli::{Cli, Config};

/// Run the bar until a fatal error. Only returns `Ok` if the window system
/// closes the bar.
pub fn run(config: Config) -> BarResult<()> {
    if config.headless {
        headless::run(config, io::stdin().lock(), io::stdout().lock())
    } else {
        backend::run(config)
    }
}
