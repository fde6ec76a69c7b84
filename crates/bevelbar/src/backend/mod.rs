#![forbid(unsafe_code)]

//! Window-system backends.

#[cfg(feature = "winit")]
mod windowed;

#[cfg(feature = "winit")]
pub use windowed::run;

#[cfg(not(feature = "winit"))]
use bevelbar_core::error::{BarError, BarResult};

/// Without the `winit` feature there is nothing to open windows with.
#[cfg(not(feature = "winit"))]
pub fn run(_config: crate::Config) -> BarResult<()> {
    Err(BarError::Display(
        "built without windowing support; run with --headless".to_owned(),
    ))
}
