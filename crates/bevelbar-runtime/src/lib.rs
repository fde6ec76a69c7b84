#![forbid(unsafe_code)]

//! Frame pipeline: layout rendering, placement, presentation.

pub mod headless;
pub mod presenter;
pub mod program;
pub mod renderer;

pub use headless::{HeadlessDisplay, PresentedWindow};
pub use presenter::{DisplayBackend, HorizontalAnchor, PlacementPolicy, Presenter, VerticalAnchor};
pub use program::{BarEvent, BarProgram};
pub use renderer::BevelRenderer;
