#![forbid(unsafe_code)]

//! Core: markup protocol, monitor discovery, input framing, and errors.

pub mod error;
pub mod geometry;
pub mod input;
pub mod monitor;
pub mod protocol;

pub use error::{BarError, BarResult};
pub use geometry::Rect;
pub use input::{FrameReader, InputBuffer, SENTINEL};
pub use monitor::{Monitor, MonitorSet, OutputInfo, OutputSource};
pub use protocol::{LayoutOp, ParseError, ProtocolLimits, ProtocolParser, Target};
