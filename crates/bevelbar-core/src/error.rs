#![forbid(unsafe_code)]

//! Error taxonomy.
//!
//! Every error here is fatal for the process: the bar is fed by a trusted
//! producer, so there is no resynchronization or retry anywhere.

use std::io;

use thiserror::Error;

use crate::protocol::ParseError;

/// Top-level failure surfaced by bevelbar.
#[derive(Debug, Error)]
pub enum BarError {
    /// The display server reported no output with an active mode and a
    /// connected sink.
    #[error("no usable displays found")]
    NoDisplaysFound,

    /// A font, color, or style table could not be loaded.
    #[error("cannot load {kind} '{name}': {reason}")]
    ResourceLoadFailure {
        /// What kind of resource failed (`font`, `color`, `styles`, ...).
        kind: &'static str,
        /// The name or spec that was requested.
        name: String,
        /// Human-readable cause.
        reason: String,
    },

    /// Reading the markup stream failed or it ended.
    #[error("input stream failure: {0}")]
    InputStreamFailure(#[from] io::Error),

    /// The markup stream violated the protocol grammar.
    #[error("malformed input: {0}")]
    MalformedInput(#[from] ParseError),

    /// The display backend failed to present a frame.
    #[error("display backend failure: {0}")]
    Display(String),
}

impl BarError {
    /// Convenience constructor for [`BarError::ResourceLoadFailure`].
    pub fn resource(kind: &'static str, name: impl Into<String>, reason: impl ToString) -> Self {
        Self::ResourceLoadFailure {
            kind,
            name: name.into(),
            reason: reason.to_string(),
        }
    }
}

/// Result alias used across the workspace.
pub type BarResult<T> = Result<T, BarError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resource_message_names_the_resource() {
        let err = BarError::resource("color", "chartreuse-ish", "unknown color name");
        assert_eq!(
            err.to_string(),
            "cannot load color 'chartreuse-ish': unknown color name"
        );
    }

    #[test]
    fn parse_errors_convert_and_classify() {
        let err: BarError = ParseError::InvalidMonitorIndex {
            byte: b'7',
            offset: 0,
            monitors: 2,
        }
        .into();
        assert!(matches!(err, BarError::MalformedInput(_)));
        assert!(err.to_string().starts_with("malformed input:"));
    }

    #[test]
    fn io_errors_are_stream_failures() {
        let err: BarError = io::Error::new(io::ErrorKind::UnexpectedEof, "eof").into();
        assert!(matches!(err, BarError::InputStreamFailure(_)));
    }
}
