#![forbid(unsafe_code)]

//! Markup protocol state machine.
//!
//! Decodes one frame of bar markup into a stream of [`LayoutOp`] values.
//!
//! # Grammar
//!
//! ```text
//! frame         := monitor_block* 'f' '\n'
//! monitor_block := selector body
//! selector      := 'a' | DIGIT
//! body          := item* 'e'
//! item          := '-' | segment
//! segment       := DIGIT text '\n'
//! ```
//!
//! Digits are decoded as `byte - b'0'`, so `':'`, `';'`, ... address indices
//! ten and up. Each single-byte token (selector, `-`, `e`, `f`) may be followed
//! by one newline, which is skipped; producers usually emit one token per line
//! and the compact form is accepted as well.
//!
//! The parser is an [`Iterator`]: callers drain it and apply each operation as
//! it arrives, so parsing and rendering interleave without sharing state. The
//! iterator is fused after `EndFrame` or the first error.

use std::ops::Range;

use thiserror::Error;

/// Parser state machine states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParserState {
    /// Expecting a monitor selector or the frame terminator.
    #[default]
    SelectMonitor,
    /// Inside a monitor block, expecting an item or `e`.
    MonitorBody,
    /// The current byte is a style index.
    StyleDigit,
    /// Collecting segment text up to the next newline.
    TextAccumulate,
}

/// Which monitors an operation applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Target {
    /// Every monitor (`a` selector).
    All,
    /// A single monitor by index.
    Monitor(usize),
}

impl Target {
    /// Whether monitor `index` is addressed by this target.
    #[inline]
    #[must_use]
    pub const fn matches(self, index: usize) -> bool {
        match self {
            Self::All => true,
            Self::Monitor(i) => i == index,
        }
    }
}

/// One layout operation decoded from the markup stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LayoutOp {
    /// A monitor block starts.
    SelectMonitor(Target),
    /// Draw a styled segment. `span` indexes the frame's input bytes.
    DrawText {
        /// Monitors to draw on.
        target: Target,
        /// Style index into the style table.
        style: usize,
        /// Byte range of the segment text within the input.
        span: Range<usize>,
    },
    /// Leave a gap of half the font height.
    DrawEmpty(Target),
    /// The current monitor block ended.
    EndMonitor,
    /// The frame ended; draw borders and present.
    EndFrame,
}

impl LayoutOp {
    /// The segment text of a `DrawText` op, borrowed from the frame input.
    #[must_use]
    pub fn text<'a>(&self, input: &'a [u8]) -> Option<&'a [u8]> {
        match self {
            Self::DrawText { span, .. } => input.get(span.clone()),
            _ => None,
        }
    }
}

/// Index bounds the stream is validated against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProtocolLimits {
    /// Number of discovered monitors.
    pub monitors: usize,
    /// Number of loaded styles.
    pub styles: usize,
}

impl ProtocolLimits {
    /// Create limits for `monitors` monitors and `styles` styles.
    #[must_use]
    pub const fn new(monitors: usize, styles: usize) -> Self {
        Self { monitors, styles }
    }
}

/// Grammar violation in a frame.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// A monitor selector outside `0..monitors`.
    #[error("monitor selector {byte:#04x} at offset {offset} is outside 0..{monitors}")]
    InvalidMonitorIndex {
        /// The offending byte.
        byte: u8,
        /// Its offset in the frame.
        offset: usize,
        /// Number of monitors.
        monitors: usize,
    },
    /// A style digit outside `0..styles`.
    #[error("style selector {byte:#04x} at offset {offset} is outside 0..{styles}")]
    InvalidStyleIndex {
        /// The offending byte.
        byte: u8,
        /// Its offset in the frame.
        offset: usize,
        /// Number of styles.
        styles: usize,
    },
    /// The input ended before the `f` terminator.
    #[error("input ended in state {state:?} before the frame terminator")]
    UnexpectedEnd {
        /// State the parser was in when the bytes ran out.
        state: ParserState,
    },
}

/// Result of feeding one byte to the state machine.
enum Step {
    Continue,
    Emit(LayoutOp),
    Fail(ParseError),
}

/// Decode a selector byte as an index bounded by `count`.
#[inline]
fn decode_index(byte: u8, count: usize) -> Option<usize> {
    byte.checked_sub(b'0')
        .map(usize::from)
        .filter(|&index| index < count)
}

/// Frame parser over a borrowed input buffer.
///
/// ```
/// use bevelbar_core::protocol::{LayoutOp, ProtocolLimits, ProtocolParser, Target};
///
/// let ops: Result<Vec<_>, _> = ProtocolParser::new(b"a-ef\n", ProtocolLimits::new(2, 1)).collect();
/// assert_eq!(
///     ops.unwrap(),
///     vec![
///         LayoutOp::SelectMonitor(Target::All),
///         LayoutOp::DrawEmpty(Target::All),
///         LayoutOp::EndMonitor,
///         LayoutOp::EndFrame,
///     ]
/// );
/// ```
#[derive(Debug, Clone)]
pub struct ProtocolParser<'a> {
    input: &'a [u8],
    limits: ProtocolLimits,
    pos: usize,
    state: ParserState,
    target: Target,
    style: usize,
    span_start: usize,
    finished: bool,
}

impl<'a> ProtocolParser<'a> {
    /// Create a parser for one frame.
    #[must_use]
    pub fn new(input: &'a [u8], limits: ProtocolLimits) -> Self {
        Self {
            input,
            limits,
            pos: 0,
            state: ParserState::SelectMonitor,
            target: Target::All,
            style: 0,
            span_start: 0,
            finished: false,
        }
    }

    /// Current state of the machine.
    #[inline]
    #[must_use]
    pub fn state(&self) -> ParserState {
        self.state
    }

    /// Offset of the next byte to be examined.
    #[inline]
    #[must_use]
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Process the byte at `self.pos`. Each handler decides whether it
    /// consumes the byte.
    fn step(&mut self, byte: u8) -> Step {
        match self.state {
            ParserState::SelectMonitor => self.process_select(byte),
            ParserState::MonitorBody => self.process_body(byte),
            ParserState::StyleDigit => self.process_style(byte),
            ParserState::TextAccumulate => self.process_text(byte),
        }
    }

    fn process_select(&mut self, byte: u8) -> Step {
        let offset = self.pos;
        self.pos += 1;

        match byte {
            b'f' => {
                self.skip_newline();
                self.finished = true;
                let trailing = self.input.len() - self.pos;
                if trailing > 0 {
                    tracing::debug!(trailing, "ignoring bytes after frame terminator");
                }
                Step::Emit(LayoutOp::EndFrame)
            }
            b'a' => {
                self.enter_body(Target::All);
                Step::Emit(LayoutOp::SelectMonitor(Target::All))
            }
            _ => match decode_index(byte, self.limits.monitors) {
                Some(index) => {
                    self.enter_body(Target::Monitor(index));
                    Step::Emit(LayoutOp::SelectMonitor(Target::Monitor(index)))
                }
                None => Step::Fail(ParseError::InvalidMonitorIndex {
                    byte,
                    offset,
                    monitors: self.limits.monitors,
                }),
            },
        }
    }

    fn process_body(&mut self, byte: u8) -> Step {
        match byte {
            b'e' => {
                self.pos += 1;
                self.skip_newline();
                self.state = ParserState::SelectMonitor;
                Step::Emit(LayoutOp::EndMonitor)
            }
            b'-' => {
                self.pos += 1;
                self.skip_newline();
                Step::Emit(LayoutOp::DrawEmpty(self.target))
            }
            // Styled segment: the same byte is the style digit.
            _ => {
                self.state = ParserState::StyleDigit;
                Step::Continue
            }
        }
    }

    fn process_style(&mut self, byte: u8) -> Step {
        let offset = self.pos;
        let Some(style) = decode_index(byte, self.limits.styles) else {
            return Step::Fail(ParseError::InvalidStyleIndex {
                byte,
                offset,
                styles: self.limits.styles,
            });
        };

        self.pos += 1;
        self.style = style;
        self.span_start = self.pos;
        self.state = ParserState::TextAccumulate;
        Step::Continue
    }

    fn process_text(&mut self, byte: u8) -> Step {
        let offset = self.pos;
        self.pos += 1;

        if byte != b'\n' {
            return Step::Continue;
        }

        self.state = ParserState::MonitorBody;
        Step::Emit(LayoutOp::DrawText {
            target: self.target,
            style: self.style,
            span: self.span_start..offset,
        })
    }

    fn enter_body(&mut self, target: Target) {
        self.target = target;
        self.skip_newline();
        self.state = ParserState::MonitorBody;
    }

    fn skip_newline(&mut self) {
        if self.input.get(self.pos) == Some(&b'\n') {
            self.pos += 1;
        }
    }
}

impl Iterator for ProtocolParser<'_> {
    type Item = Result<LayoutOp, ParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        while let Some(&byte) = self.input.get(self.pos) {
            match self.step(byte) {
                Step::Continue => {}
                Step::Emit(op) => {
                    tracing::trace!(?op, offset = self.pos, "layout op");
                    return Some(Ok(op));
                }
                Step::Fail(err) => {
                    self.finished = true;
                    return Some(Err(err));
                }
            }
        }

        self.finished = true;
        Some(Err(ParseError::UnexpectedEnd { state: self.state }))
    }
}

impl std::iter::FusedIterator for ProtocolParser<'_> {}

/// Parse a whole frame into its operations, stopping at the first error.
pub fn parse_frame(input: &[u8], limits: ProtocolLimits) -> Result<Vec<LayoutOp>, ParseError> {
    ProtocolParser::new(input, limits).collect()
}
