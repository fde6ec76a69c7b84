#![forbid(unsafe_code)]

//! Input framing.
//!
//! The markup stream has no length prefix: one frame ends when the last
//! three bytes read are the sentinel `"\nf\n"`. [`InputBuffer`] accumulates
//! bytes until it sees the sentinel; [`FrameReader`] drives it from any
//! [`Read`] source and keeps bytes read past a sentinel for the next frame.

use std::io::{self, BufRead, BufReader, Read};

use crate::error::BarResult;

/// Suffix that terminates one frame of markup.
pub const SENTINEL: &[u8; 3] = b"\nf\n";

/// Whether `buf` ends with the frame sentinel.
#[inline]
#[must_use]
pub fn ends_with_sentinel(buf: &[u8]) -> bool {
    buf.len() >= SENTINEL.len() && buf[buf.len() - SENTINEL.len()..] == SENTINEL[..]
}

/// The accumulated bytes of one frame.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputBuffer {
    bytes: Vec<u8>,
    complete: bool,
}

impl InputBuffer {
    /// An empty, incomplete buffer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap already-framed bytes. Completeness is derived from the sentinel.
    #[must_use]
    pub fn from_frame(bytes: impl Into<Vec<u8>>) -> Self {
        let bytes = bytes.into();
        let complete = ends_with_sentinel(&bytes);
        Self { bytes, complete }
    }

    /// Append bytes from `chunk` until the sentinel is observed.
    ///
    /// Returns how many bytes of `chunk` were taken; the rest belongs to the
    /// next frame. A complete buffer takes nothing.
    pub fn extend_until_sentinel(&mut self, chunk: &[u8]) -> usize {
        if self.complete {
            return 0;
        }
        for (i, &byte) in chunk.iter().enumerate() {
            self.bytes.push(byte);
            if ends_with_sentinel(&self.bytes) {
                self.complete = true;
                return i + 1;
            }
        }
        chunk.len()
    }

    /// Whether the sentinel has been seen.
    #[inline]
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.complete
    }

    /// The raw bytes.
    #[inline]
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Number of bytes accumulated.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Whether nothing has been accumulated.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl AsRef<[u8]> for InputBuffer {
    fn as_ref(&self) -> &[u8] {
        &self.bytes
    }
}

/// Reads sentinel-terminated frames from a byte stream.
#[derive(Debug)]
pub struct FrameReader<R> {
    reader: BufReader<R>,
    frames: u64,
}

impl<R: Read> FrameReader<R> {
    /// Wrap a reader.
    pub fn new(reader: R) -> Self {
        Self {
            reader: BufReader::new(reader),
            frames: 0,
        }
    }

    /// Number of complete frames read so far.
    #[must_use]
    pub fn frames_read(&self) -> u64 {
        self.frames
    }

    /// Block until one complete frame has been read.
    ///
    /// End of stream before the sentinel is an error: the producer is
    /// expected to run for as long as the bar does.
    pub fn read_frame(&mut self) -> BarResult<InputBuffer> {
        let mut frame = InputBuffer::new();
        loop {
            let chunk = match self.reader.fill_buf() {
                Ok(chunk) => chunk,
                Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
                Err(err) => return Err(err.into()),
            };
            if chunk.is_empty() {
                return Err(io::Error::new(
                    io::ErrorKind::UnexpectedEof,
                    format!(
                        "input closed after {} bytes without frame terminator",
                        frame.len()
                    ),
                )
                .into());
            }

            let used = frame.extend_until_sentinel(chunk);
            self.reader.consume(used);

            if frame.is_complete() {
                self.frames += 1;
                tracing::debug!(frame = self.frames, bytes = frame.len(), "frame read");
                return Ok(frame);
            }
        }
    }
}

impl<R: Read> Iterator for FrameReader<R> {
    type Item = BarResult<InputBuffer>;

    fn next(&mut self) -> Option<Self::Item> {
        Some(self.read_frame())
    }
}
