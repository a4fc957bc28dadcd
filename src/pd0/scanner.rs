// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Ensemble frame scanner.
//!
//! Locates ensemble starts in a raw PD0 buffer and slices candidate frames
//! using each ensemble's self-declared byte count.
//!
//! A start is the full six-byte header prefix, not just the `0x7F 0x7F`
//! marker:
//!
//! ```text
//! 7F 7F <num_bytes: u16 LE> 00 <06|07>
//! ```
//!
//! Matching the spare byte and the data type count as well keeps marker
//! bytes that occur inside payload data from being taken as ensemble starts.
//! The scanner does not validate frames; it only frames them.

use std::sync::OnceLock;

use byteorder::{ByteOrder, LittleEndian};
use regex::bytes::Regex;

use super::constants::{CHECKSUM_LEN, HEADER_LEN};
use crate::{CodecError, Result};

fn start_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    // The pattern is a literal, so compilation cannot fail at runtime.
    PATTERN.get_or_init(|| {
        Regex::new(r"(?s-u)\x7F\x7F.{2}\x00[\x06\x07]").expect("ensemble start pattern is valid")
    })
}

/// One candidate ensemble: marker through trailing checksum.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Frame<'a> {
    /// Absolute offset of the marker in the scanned buffer
    pub offset: usize,
    /// Frame bytes, `declared_len + 2` long
    pub bytes: &'a [u8],
}

impl<'a> Frame<'a> {
    /// Declared ensemble length (excludes the checksum).
    pub fn declared_len(&self) -> usize {
        self.bytes.get(2..4).map_or(0, LittleEndian::read_u16) as usize
    }

    /// Bytes covered by the checksum.
    pub fn body(&self) -> &'a [u8] {
        &self.bytes[..self.declared_len().min(self.bytes.len())]
    }

    /// Checksum stored after the ensemble body.
    pub fn stored_checksum(&self) -> u16 {
        let len = self.declared_len();
        self.bytes
            .get(len..len + CHECKSUM_LEN)
            .map_or(0, LittleEndian::read_u16)
    }

    /// Absolute offset one past the last frame byte.
    pub fn end(&self) -> usize {
        self.offset + self.bytes.len()
    }

    /// The six header bytes.
    pub fn header_bytes(&self) -> &'a [u8] {
        &self.bytes[..HEADER_LEN.min(self.bytes.len())]
    }
}

/// Lazy, restartable iterator over candidate frames.
///
/// Yields `Err(CodecError::Truncated)` once when a start is found whose
/// declared length runs past the end of the buffer, then stops.
///
/// By default scanning resumes right after each matched header prefix.
/// Callers that have validated a frame skip its payload with
/// [`FrameScanner::resume_at`].
///
/// # Example
///
/// ```
/// use dvlcodec::pd0::scanner::FrameScanner;
///
/// let buffer = [0u8; 32];
/// assert_eq!(FrameScanner::new(&buffer).count(), 0);
/// ```
#[derive(Debug, Clone)]
pub struct FrameScanner<'a> {
    buffer: &'a [u8],
    position: usize,
    finished: bool,
}

impl<'a> FrameScanner<'a> {
    /// Create a scanner at the start of `buffer`.
    pub fn new(buffer: &'a [u8]) -> Self {
        Self {
            buffer,
            position: 0,
            finished: false,
        }
    }

    /// Current search position.
    pub fn position(&self) -> usize {
        self.position
    }

    /// Continue the search from `position`.
    ///
    /// Positions behind the current one are ignored so a frame is never
    /// yielded twice.
    pub fn resume_at(&mut self, position: usize) {
        self.position = self.position.max(position);
    }

    /// Restart from the beginning of the buffer.
    pub fn reset(&mut self) {
        self.position = 0;
        self.finished = false;
    }

    /// Whether a truncated frame or the end of the buffer was reached.
    pub fn is_finished(&self) -> bool {
        self.finished
    }
}

impl<'a> Iterator for FrameScanner<'a> {
    type Item = Result<Frame<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished || self.position >= self.buffer.len() {
            self.finished = true;
            return None;
        }

        let (start, declared) = loop {
            let found = match start_pattern().find_at(self.buffer, self.position) {
                Some(m) => m,
                None => {
                    self.finished = true;
                    self.position = self.buffer.len();
                    return None;
                }
            };
            self.position = found.end();

            let start = found.start();
            let declared = LittleEndian::read_u16(&self.buffer[start + 2..start + 4]) as usize;
            // A declared length shorter than the header cannot describe an ensemble.
            if declared >= HEADER_LEN {
                break (start, declared);
            }
        };
        let needed = declared + CHECKSUM_LEN;
        let available = self.buffer.len() - start;

        if needed > available {
            self.finished = true;
            return Some(Err(CodecError::Truncated {
                offset: start,
                declared: needed,
                available,
            }));
        }

        Some(Ok(Frame {
            offset: start,
            bytes: &self.buffer[start..start + needed],
        }))
    }
}
