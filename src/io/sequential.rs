// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Single-pass decoding: scan, validate, decode and append frame by frame.

use std::time::Instant;

use tracing::debug;

use super::report::Collector;
use crate::config::DecodeStrategy;
use crate::core::CodecError;
use crate::pd0::{checksum, DecodeOptions, Ensemble, Frame, FrameScanner};

/// What to do with the next candidate frame.
#[derive(Debug)]
pub(crate) enum Step<'a> {
    /// Checksum-valid frame, ready for section decoding
    Decode { frame: Frame<'a>, checksum: u16 },
    /// Frame rejected before section decoding
    Reject(CodecError),
    /// Truncated frame; always the last step
    Truncated(CodecError),
}

/// Scanner driver yielding one [`Step`] per candidate frame.
///
/// After a checksum-valid frame the scan resumes past its checksum, so
/// marker-like bytes inside an accepted ensemble are never matched. After
/// a rejected frame it resumes just past the rejected marker.
pub(crate) struct Steps<'a> {
    scanner: FrameScanner<'a>,
}

impl<'a> Steps<'a> {
    pub fn new(buffer: &'a [u8]) -> Self {
        Self {
            scanner: FrameScanner::new(buffer),
        }
    }
}

impl<'a> Iterator for Steps<'a> {
    type Item = Step<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let step = match self.scanner.next()? {
            Ok(frame) => match checksum::validate(&frame) {
                Ok(checksum) => {
                    self.scanner.resume_at(frame.end());
                    Step::Decode { frame, checksum }
                }
                Err(err) => Step::Reject(err),
            },
            Err(err) => Step::Truncated(err),
        };
        Some(step)
    }
}

impl Collector {
    /// Apply one step, decoding on the calling thread.
    pub(crate) fn apply(&mut self, step: Step<'_>, options: &DecodeOptions) {
        match step {
            Step::Decode { frame, checksum } => {
                self.frame_found();
                self.outcome(Ensemble::decode_validated(&frame, checksum, options));
            }
            Step::Reject(err) => {
                self.frame_found();
                self.reject(err);
            }
            Step::Truncated(err) => self.truncate(err),
        }
    }
}

/// Decode `buffer` in one pass on the calling thread.
pub(crate) fn decode(buffer: &[u8], options: &DecodeOptions) -> Collector {
    decode_steps(Steps::new(buffer), options)
}

/// Decode already scanned steps on the calling thread.
pub(crate) fn decode_steps<'a>(
    steps: impl IntoIterator<Item = Step<'a>>,
    options: &DecodeOptions,
) -> Collector {
    let start = Instant::now();
    let mut collector = Collector::new(DecodeStrategy::Sequential);
    for step in steps {
        collector.apply(step, options);
    }
    debug!(
        context = "sequential_decode",
        frames = collector.report.frames_found,
        accepted = collector.report.accepted,
        elapsed_ms = start.elapsed().as_millis() as u64,
        "sequential decode complete"
    );
    collector
}
